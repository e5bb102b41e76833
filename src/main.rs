use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use fprules::config::{CONFIG_FILE_NAME, discover_configs, load_merged_config};
use fprules::rules::{Destination, FileItem, FilePattern, compile_rules};

#[derive(Parser)]
#[command(name = "fprules")]
#[command(
	author,
	version,
	about = "File pattern rules: derive destination paths from glob matches"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .fprules.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .fprules.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log verbosity (-v for info, -vv for debug)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Match a source pattern and print the item derived from every match
	Match {
		/// Source glob pattern, at most one `**` segment
		source: String,

		/// Destination template using `%` (stem) and `%%` (captured path)
		#[arg(required_unless_present = "to")]
		destination: Option<String>,

		/// Labelled destination template, may be repeated
		#[arg(long, value_name = "LABEL=TEMPLATE", conflicts_with = "destination")]
		to: Vec<String>,

		/// Name template (defaults to `%%/%` or `%`)
		#[arg(long)]
		names: Option<String>,

		/// Sort items by name instead of filesystem order
		#[arg(long)]
		sort: bool,
	},
	/// Evaluate every rule from the discovered .fprules.toml files
	Rules {
		/// Sort items by name instead of filesystem order
		#[arg(long)]
		sort: bool,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered rules with their source files
	Show,
	/// Check all config files for errors without matching anything
	Validate,
}

const INIT_TEMPLATE: &str = r#"# fprules configuration
#
# `%` in a template is replaced by the stem of the matched file,
# `%%` by the part of the path matched by `**` in the source.
# Paths are relative to the directory of this file.

root = true

[[rules]]
label = "pages"
source = "src/**/*.md"
destination = "build/%%/%.html"

# [[rules]]
# source = "defs/*.ddl"
# names = "download-%"
# destinations = { csv = "downloaded/%.csv", meta = "downloaded/%.json" }
"#;

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logger(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logger(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if cli.init {
		return handle_init(cli.force);
	}

	match cli.command {
		Some(Commands::Match {
			source,
			destination,
			to,
			names,
			sort,
		}) => handle_match(&source, destination, &to, names.as_deref(), sort),
		Some(Commands::Rules { sort }) => handle_rules(sort),
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

/// Split a `LABEL=TEMPLATE` argument.
fn parse_labelled(arg: &str) -> Result<(String, String)> {
	let (label, template) = arg
		.split_once('=')
		.with_context(|| format!("Expected LABEL=TEMPLATE, got '{arg}'"))?;
	if label.is_empty() {
		anyhow::bail!("Empty label in '{arg}'");
	}
	Ok((label.to_string(), template.to_string()))
}

fn handle_match(
	source: &str,
	destination: Option<String>,
	to: &[String],
	names: Option<&str>,
	sort: bool,
) -> Result<ExitCode> {
	let destination = match destination {
		Some(template) => Destination::Single(template),
		None => Destination::Named(
			to.iter()
				.map(String::as_str)
				.map(parse_labelled)
				.collect::<Result<_>>()?,
		),
	};

	let file_pattern = FilePattern::new(source, &destination, names)
		.with_context(|| format!("Invalid rule for source '{source}'"))?;

	print_items(&file_pattern, sort)?;
	Ok(ExitCode::SUCCESS)
}

fn handle_rules(sort: bool) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config = load_merged_config(&cwd).context("Failed to load configuration")?;
	let rules = compile_rules(&config).context("Failed to compile rules")?;

	if rules.is_empty() {
		println!("No rules found.");
		return Ok(ExitCode::SUCCESS);
	}

	for rule in &rules {
		println!("# {} ({})", rule.label(), rule.source.display());
		print_items(&rule.file_pattern, sort)
			.with_context(|| format!("Failed to evaluate rule '{}'", rule.label()))?;
	}

	Ok(ExitCode::SUCCESS)
}

/// Print items as they are found, or all at once sorted by name.
fn print_items(file_pattern: &FilePattern, sort: bool) -> Result<()> {
	if sort {
		let mut items = file_pattern.collect()?;
		items.sort_by(|a, b| a.name.cmp(&b.name));
		items.iter().for_each(print_item);
	} else {
		for item in file_pattern.iter()? {
			print_item(&item?);
		}
	}
	Ok(())
}

fn print_item(item: &FileItem) {
	println!("{item}");
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# rules: {}", loaded.config.rules.len());
		println!();

		for (i, rule) in loaded.config.rules.iter().enumerate() {
			println!("  Rule {}:", i + 1);
			if let Some(ref label) = rule.label {
				println!("    label: {}", label);
			}
			println!("    source: {}", rule.source);
			if let Some(ref destination) = rule.destination {
				println!("    destination: {}", destination);
			}
			if let Some(ref destinations) = rule.destinations {
				for (label, template) in destinations {
					println!("    destinations.{}: {}", label, template);
				}
			}
			if let Some(ref names) = rule.names {
				println!("    names: {}", names);
			}
			println!();
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let configs = match discover_configs(&cwd) {
		Ok(configs) => configs,
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			return Ok(ExitCode::FAILURE);
		}
	};

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	// Templates are only checked against their source pattern once compiled.
	let merged = fprules::config::merge_configs(&configs);
	if let Err(e) = compile_rules(&merged) {
		eprintln!("Configuration error: {}", e);
		return Ok(ExitCode::FAILURE);
	}

	println!("All configuration files are valid:");
	for loaded in &configs {
		println!(
			"  {} ({} rules)",
			loaded.path.display(),
			loaded.config.rules.len()
		);
	}
	Ok(ExitCode::SUCCESS)
}
