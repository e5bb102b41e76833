use crate::error::FprulesError;
use crate::rules::Destination;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level configuration from a `.fprules.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop walking up parent directories after this file.
	#[serde(default)]
	pub root: bool,

	/// File pattern rules, evaluated in order.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A file pattern rule: one source pattern and its destination template(s).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Optional label used when listing rules.
	pub label: Option<String>,

	/// Glob pattern of source files, relative to the config file's directory.
	pub source: String,

	/// Single destination template (mutually exclusive with destinations).
	pub destination: Option<String>,

	/// Labelled destination templates (mutually exclusive with destination).
	pub destinations: Option<BTreeMap<String, String>>,

	/// Name template. Defaults to `%%/%` or `%`.
	pub names: Option<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All rules from all configs, most specific file first.
	pub rules: Vec<RuleWithSource>,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl RuleWithSource {
	/// Directory that relative paths in the rule are resolved against.
	pub fn base_dir(&self) -> &Path {
		self.source.parent().unwrap_or(Path::new(""))
	}
}

impl Rule {
	/// The label if set, else the source pattern.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.source)
	}

	/// Validate that exactly one of destination and destinations is set.
	pub fn validate(&self) -> Result<(), FprulesError> {
		match (&self.destination, &self.destinations) {
			(Some(_), Some(_)) => Err(FprulesError::MutuallyExclusive {
				option1: "destination".to_string(),
				option2: "destinations".to_string(),
			}),
			(None, None) => Err(FprulesError::MissingDestination {
				rule: self.display_label().to_string(),
			}),
			_ => Ok(()),
		}
	}

	/// The destination template(s) of this rule, as written.
	pub fn destination_templates(&self) -> Result<Destination, FprulesError> {
		self.validate()?;
		match (&self.destination, &self.destinations) {
			(Some(template), _) => Ok(Destination::Single(template.clone())),
			(_, Some(templates)) => Ok(Destination::from(templates.clone())),
			(None, None) => Err(FprulesError::MissingDestination {
				rule: self.display_label().to_string(),
			}),
		}
	}
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self) -> Result<(), FprulesError> {
		for rule in &self.rules {
			rule.validate()?;
		}
		Ok(())
	}
}
