use crate::config::types::{MergedConfig, Rule, RuleWithSource};
use crate::error::{FprulesError, Result};
use crate::rules::todo::{Destination, FilePattern};
use std::path::{Path, PathBuf};

/// A rule from a config file, validated and ready to enumerate.
#[derive(Debug)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: Rule,

	pub file_pattern: FilePattern,

	/// Source config path (for debugging).
	pub source: PathBuf,
}

impl CompiledRule {
	/// Compile a rule, resolving its relative paths against the directory of
	/// the config file it came from.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		let base_dir = rws.base_dir();

		let source = resolve(base_dir, &rws.rule.source, true)?;
		let destination = match rws.rule.destination_templates()? {
			Destination::Single(template) => Destination::Single(resolve(base_dir, &template, false)?),
			Destination::Named(templates) => Destination::Named(
				templates
					.into_iter()
					.map(|(label, template)| -> Result<(String, String)> {
						Ok((label, resolve(base_dir, &template, false)?))
					})
					.collect::<Result<Vec<_>>>()?,
			),
		};

		let file_pattern = FilePattern::new(&source, &destination, rws.rule.names.as_deref())?;

		Ok(CompiledRule {
			rule: rws.rule.clone(),
			file_pattern,
			source: rws.source.clone(),
		})
	}

	pub fn label(&self) -> &str {
		self.rule.display_label()
	}
}

/// Prefix a relative `path` with `base_dir`. When `escape` is set the base
/// directory is escaped so it can not add glob metacharacters.
fn resolve(base_dir: &Path, path: &str, escape: bool) -> Result<String> {
	if base_dir.as_os_str().is_empty() || Path::new(path).is_absolute() {
		return Ok(path.to_string());
	}
	let base = base_dir.to_str().ok_or_else(|| FprulesError::NonUtf8Path {
		path: base_dir.to_path_buf(),
	})?;
	let base = if escape {
		glob::Pattern::escape(base)
	} else {
		base.to_string()
	};
	Ok(format!("{}/{}", base.trim_end_matches('/'), path))
}

/// Compile all rules in a merged config.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}
