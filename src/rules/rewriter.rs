use crate::error::{FprulesError, Result, TemplateKind};
use crate::rules::matcher::MatchResult;
use crate::rules::pattern::SourcePattern;
use std::path::{Component, Path, PathBuf};

/// Placeholder replaced by the matched path's stem.
pub const STEM_MARKER: &str = "%";

/// Placeholder replaced by the sub-path captured by `**`.
pub const CAPTURE_MARKER: &str = "%%";

/// A validated destination or name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	raw: String,
}

/// Check a template against a source pattern.
///
/// Templates can not contain `*`, and can only use `%%` when the source
/// pattern has a double wildcard.
pub fn validate_template(template: &str, kind: TemplateKind, source: &SourcePattern) -> Result<()> {
	if template.contains('*') {
		return Err(FprulesError::WildcardInTemplate {
			kind,
			template: template.to_string(),
		});
	}
	if template.contains(CAPTURE_MARKER) && !source.has_double_wildcard() {
		return Err(FprulesError::UnexpectedCapture {
			kind,
			template: template.to_string(),
			pattern: source.as_str().to_string(),
		});
	}
	Ok(())
}

impl Template {
	pub fn new(template: &str, kind: TemplateKind, source: &SourcePattern) -> Result<Self> {
		validate_template(template, kind, source)?;
		Ok(Template {
			raw: template.to_string(),
		})
	}

	/// The default name template: `%%/%` with a double wildcard, else `%`.
	pub fn default_name(source: &SourcePattern) -> Self {
		let raw = if source.has_double_wildcard() {
			format!("{CAPTURE_MARKER}/{STEM_MARKER}")
		} else {
			STEM_MARKER.to_string()
		};
		Template { raw }
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Substitute `%%` with the capture, then `%` with the stem.
	pub fn render(&self, matched: &MatchResult) -> Result<PathBuf> {
		let mut rendered = self.raw.clone();
		if let Some(capture) = &matched.capture
			&& rendered.contains(CAPTURE_MARKER)
		{
			rendered = rendered.replace(CAPTURE_MARKER, &capture_to_string(capture));
		}
		let rendered = rendered.replace(STEM_MARKER, &matched.stem()?);
		Ok(normalize(Path::new(&rendered)))
	}
}

/// An empty capture renders as `.` so that `%%/x` stays a relative path.
fn capture_to_string(capture: &Path) -> String {
	if capture.as_os_str().is_empty() {
		".".to_string()
	} else {
		to_posix(capture)
	}
}

/// Drop `.` components and trailing separators.
pub fn normalize(path: &Path) -> PathBuf {
	let normalized: PathBuf = path
		.components()
		.filter(|c| !matches!(c, Component::CurDir))
		.collect();
	if normalized.as_os_str().is_empty() {
		PathBuf::from(".")
	} else {
		normalized
	}
}

/// Render a path with `/` separators regardless of platform.
pub fn to_posix(path: &Path) -> String {
	let mut out = String::new();
	for component in path.components() {
		match component {
			Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
			Component::RootDir => out.push('/'),
			other => {
				if !out.is_empty() && !out.ends_with('/') {
					out.push('/');
				}
				out.push_str(&other.as_os_str().to_string_lossy());
			}
		}
	}
	out
}
