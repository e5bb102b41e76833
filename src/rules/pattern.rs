use crate::error::{FprulesError, Result};
use log::debug;
use std::path::{Component, Path, PathBuf};

/// Position of the `**` segment in a source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleWildcard {
	/// Index of the segment that is exactly `**`.
	pub index: usize,

	/// Segments after the `**`, joined with `/`. `None` when `**` is last.
	pub suffix: Option<String>,
}

/// A source pattern decomposed into a fixed root, a glob region and an
/// optional double-wildcard capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePattern {
	raw: String,
	parts: Vec<String>,
	glob_start: Option<usize>,
	double_wildcard: Option<DoubleWildcard>,
}

fn has_wildcard(segment: &str) -> bool {
	segment.contains(['*', '?', '['])
}

impl SourcePattern {
	/// Parse a source pattern such as `data/defs/**/*.ddl`.
	///
	/// Fails if a `**` is mixed with other characters in its segment, if more
	/// than one segment is `**`, or if the glob part is not valid glob syntax.
	/// No filesystem access happens here.
	pub fn parse(pattern: &str) -> Result<Self> {
		let parts = split_segments(Path::new(pattern))?;

		let mut glob_start = None;
		let mut double_wildcard: Option<DoubleWildcard> = None;

		for (i, part) in parts.iter().enumerate() {
			if glob_start.is_none() && has_wildcard(part) {
				glob_start = Some(i);
			}
			if !part.contains("**") {
				continue;
			}
			if part != "**" {
				return Err(FprulesError::MisplacedDoubleWildcard {
					pattern: pattern.to_string(),
				});
			}
			if double_wildcard.is_some() {
				return Err(FprulesError::MultipleDoubleWildcards {
					pattern: pattern.to_string(),
				});
			}
			let rest = &parts[i + 1..];
			double_wildcard = Some(DoubleWildcard {
				index: i,
				suffix: (!rest.is_empty()).then(|| rest.join("/")),
			});
		}

		let parsed = SourcePattern {
			raw: pattern.to_string(),
			parts,
			glob_start,
			double_wildcard,
		};

		if let Some(search) = parsed.search_pattern() {
			glob::Pattern::new(&search).map_err(|source| FprulesError::InvalidGlob {
				pattern: pattern.to_string(),
				source,
			})?;
		}

		debug!(
			"parsed source pattern {:?}: glob_start={:?}, double_wildcard={:?}",
			parsed.raw, parsed.glob_start, parsed.double_wildcard
		);

		Ok(parsed)
	}

	/// The pattern as given by the caller.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Path segments as written, with leading `.` components removed.
	pub fn parts(&self) -> &[String] {
		&self.parts
	}

	/// Index of the first segment containing `*`, `?` or `[`.
	pub fn glob_start(&self) -> Option<usize> {
		self.glob_start
	}

	pub fn double_wildcard(&self) -> Option<&DoubleWildcard> {
		self.double_wildcard.as_ref()
	}

	pub fn has_double_wildcard(&self) -> bool {
		self.double_wildcard.is_some()
	}

	/// The existing directory the glob search starts from: every segment
	/// before the first wildcard. Empty for patterns like `*.txt`.
	pub fn root(&self) -> PathBuf {
		let end = self.glob_start.unwrap_or(self.parts.len());
		self.parts[..end].iter().collect()
	}

	/// Segments from the first wildcard onwards, joined with `/`.
	pub fn search_pattern(&self) -> Option<String> {
		self.glob_start.map(|start| self.parts[start..].join("/"))
	}

	/// The whole pattern as a path. Only meaningful when there is no wildcard.
	pub fn literal_path(&self) -> PathBuf {
		if self.parts.is_empty() {
			return PathBuf::from(".");
		}
		self.parts.iter().collect()
	}
}

/// Split a path into its segments, dropping `.` components the way a path
/// normaliser would.
fn split_segments(path: &Path) -> Result<Vec<String>> {
	path.components()
		.filter(|c| !matches!(c, Component::CurDir))
		.map(|c| {
			c.as_os_str()
				.to_str()
				.map(str::to_string)
				.ok_or_else(|| FprulesError::NonUtf8Path {
					path: path.to_path_buf(),
				})
		})
		.collect()
}
