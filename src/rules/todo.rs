use crate::error::{FprulesError, Result, TemplateKind};
use crate::rules::item::{DestinationPath, FileItem};
use crate::rules::matcher::{MatchResult, Matches, enumerate};
use crate::rules::pattern::SourcePattern;
use crate::rules::rewriter::{Template, to_posix};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Destination template(s) as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
	Single(String),

	/// Labelled templates, rendered in this order.
	Named(Vec<(String, String)>),
}

impl From<&str> for Destination {
	fn from(template: &str) -> Self {
		Destination::Single(template.to_string())
	}
}

impl From<String> for Destination {
	fn from(template: String) -> Self {
		Destination::Single(template)
	}
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Destination {
	fn from(templates: Vec<(K, V)>) -> Self {
		Destination::Named(
			templates
				.into_iter()
				.map(|(label, template)| (label.into(), template.into()))
				.collect(),
		)
	}
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Destination {
	fn from(templates: [(K, V); N]) -> Self {
		Destination::from(Vec::from(templates))
	}
}

impl From<BTreeMap<String, String>> for Destination {
	fn from(templates: BTreeMap<String, String>) -> Self {
		Destination::Named(templates.into_iter().collect())
	}
}

#[derive(Debug, Clone)]
enum DestinationTemplates {
	Single(Template),
	Named(Vec<(String, Template)>),
}

impl DestinationTemplates {
	fn compile(destination: &Destination, source: &SourcePattern) -> Result<Self> {
		match destination {
			Destination::Single(template) => Ok(DestinationTemplates::Single(Template::new(
				template,
				TemplateKind::Destination,
				source,
			)?)),
			Destination::Named(templates) => {
				let mut seen = HashSet::new();
				let mut compiled = Vec::with_capacity(templates.len());
				for (label, template) in templates {
					if !seen.insert(label.as_str()) {
						return Err(FprulesError::DuplicateDestination {
							label: label.clone(),
						});
					}
					compiled.push((
						label.clone(),
						Template::new(template, TemplateKind::Destination, source)?,
					));
				}
				Ok(DestinationTemplates::Named(compiled))
			}
		}
	}

	fn render(&self, matched: &MatchResult) -> Result<DestinationPath> {
		match self {
			DestinationTemplates::Single(template) => {
				Ok(DestinationPath::Single(template.render(matched)?))
			}
			DestinationTemplates::Named(templates) => templates
				.iter()
				.map(|(label, template)| Ok((label.clone(), template.render(matched)?)))
				.collect::<Result<Vec<_>>>()
				.map(DestinationPath::Named),
		}
	}
}

/// A validated file pattern rule, ready to be enumerated any number of times.
#[derive(Debug, Clone)]
pub struct FilePattern {
	source: SourcePattern,
	destinations: DestinationTemplates,
	names: Template,
}

impl FilePattern {
	/// Parse the source pattern and validate every template.
	///
	/// All pattern and template errors are raised here, before any
	/// filesystem access.
	pub fn new(source: &str, destination: &Destination, names: Option<&str>) -> Result<Self> {
		let source = SourcePattern::parse(source)?;
		let destinations = DestinationTemplates::compile(destination, &source)?;
		let names = match names {
			Some(template) => Template::new(template, TemplateKind::Name, &source)?,
			None => Template::default_name(&source),
		};

		Ok(FilePattern {
			source,
			destinations,
			names,
		})
	}

	pub fn source(&self) -> &SourcePattern {
		&self.source
	}

	pub fn names(&self) -> &Template {
		&self.names
	}

	/// Lazily enumerate matching items. Each call queries the filesystem again.
	pub fn iter(&self) -> Result<Items<'_>> {
		Ok(Items {
			rule: self,
			matches: enumerate(&self.source)?,
		})
	}

	/// Enumerate and collect every item.
	pub fn collect(&self) -> Result<Vec<FileItem>> {
		self.iter()?.collect()
	}

	fn item(&self, matched: MatchResult) -> Result<FileItem> {
		let dst_path = self.destinations.render(&matched)?;
		let name = to_posix(&self.names.render(&matched)?);
		Ok(FileItem {
			name,
			src_path: matched.path,
			dst_path,
		})
	}
}

/// Lazy sequence of [`FileItem`]s for one [`FilePattern`].
pub struct Items<'a> {
	rule: &'a FilePattern,
	matches: Matches<'a>,
}

impl Iterator for Items<'_> {
	type Item = Result<FileItem>;

	fn next(&mut self) -> Option<Self::Item> {
		Some(self.matches.next()?.and_then(|matched| self.rule.item(matched)))
	}
}

/// Match `source` and derive destination paths and a name for every match.
///
/// ```no_run
/// use fprules::rules::file_pattern;
///
/// let todo = file_pattern("./data/defs/**/*.ddl", "./data/raw/%.csv", None).unwrap();
/// for item in todo.iter().unwrap() {
///     let item = item.unwrap();
///     println!("{item}");
/// }
/// ```
pub fn file_pattern(
	source: impl AsRef<Path>,
	destination: impl Into<Destination>,
	names: Option<&str>,
) -> Result<FilePattern> {
	let source = source.as_ref();
	let source_str = source.to_str().ok_or_else(|| FprulesError::NonUtf8Path {
		path: source.to_path_buf(),
	})?;
	FilePattern::new(source_str, &destination.into(), names)
}
