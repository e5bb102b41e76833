use crate::error::{FprulesError, Result};
use crate::rules::pattern::SourcePattern;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A path that satisfied a source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
	/// The matched file or directory.
	pub path: PathBuf,

	/// The part of `path` consumed by the `**`, or `None` when the pattern
	/// has no double wildcard. An empty capture is an empty path.
	pub capture: Option<PathBuf>,
}

impl MatchResult {
	/// File name without its final extension, or the directory's own name.
	pub fn stem(&self) -> Result<String> {
		match self.path.file_stem() {
			None => Ok(String::new()),
			Some(stem) => stem
				.to_str()
				.map(str::to_string)
				.ok_or_else(|| FprulesError::NonUtf8Path {
					path: self.path.clone(),
				}),
		}
	}
}

/// Build the string handed to the glob primitive for `pattern` under `dir`.
fn glob_pattern_in(dir: &Path, pattern: &str) -> Result<String> {
	if dir.as_os_str().is_empty() {
		return Ok(pattern.to_string());
	}
	let dir_str = dir.to_str().ok_or_else(|| FprulesError::NonUtf8Path {
		path: dir.to_path_buf(),
	})?;
	let escaped = glob::Pattern::escape(dir_str);
	if escaped.ends_with(std::path::is_separator) {
		Ok(format!("{escaped}{pattern}"))
	} else {
		Ok(format!("{escaped}/{pattern}"))
	}
}

fn glob_in(dir: &Path, pattern: &str) -> Result<glob::Paths> {
	let full = glob_pattern_in(dir, pattern)?;
	debug!("glob {:?}", full);
	glob::glob(&full).map_err(|source| FprulesError::InvalidGlob {
		pattern: full.clone(),
		source,
	})
}

/// Cached glob results of the suffix pattern, keyed by candidate directory.
#[derive(Debug, Default)]
struct SuffixProbe {
	cache: HashMap<PathBuf, HashSet<PathBuf>>,
}

impl SuffixProbe {
	/// Whether `path` is among the results of globbing `suffix` under `dir`.
	fn matches(&mut self, dir: &Path, suffix: &str, path: &Path) -> Result<bool> {
		if !self.cache.contains_key(dir) {
			let found = glob_in(dir, suffix)?.collect::<std::result::Result<HashSet<_>, _>>()?;
			self.cache.insert(dir.to_path_buf(), found);
		}
		Ok(self.cache.get(dir).is_some_and(|found| found.contains(path)))
	}
}

enum MatchSource {
	Literal(Option<PathBuf>),
	Glob {
		/// Matches where a trailing `**` consumed nothing, yielded first.
		anchors: std::vec::IntoIter<PathBuf>,
		paths: glob::Paths,
	},
}

/// Lazy sequence of matches for one source pattern.
///
/// Each call to [`enumerate`] queries the filesystem afresh.
pub struct Matches<'a> {
	pattern: &'a SourcePattern,
	root: PathBuf,
	source: MatchSource,
	yielded_anchors: HashSet<PathBuf>,
	probe: SuffixProbe,
}

/// Enumerate every path matching `pattern`.
///
/// A pattern without wildcards yields exactly its literal path, whether or
/// not it exists. A trailing `**` also matches the directories it hangs off,
/// with an empty capture.
pub fn enumerate(pattern: &SourcePattern) -> Result<Matches<'_>> {
	let root = pattern.root();
	let source = match pattern.search_pattern() {
		None => MatchSource::Literal(Some(pattern.literal_path())),
		Some(search) => MatchSource::Glob {
			anchors: trailing_anchors(pattern, &root)?.into_iter(),
			paths: glob_in(&root, &search)?,
		},
	};

	Ok(Matches {
		pattern,
		root,
		source,
		yielded_anchors: HashSet::new(),
		probe: SuffixProbe::default(),
	})
}

/// Directories matched by the segments before a trailing `**`.
///
/// The glob primitive never reports these itself.
fn trailing_anchors(pattern: &SourcePattern, root: &Path) -> Result<Vec<PathBuf>> {
	let Some(dw) = pattern.double_wildcard() else {
		return Ok(Vec::new());
	};
	if dw.suffix.is_some() {
		return Ok(Vec::new());
	}

	let glob_start = pattern.glob_start().unwrap_or(dw.index);
	let candidates = if glob_start == dw.index {
		if root.as_os_str().is_empty() {
			vec![PathBuf::from(".")]
		} else {
			vec![root.to_path_buf()]
		}
	} else {
		let head = pattern.parts()[glob_start..dw.index].join("/");
		glob_in(root, &head)?.collect::<std::result::Result<Vec<_>, _>>()?
	};

	Ok(candidates.into_iter().filter(|dir| dir.is_dir()).collect())
}

impl Matches<'_> {
	/// Recover the sub-path of `path` consumed by the `**`.
	///
	/// The glob only reports final paths, so try every split of the variable
	/// part, shortest first, and keep the first one under which the suffix
	/// pattern itself produces `path`.
	fn capture_of(&mut self, path: &Path) -> Result<PathBuf> {
		let pattern = self.pattern;
		let Some(dw) = pattern.double_wildcard() else {
			return Ok(PathBuf::new());
		};
		let glob_start = pattern.glob_start().unwrap_or(0);
		let fixed = dw.index - glob_start;

		let not_found = || FprulesError::CaptureNotFound {
			path: path.to_path_buf(),
		};

		let tail: Vec<_> = path
			.strip_prefix(&self.root)
			.map_err(|_| not_found())?
			.components()
			.collect();
		if tail.len() < fixed {
			return Err(not_found());
		}
		let mut anchor = self.root.clone();
		anchor.extend(&tail[..fixed]);
		let variable = &tail[fixed..];

		let Some(suffix) = dw.suffix.as_deref() else {
			return Ok(variable.iter().collect());
		};

		for k in 0..variable.len() {
			let mut candidate = anchor.clone();
			candidate.extend(&variable[..k]);
			trace!("probing {:?} against {:?} for {:?}", candidate, suffix, path);
			if self.probe.matches(&candidate, suffix, path)? {
				return Ok(variable[..k].iter().collect());
			}
		}

		if variable.is_empty() {
			Ok(PathBuf::new())
		} else {
			Err(not_found())
		}
	}
}

impl Iterator for Matches<'_> {
	type Item = Result<MatchResult>;

	fn next(&mut self) -> Option<Self::Item> {
		let path = match &mut self.source {
			MatchSource::Literal(path) => {
				return path.take().map(|path| Ok(MatchResult { path, capture: None }));
			}
			MatchSource::Glob { anchors, paths } => {
				if let Some(anchor) = anchors.next() {
					debug!("matched {:?} with empty trailing capture", anchor);
					self.yielded_anchors.insert(anchor.clone());
					return Some(Ok(MatchResult {
						path: anchor,
						capture: Some(PathBuf::new()),
					}));
				}
				loop {
					match paths.next()? {
						Ok(path) if self.yielded_anchors.contains(&path) => continue,
						Ok(path) => break path,
						Err(e) => return Some(Err(e.into())),
					}
				}
			}
		};

		if !self.pattern.has_double_wildcard() {
			return Some(Ok(MatchResult { path, capture: None }));
		}

		Some(self.capture_of(&path).map(|capture| {
			debug!("matched {:?} with capture {:?}", path, capture);
			MatchResult {
				path,
				capture: Some(capture),
			}
		}))
	}
}
