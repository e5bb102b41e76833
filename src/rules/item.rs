use crate::error::{FprulesError, Result};
use crate::rules::rewriter::to_posix;
use std::fmt;
use std::path::{Path, PathBuf};

/// Rendered destination(s) of a [`FileItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationPath {
	Single(PathBuf),

	/// One path per label, in declaration order.
	Named(Vec<(String, PathBuf)>),
}

impl DestinationPath {
	/// The destination for `label`.
	pub fn get(&self, label: &str) -> Result<&Path> {
		match self {
			DestinationPath::Single(_) => Err(FprulesError::NotNamed),
			DestinationPath::Named(paths) => paths
				.iter()
				.find(|(name, _)| name == label)
				.map(|(_, path)| path.as_path())
				.ok_or_else(|| FprulesError::UnknownDestination {
					label: label.to_string(),
				}),
		}
	}

	/// The destination of a single-template item.
	pub fn single(&self) -> Result<&Path> {
		match self {
			DestinationPath::Single(path) => Ok(path),
			DestinationPath::Named(_) => Err(FprulesError::NotSingle),
		}
	}
}

impl fmt::Display for DestinationPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DestinationPath::Single(path) => f.write_str(&to_posix(path)),
			DestinationPath::Named(paths) => {
				let rendered: Vec<_> = paths
					.iter()
					.map(|(label, path)| format!("{label}={}", to_posix(path)))
					.collect();
				write!(f, "{{{}}}", rendered.join(", "))
			}
		}
	}
}

/// One entry of the to-do list: a matched source and what to derive from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
	/// Display name, unique across the result set by default.
	pub name: String,

	/// The matched file or directory.
	pub src_path: PathBuf,

	pub dst_path: DestinationPath,
}

impl fmt::Display for FileItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[{}] {} -> {}",
			self.name,
			to_posix(&self.src_path),
			self.dst_path
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn named_item() -> FileItem {
		FileItem {
			name: "bar/file3".to_string(),
			src_path: PathBuf::from("foo/bar/file3.yaml"),
			dst_path: DestinationPath::Named(vec![
				("flat".to_string(), PathBuf::from("target/file3.toto")),
				("nested".to_string(), PathBuf::from("bar/target2/file3")),
			]),
		}
	}

	#[test]
	fn test_get_named_destination() {
		let item = named_item();
		assert_eq!(
			item.dst_path.get("nested").unwrap(),
			Path::new("bar/target2/file3")
		);
	}

	#[test]
	fn test_get_unknown_label() {
		let item = named_item();
		match item.dst_path.get("missing").unwrap_err() {
			FprulesError::UnknownDestination { label } => assert_eq!(label, "missing"),
			_ => panic!("Expected UnknownDestination error"),
		}
	}

	#[test]
	fn test_wrong_variant_accessors() {
		let single = DestinationPath::Single(PathBuf::from("target/x"));
		assert!(matches!(single.get("flat"), Err(FprulesError::NotNamed)));
		assert_eq!(single.single().unwrap(), Path::new("target/x"));
		assert!(matches!(named_item().dst_path.single(), Err(FprulesError::NotSingle)));
	}

	#[test]
	fn test_display_single() {
		let item = FileItem {
			name: "xfile".to_string(),
			src_path: PathBuf::from("foo/xfile.yml"),
			dst_path: DestinationPath::Single(PathBuf::from("target/xfile.toto")),
		};
		assert_eq!(item.to_string(), "[xfile] foo/xfile.yml -> target/xfile.toto");
	}

	#[test]
	fn test_display_named_keeps_order() {
		assert_eq!(
			named_item().to_string(),
			"[bar/file3] foo/bar/file3.yaml -> {flat=target/file3.toto, nested=bar/target2/file3}"
		);
	}
}
