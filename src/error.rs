use std::fmt;
use std::path::PathBuf;

/// Which kind of template failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
	Destination,
	Name,
}

impl fmt::Display for TemplateKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TemplateKind::Destination => f.write_str("Destination"),
			TemplateKind::Name => f.write_str("Name"),
		}
	}
}

/// Library-level structured errors for fprules.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum FprulesError {
	#[error("Invalid pattern '{pattern}': double-wildcard should be alone in its path element")]
	MisplacedDoubleWildcard { pattern: String },

	#[error("Invalid source pattern '{pattern}': several double-wildcards exist")]
	MultipleDoubleWildcards { pattern: String },

	#[error("Invalid glob pattern: {pattern}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source: glob::PatternError,
	},

	#[error("{kind} pattern can not contain star '*' wildcards, only '%' characters. Found '{template}'")]
	WildcardInTemplate { kind: TemplateKind, template: String },

	#[error(
		"{kind} pattern '{template}' uses a folder path '%%' but source pattern does not include any double-wildcard: '{pattern}'"
	)]
	UnexpectedCapture {
		kind: TemplateKind,
		template: String,
		pattern: String,
	},

	#[error("Destination label '{label}' is used more than once")]
	DuplicateDestination { label: String },

	#[error("No destination named '{label}'")]
	UnknownDestination { label: String },

	#[error("Item has a single destination, not named destinations")]
	NotNamed,

	#[error("Item has named destinations, not a single destination")]
	NotSingle,

	#[error("Path is not valid UTF-8: {path}")]
	NonUtf8Path { path: PathBuf },

	#[error("Failed to read matched path")]
	Walk(#[from] glob::GlobError),

	#[error("Could not recover the double-wildcard capture of {path}")]
	CaptureNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Rule '{rule}' has no destination or destinations")]
	MissingDestination { rule: String },
}

/// Result type alias using FprulesError.
pub type Result<T> = std::result::Result<T, FprulesError>;
