//! File pattern rules.
//!
//! This module handles:
//! - Parsing source patterns into a fixed root and a glob region
//! - Enumerating matches and recovering what the `**` captured
//! - Rendering destination and name templates for every match

pub mod compiled;
pub mod item;
pub mod matcher;
pub mod pattern;
pub mod rewriter;
pub mod todo;

pub use compiled::{CompiledRule, compile_rules};
pub use item::{DestinationPath, FileItem};
pub use matcher::{MatchResult, Matches, enumerate};
pub use pattern::{DoubleWildcard, SourcePattern};
pub use rewriter::{Template, normalize, to_posix, validate_template};
pub use todo::{Destination, FilePattern, Items, file_pattern};
