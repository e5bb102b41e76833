//! fprules - file pattern rules, in the spirit of make pattern rules.
//!
//! This library turns a glob source pattern and one or more destination
//! templates into a "to-do list" of (source, destination, name) items:
//! - `%` in a template is replaced by the matched file's stem
//! - `%%` is replaced by the sub-path captured by the `**` of the source
//!
//! It only produces the list. Running anything on the items is up to the
//! caller.
//!
//! # Example
//!
//! ```no_run
//! use fprules::rules::file_pattern;
//!
//! let todo = file_pattern("./defs/**/*.ddl", "./downloaded/%%/%.csv", None).unwrap();
//! for item in todo.collect().unwrap() {
//!     println!("{}: {} -> {}", item.name, item.src_path.display(), item.dst_path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod rules;

pub use error::{FprulesError, Result, TemplateKind};
pub use rules::{Destination, DestinationPath, FileItem, FilePattern, file_pattern};
