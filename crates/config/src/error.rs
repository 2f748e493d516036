//! Error types for route table parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a route table.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading a route table file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A required field is missing from the configuration.
	#[error("missing required field: {0}")]
	MissingField(String),

	/// A route references a name the registry does not know.
	#[error("unknown {kind} `{name}`{}", suggestion.as_ref().map(|s| format!(" (did you mean `{s}`?)")).unwrap_or_default())]
	UnknownName {
		/// Registry section searched, e.g. "guard".
		kind: &'static str,
		/// The unresolved name.
		name: String,
		/// A registered name close to the requested one.
		suggestion: Option<String>,
	},

	/// A node carries a value of the wrong type.
	#[error("invalid value for `{node}`: expected {expected}")]
	InvalidValue {
		/// The node's KDL name.
		node: String,
		/// The expected value shape.
		expected: &'static str,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Non-fatal warning during route table parsing.
///
/// Collected during parsing and reported to the caller; the table still loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// A node name that means nothing in its block.
	UnknownNode {
		/// The node's KDL name.
		node: String,
		/// The block it was found in.
		found_in: &'static str,
	},
	/// A route sets both `view` and `deferred`; the deferred view wins.
	ViewShadowed {
		/// Path or label of the route.
		route: String,
	},
	/// A resolver key appears twice in one route; the last one wins.
	DuplicateResolver {
		/// Path or label of the route.
		route: String,
		/// The repeated key.
		key: String,
	},
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigWarning::UnknownNode { node, found_in } => {
				write!(f, "'{node}' in {found_in} will be ignored")
			}
			ConfigWarning::ViewShadowed { route } => {
				write!(f, "route '{route}' sets both view and deferred; the deferred view is used")
			}
			ConfigWarning::DuplicateResolver { route, key } => {
				write!(f, "route '{route}' resolves '{key}' more than once; the last resolver is used")
			}
		}
	}
}
