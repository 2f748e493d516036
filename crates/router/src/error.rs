use thiserror::Error;

/// Errors surfaced by the router itself.
///
/// Guard, resolver and lazy-load failures are not errors at this level: they
/// become `Failed` statuses on the owning activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouterError {
	/// No configured route matches the location.
	#[error("no route matches `{0}`")]
	NoMatch(String),

	/// The location does not start with the configured base path.
	#[error("location `{location}` is outside base path `{base}`")]
	OutsideBase {
		/// Requested location.
		location: String,
		/// Configured base path.
		base: String,
	},
}

/// Result type for router operations.
pub type Result<T, E = RouterError> = std::result::Result<T, E>;
