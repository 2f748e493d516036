//! Failure taxonomy for activation evaluators.

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

/// Error type returned by user-supplied guards, resolvers and loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Cloneable form of [`BoxError`], retained for views to inspect.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Why an evaluation channel ended in `Failed`.
///
/// These never reach the host: evaluators log them and the owning activation
/// converts them into a `Failed` status.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EvalError {
	/// A guard resolved to `false`.
	#[error("guard {guard} denied activation")]
	GuardDenied {
		/// Label or position of the denying guard.
		guard: String,
	},

	/// A guard returned an error.
	#[error("guard {guard} failed: {source}")]
	GuardFailed {
		/// Label or position of the failing guard.
		guard: String,
		/// The error the guard produced.
		source: SharedError,
	},

	/// A guard panicked, either while being built or while checking.
	#[error("guard {guard} panicked: {message}")]
	GuardPanicked {
		/// Label or position of the panicking guard.
		guard: String,
		/// Panic payload, if it was a string.
		message: String,
	},

	/// A resolver returned an error.
	#[error("resolver `{key}` failed: {source}")]
	ResolverFailed {
		/// Key the resolver was registered under.
		key: String,
		/// The error the resolver produced.
		source: SharedError,
	},

	/// A resolver panicked.
	#[error("resolver `{key}` panicked: {message}")]
	ResolverPanicked {
		/// Key the resolver was registered under.
		key: String,
		/// Panic payload, if it was a string.
		message: String,
	},

	/// The deferred view could not be loaded.
	#[error("deferred view failed to load: {source}")]
	LazyLoadFailed {
		/// The loader's error, also exposed to the loading view.
		source: SharedError,
	},

	/// The deferred view loader panicked.
	#[error("deferred view loader panicked: {message}")]
	LazyLoadPanicked {
		/// Panic payload, if it was a string.
		message: String,
	},
}

/// Coarse classification of an [`EvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
	Guard,
	Resolver,
	LazyLoad,
}

impl EvalError {
	pub fn kind(&self) -> FailureKind {
		match self {
			Self::GuardDenied { .. } | Self::GuardFailed { .. } | Self::GuardPanicked { .. } => FailureKind::Guard,
			Self::ResolverFailed { .. } | Self::ResolverPanicked { .. } => FailureKind::Resolver,
			Self::LazyLoadFailed { .. } | Self::LazyLoadPanicked { .. } => FailureKind::LazyLoad,
		}
	}

	/// Returns `true` if a guard simply said no rather than erroring.
	pub fn is_denial(&self) -> bool {
		matches!(self, Self::GuardDenied { .. })
	}
}

/// Result type for evaluator operations.
pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// What a user-supplied guard, resolver or loader threw.
pub(crate) enum Thrown {
	Error(BoxError),
	Panic(String),
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_string()
	}
}
