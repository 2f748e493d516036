//! Deferred view loading.
//!
//! The host owns the actual fetch and its suspense fallback. This evaluator
//! only observes the outcome: it never reports `Loading`, and on failure it
//! keeps the loader's error so a loading view can react to it.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::Status;
use crate::error::{BoxError, EvalError, SharedError, panic_message};

/// Future produced by one load attempt.
pub type LoadFuture<T> = BoxFuture<'static, Result<T, BoxError>>;

/// Deferred reference to a value fetched on demand.
pub struct LazyLoader<T> {
	load: Arc<dyn Fn() -> LoadFuture<T> + Send + Sync>,
}

impl<T> Clone for LazyLoader<T> {
	fn clone(&self) -> Self {
		Self {
			load: Arc::clone(&self.load),
		}
	}
}

impl<T> fmt::Debug for LazyLoader<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyLoader").finish_non_exhaustive()
	}
}

impl<T> LazyLoader<T>
where
	T: Send + 'static,
{
	pub fn new<F, Fut, E>(load: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, E>> + Send + 'static,
		E: Into<BoxError>,
	{
		Self {
			load: Arc::new(move || load().map(|result| result.map_err(Into::into)).boxed()),
		}
	}

	/// Loader that resolves immediately to a clone of `value`.
	pub fn ready(value: T) -> Self
	where
		T: Clone + Sync,
	{
		Self::new(move || std::future::ready(Ok::<_, BoxError>(value.clone())))
	}

	/// Starts one load attempt.
	pub fn load(&self) -> LoadFuture<T> {
		(self.load)()
	}
}

/// Outcome of a lazy load.
pub enum LazyOutcome<T> {
	Loaded(T),
	Failed {
		/// Classified failure, for logs.
		error: EvalError,
		/// The loader's own error, retained for the loading view.
		source: SharedError,
	},
}

impl<T> LazyOutcome<T> {
	pub fn status(&self) -> Status {
		match self {
			Self::Loaded(_) => Status::Loaded,
			Self::Failed { .. } => Status::Failed,
		}
	}

	/// The retained loader error, if the load failed.
	pub fn error(&self) -> Option<&SharedError> {
		match self {
			Self::Loaded(_) => None,
			Self::Failed { source, .. } => Some(source),
		}
	}
}

impl<T> fmt::Debug for LazyOutcome<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Loaded(_) => f.write_str("Loaded(..)"),
			Self::Failed { error, .. } => f.debug_tuple("Failed").field(error).finish(),
		}
	}
}

/// Observes one deferred load.
#[derive(Debug, Clone)]
pub struct LazyLoadEvaluator<T> {
	loader: LazyLoader<T>,
}

impl<T> LazyLoadEvaluator<T>
where
	T: Send + 'static,
{
	pub fn new(loader: LazyLoader<T>) -> Self {
		Self { loader }
	}

	/// The host's suspense mechanism governs the fetch, so this channel starts
	/// `Initial` rather than `Loading`.
	pub fn status_before_evaluating(&self) -> Status {
		Status::Initial
	}

	pub async fn evaluate(&self) -> LazyOutcome<T> {
		let attempt = std::panic::catch_unwind(AssertUnwindSafe(|| self.loader.load()));
		let settled = match attempt {
			Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
			Err(payload) => Err(payload),
		};

		match settled {
			Ok(Ok(value)) => {
				tracing::trace!("route.lazy.loaded");
				LazyOutcome::Loaded(value)
			}
			Ok(Err(error)) => {
				let source: SharedError = Arc::from(error);
				tracing::warn!(error = %source, "route.lazy.error");
				LazyOutcome::Failed {
					error: EvalError::LazyLoadFailed { source: Arc::clone(&source) },
					source,
				}
			}
			Err(payload) => {
				let message = panic_message(payload);
				tracing::warn!(message = %message, "route.lazy.panic");
				let error = EvalError::LazyLoadPanicked { message };
				LazyOutcome::Failed {
					source: Arc::new(error.clone()),
					error,
				}
			}
		}
	}
}
