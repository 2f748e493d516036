//! Sequential access guards.
//!
//! A [`GuardSpec`] is a factory: every activation builds fresh [`Guard`]
//! instances from it, so closures that capture route parameters observe the
//! values current at activation time. [`GuardEvaluator`] walks the list in
//! declaration order and stops at the first guard that does not pass.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::Status;
use crate::error::{BoxError, EvalError, Result, Thrown, panic_message};


/// Future produced by one guard check.
pub type GuardFuture = BoxFuture<'static, Result<bool, BoxError>>;

/// Values a guard may produce: a plain verdict or a fallible one.
pub trait IntoGuardResult {
	fn into_guard_result(self) -> Result<bool, BoxError>;
}

impl IntoGuardResult for bool {
	fn into_guard_result(self) -> Result<bool, BoxError> {
		Ok(self)
	}
}

impl<E> IntoGuardResult for Result<bool, E>
where
	E: Into<BoxError>,
{
	fn into_guard_result(self) -> Result<bool, BoxError> {
		self.map_err(Into::into)
	}
}

/// One activation's instance of a guard.
pub trait Guard: Send {
	/// Runs the check. Called at most once per instance.
	fn check(self: Box<Self>) -> GuardFuture;
}

impl<F, Fut> Guard for F
where
	F: FnOnce() -> Fut + Send,
	Fut: Future + Send + 'static,
	Fut::Output: IntoGuardResult,
{
	fn check(self: Box<Self>) -> GuardFuture {
		(*self)().map(IntoGuardResult::into_guard_result).boxed()
	}
}

type GuardFactory = dyn Fn() -> Box<dyn Guard> + Send + Sync;

/// Factory for a guard, re-invoked on every activation.
#[derive(Clone)]
pub struct GuardSpec {
	label: Option<Arc<str>>,
	factory: Arc<GuardFactory>,
}

impl GuardSpec {
	/// Wraps a factory producing a fresh guard per activation.
	pub fn new<F, G>(factory: F) -> Self
	where
		F: Fn() -> G + Send + Sync + 'static,
		G: Guard + 'static,
	{
		Self {
			label: None,
			factory: Arc::new(move || Box::new(factory()) as Box<dyn Guard>),
		}
	}

	/// Guard backed by a synchronous check.
	pub fn from_fn<F, O>(check: F) -> Self
	where
		F: Fn() -> O + Send + Sync + 'static,
		O: IntoGuardResult + Send + 'static,
	{
		let check = Arc::new(check);
		Self::new(move || {
			let check = Arc::clone(&check);
			move || std::future::ready(check())
		})
	}

	/// Guard backed by an async check.
	pub fn from_async<F, Fut>(check: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future + Send + 'static,
		Fut::Output: IntoGuardResult,
	{
		let check = Arc::new(check);
		Self::new(move || {
			let check = Arc::clone(&check);
			move || check()
		})
	}

	/// Names the guard in logs and errors.
	#[must_use]
	pub fn labeled(mut self, label: impl Into<Arc<str>>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Builds a fresh guard instance.
	pub fn instantiate(&self) -> Box<dyn Guard> {
		(self.factory)()
	}

	fn describe(&self, index: usize) -> String {
		match &self.label {
			Some(label) => format!("`{label}`"),
			None => format!("#{index}"),
		}
	}
}

impl fmt::Debug for GuardSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GuardSpec").field("label", &self.label).finish_non_exhaustive()
	}
}

/// Runs an ordered guard list sequentially.
#[derive(Debug, Clone, Default)]
pub struct GuardEvaluator {
	guards: Vec<GuardSpec>,
}

impl GuardEvaluator {
	pub fn new(guards: impl IntoIterator<Item = GuardSpec>) -> Self {
		Self {
			guards: guards.into_iter().collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.guards.len()
	}

	pub fn is_empty(&self) -> bool {
		self.guards.is_empty()
	}

	/// Status to publish before the walk starts.
	///
	/// An empty list is already `Loaded`, so no `Loading` is ever surfaced for it.
	pub fn status_before_evaluating(&self) -> Status {
		if self.guards.is_empty() { Status::Loaded } else { Status::Loading }
	}

	/// Awaits every guard in order, stopping at the first that does not pass.
	///
	/// Guards after a denial are never built or invoked. Errors and panics are
	/// logged and count as a denial.
	pub async fn evaluate(&self) -> Result<()> {
		for (index, spec) in self.guards.iter().enumerate() {
			let guard = spec.describe(index);
			let verdict = check(spec).await;
			match verdict {
				Ok(true) => {
					tracing::trace!(guard = %guard, "route.guard.passed");
				}
				Ok(false) => {
					tracing::debug!(guard = %guard, "route.guard.denied");
					return Err(EvalError::GuardDenied { guard });
				}
				Err(Thrown::Error(error)) => {
					tracing::warn!(guard = %guard, error = %error, "route.guard.error");
					return Err(EvalError::GuardFailed {
						guard,
						source: Arc::from(error),
					});
				}
				Err(Thrown::Panic(message)) => {
					tracing::warn!(guard = %guard, message = %message, "route.guard.panic");
					return Err(EvalError::GuardPanicked { guard, message });
				}
			}
		}
		Ok(())
	}
}

async fn check(spec: &GuardSpec) -> Result<bool, Thrown> {
	let pending = std::panic::catch_unwind(AssertUnwindSafe(|| spec.instantiate().check())).map_err(|p| Thrown::Panic(panic_message(p)))?;
	match AssertUnwindSafe(pending).catch_unwind().await {
		Ok(Ok(verdict)) => Ok(verdict),
		Ok(Err(error)) => Err(Thrown::Error(error)),
		Err(payload) => Err(Thrown::Panic(panic_message(payload))),
	}
}
