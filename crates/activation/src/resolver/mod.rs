//! Concurrent named data resolvers.
//!
//! Resolvers run fan-out/fan-in: every factory is invoked up front, all
//! resolvers are awaited together, and the set either yields a complete
//! [`ResolvedData`] map or fails as a whole. A view never sees a partially
//! populated map.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use indexmap::IndexMap;

use crate::Status;
use crate::error::{BoxError, EvalError, Result, Thrown, panic_message};


/// Type-erased resolver payload. May be absent.
#[derive(Clone, Default)]
pub struct ResolvedValue(Option<Arc<dyn Any + Send + Sync>>);

impl ResolvedValue {
	/// Wraps `value`. Wrapping a `ResolvedValue` returns it unchanged.
	pub fn new<T>(value: T) -> Self
	where
		T: Any + Send + Sync,
	{
		let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
		match boxed.downcast::<ResolvedValue>() {
			Ok(inner) => *inner,
			Err(other) => Self(Some(Arc::from(other))),
		}
	}

	/// A legitimately empty payload.
	pub const fn absent() -> Self {
		Self(None)
	}

	pub fn is_absent(&self) -> bool {
		self.0.is_none()
	}

	/// Borrows the payload as `T`, if present and of that type.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
	}

	/// Shares the payload as `Arc<T>`, if present and of that type.
	pub fn downcast<T>(&self) -> Option<Arc<T>>
	where
		T: Any + Send + Sync,
	{
		self.0.clone()?.downcast::<T>().ok()
	}
}

impl fmt::Debug for ResolvedValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			Some(_) => f.write_str("ResolvedValue(..)"),
			None => f.write_str("ResolvedValue(absent)"),
		}
	}
}

/// Resolver results keyed by name, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedData {
	values: IndexMap<String, ResolvedValue>,
}

impl ResolvedData {
	pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
		self.values.get(key)
	}

	/// Typed access to one payload. `None` if missing, absent or mistyped.
	pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
		self.values.get(key)?.downcast_ref::<T>()
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl FromIterator<(String, ResolvedValue)> for ResolvedData {
	fn from_iter<I: IntoIterator<Item = (String, ResolvedValue)>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}

/// Future produced by one resolver.
pub type ResolverFuture = BoxFuture<'static, Result<ResolvedValue, BoxError>>;

/// One activation's instance of a resolver.
pub trait Resolver: Send {
	/// Produces the payload. Called at most once per instance.
	fn resolve(self: Box<Self>) -> ResolverFuture;
}

impl<F, Fut, T, E> Resolver for F
where
	F: FnOnce() -> Fut + Send,
	Fut: Future<Output = Result<T, E>> + Send + 'static,
	T: Any + Send + Sync,
	E: Into<BoxError>,
{
	fn resolve(self: Box<Self>) -> ResolverFuture {
		(*self)().map(|result| result.map(ResolvedValue::new).map_err(Into::into)).boxed()
	}
}

type ResolverFactory = dyn Fn() -> Box<dyn Resolver> + Send + Sync;

/// Factory for a resolver, re-invoked on every activation.
#[derive(Clone)]
pub struct ResolverSpec {
	factory: Arc<ResolverFactory>,
}

impl ResolverSpec {
	pub fn new<F, R>(factory: F) -> Self
	where
		F: Fn() -> R + Send + Sync + 'static,
		R: Resolver + 'static,
	{
		Self {
			factory: Arc::new(move || Box::new(factory()) as Box<dyn Resolver>),
		}
	}

	/// Resolver backed by a synchronous producer.
	pub fn from_fn<F, T, E>(produce: F) -> Self
	where
		F: Fn() -> Result<T, E> + Send + Sync + 'static,
		T: Any + Send + Sync,
		E: Into<BoxError> + Send + 'static,
	{
		let produce = Arc::new(produce);
		Self::new(move || {
			let produce = Arc::clone(&produce);
			move || std::future::ready(produce())
		})
	}

	/// Resolver backed by an async producer.
	pub fn from_async<F, Fut, T, E>(produce: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, E>> + Send + 'static,
		T: Any + Send + Sync,
		E: Into<BoxError>,
	{
		let produce = Arc::new(produce);
		Self::new(move || {
			let produce = Arc::clone(&produce);
			move || produce()
		})
	}

	/// Resolver that always yields a clone of `value`.
	pub fn value<T>(value: T) -> Self
	where
		T: Any + Clone + Send + Sync,
	{
		Self::from_fn(move || Ok::<_, BoxError>(value.clone()))
	}

	/// Builds a fresh resolver instance.
	pub fn instantiate(&self) -> Box<dyn Resolver> {
		(self.factory)()
	}
}

impl fmt::Debug for ResolverSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolverSpec").finish_non_exhaustive()
	}
}

/// Runs a named resolver set concurrently.
#[derive(Debug, Clone, Default)]
pub struct ResolverEvaluator {
	resolvers: IndexMap<String, ResolverSpec>,
}

impl ResolverEvaluator {
	pub fn new<K>(resolvers: impl IntoIterator<Item = (K, ResolverSpec)>) -> Self
	where
		K: Into<String>,
	{
		Self {
			resolvers: resolvers.into_iter().map(|(k, spec)| (k.into(), spec)).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.resolvers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.resolvers.is_empty()
	}

	/// Status to publish once resolvers become eligible to start.
	pub fn status_before_evaluating(&self) -> Status {
		if self.resolvers.is_empty() { Status::Loaded } else { Status::Loading }
	}

	/// Builds every resolver, then awaits them all together.
	///
	/// The first failure fails the set; values that already settled are
	/// dropped with it.
	pub async fn evaluate(&self) -> Result<ResolvedData> {
		let mut built = Vec::with_capacity(self.resolvers.len());
		for (key, spec) in &self.resolvers {
			let resolver = std::panic::catch_unwind(AssertUnwindSafe(|| spec.instantiate())).map_err(|p| failure(key, Thrown::Panic(panic_message(p))))?;
			built.push((key.clone(), resolver));
		}

		let mut pending = Vec::with_capacity(built.len());
		for (key, resolver) in built {
			let future = std::panic::catch_unwind(AssertUnwindSafe(|| resolver.resolve())).map_err(|p| failure(&key, Thrown::Panic(panic_message(p))))?;
			pending.push(settle(key, future));
		}

		let values = try_join_all(pending).await?;
		tracing::trace!(count = values.len(), "route.resolvers.loaded");
		Ok(values.into_iter().collect())
	}
}

async fn settle(key: String, future: ResolverFuture) -> Result<(String, ResolvedValue)> {
	match AssertUnwindSafe(future).catch_unwind().await {
		Ok(Ok(value)) => Ok((key, value)),
		Ok(Err(error)) => Err(failure(&key, Thrown::Error(error))),
		Err(payload) => Err(failure(&key, Thrown::Panic(panic_message(payload)))),
	}
}

fn failure(key: &str, thrown: Thrown) -> EvalError {
	match thrown {
		Thrown::Error(error) => {
			tracing::warn!(resolver = key, error = %error, "route.resolver.error");
			EvalError::ResolverFailed {
				key: key.to_string(),
				source: Arc::from(error),
			}
		}
		Thrown::Panic(message) => {
			tracing::warn!(resolver = key, message = %message, "route.resolver.panic");
			EvalError::ResolverPanicked {
				key: key.to_string(),
				message,
			}
		}
	}
}
