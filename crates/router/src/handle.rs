//! Values handed to views: the activation handle, route params and the
//! shared location.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use waypost_activation::{ResolvedData, SharedError, Status};

/// Params captured by the path matcher, keyed by name.
///
/// A trailing `*` segment is captured under the key `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}
}

impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

#[derive(Debug, Default)]
struct LocationState {
	path: String,
	params: Params,
}

/// Shared, read-only view of the router's current location.
///
/// Clones observe the same state; the router updates it on every navigation.
#[derive(Debug, Clone, Default)]
pub struct Location {
	inner: Arc<RwLock<LocationState>>,
}

impl Location {
	pub fn new() -> Self {
		Self::default()
	}

	/// Matched path, with the base path and any query or fragment removed.
	pub fn path(&self) -> String {
		self.inner.read().path.clone()
	}

	pub fn params(&self) -> Params {
		self.inner.read().params.clone()
	}

	pub fn param(&self, name: &str) -> Option<String> {
		self.inner.read().params.get(name).map(str::to_owned)
	}

	pub(crate) fn set(&self, path: &str, params: Params) {
		let mut state = self.inner.write();
		state.path = path.to_owned();
		state.params = params;
	}
}

/// Activation outcome of one mounted route, as seen by its views.
///
/// Snapshotted at render time: a handle never changes after it is built.
#[derive(Debug, Clone)]
pub struct ActivationHandle {
	generation: u64,
	status: Status,
	guards: Status,
	resolvers: Status,
	lazy: Status,
	resolved: Option<Arc<ResolvedData>>,
	lazy_error: Option<SharedError>,
	params: Params,
}

impl ActivationHandle {
	pub(crate) fn new(
		generation: u64,
		status: Status,
		(guards, resolvers, lazy): (Status, Status, Status),
		resolved: Option<Arc<ResolvedData>>,
		lazy_error: Option<SharedError>,
		params: Params,
	) -> Self {
		Self {
			generation,
			status,
			guards,
			resolvers,
			lazy,
			resolved,
			lazy_error,
			params,
		}
	}

	/// Activation generation this handle was taken from.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Combined status of the node's channels.
	pub fn status(&self) -> Status {
		self.status
	}

	pub fn guard_status(&self) -> Status {
		self.guards
	}

	pub fn resolver_status(&self) -> Status {
		self.resolvers
	}

	pub fn lazy_status(&self) -> Status {
		self.lazy
	}

	/// Loader error of a failed deferred view.
	pub fn lazy_error(&self) -> Option<&SharedError> {
		self.lazy_error.as_ref()
	}

	/// Resolved values, present only once every resolver succeeded.
	pub fn resolved(&self) -> Option<&ResolvedData> {
		self.resolved.as_deref()
	}

	/// Typed access to one resolved value.
	pub fn data<T: Any>(&self, key: &str) -> Option<&T> {
		self.resolved()?.get_as(key)
	}

	pub fn params(&self) -> &Params {
		&self.params
	}
}
