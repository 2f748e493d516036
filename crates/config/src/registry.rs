//! Named building blocks that route tables refer to.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use waypost_router::{GuardSpec, LazyLoader, LoadingView, ResolverSpec, View};

use crate::error::{ConfigError, Result};
use crate::kdl_util::suggest;

/// Guards, resolvers and views addressable by name from KDL.
#[derive(Default, Clone)]
pub struct RouteRegistry {
	views: IndexMap<String, Arc<dyn View>>,
	deferred: IndexMap<String, LazyLoader<Arc<dyn View>>>,
	loading_views: IndexMap<String, Arc<dyn LoadingView>>,
	guards: IndexMap<String, GuardSpec>,
	resolvers: IndexMap<String, ResolverSpec>,
}

impl RouteRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn view(mut self, name: impl Into<String>, view: impl View + 'static) -> Self {
		self.views.insert(name.into(), Arc::new(view));
		self
	}

	pub fn deferred_view(mut self, name: impl Into<String>, loader: LazyLoader<Arc<dyn View>>) -> Self {
		self.deferred.insert(name.into(), loader);
		self
	}

	pub fn loading_view(mut self, name: impl Into<String>, view: impl LoadingView + 'static) -> Self {
		self.loading_views.insert(name.into(), Arc::new(view));
		self
	}

	/// Registers a guard. Unlabeled guards take `name` as their label.
	pub fn guard(mut self, name: impl Into<String>, guard: GuardSpec) -> Self {
		let name = name.into();
		let guard = if guard.label().is_some() { guard } else { guard.labeled(name.as_str()) };
		self.guards.insert(name, guard);
		self
	}

	pub fn resolver(mut self, name: impl Into<String>, resolver: ResolverSpec) -> Self {
		self.resolvers.insert(name.into(), resolver);
		self
	}

	pub(crate) fn lookup_view(&self, name: &str) -> Result<Arc<dyn View>> {
		lookup(&self.views, "view", name).cloned()
	}

	pub(crate) fn lookup_deferred(&self, name: &str) -> Result<LazyLoader<Arc<dyn View>>> {
		lookup(&self.deferred, "deferred view", name).cloned()
	}

	pub(crate) fn lookup_loading(&self, name: &str) -> Result<Arc<dyn LoadingView>> {
		lookup(&self.loading_views, "loading view", name).cloned()
	}

	pub(crate) fn lookup_guard(&self, name: &str) -> Result<GuardSpec> {
		lookup(&self.guards, "guard", name).cloned()
	}

	pub(crate) fn lookup_resolver(&self, name: &str) -> Result<ResolverSpec> {
		lookup(&self.resolvers, "resolver", name).cloned()
	}
}

fn lookup<'a, T>(section: &'a IndexMap<String, T>, kind: &'static str, name: &str) -> Result<&'a T> {
	section.get(name).ok_or_else(|| ConfigError::UnknownName {
		kind,
		name: name.to_string(),
		suggestion: suggest(name, section.keys().map(String::as_str)),
	})
}

impl fmt::Debug for RouteRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteRegistry")
			.field("views", &self.views.keys().collect::<Vec<_>>())
			.field("deferred", &self.deferred.keys().collect::<Vec<_>>())
			.field("loading_views", &self.loading_views.keys().collect::<Vec<_>>())
			.field("guards", &self.guards.keys().collect::<Vec<_>>())
			.field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
			.finish()
	}
}
