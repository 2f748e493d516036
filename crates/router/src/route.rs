//! Route configuration as supplied by the host.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use waypost_activation::{GuardSpec, LazyLoader, ResolverSpec, Status};

use crate::view::{LoadingView, View};

/// Callback receiving a route's combined activation status changes.
pub type StatusListener = Arc<dyn Fn(Status) + Send + Sync>;

/// One entry of the host's route tree.
///
/// Routes are built with chained setters and nested through
/// [`child`](Self::child). A route without a path is a layout route: it
/// consumes no segments and only groups its children.
#[derive(Clone, Default)]
pub struct RouteNode {
	pub(crate) id: Option<String>,
	pub(crate) path: Option<String>,
	pub(crate) index: bool,
	pub(crate) view: Option<Arc<dyn View>>,
	pub(crate) deferred_view: Option<LazyLoader<Arc<dyn View>>>,
	pub(crate) loading_view: Option<Arc<dyn LoadingView>>,
	pub(crate) guards: Vec<GuardSpec>,
	pub(crate) resolvers: IndexMap<String, ResolverSpec>,
	pub(crate) title: Option<Arc<str>>,
	pub(crate) has_outlet: bool,
	pub(crate) on_status_change: Option<StatusListener>,
	pub(crate) children: Vec<RouteNode>,
}

impl RouteNode {
	/// Route matching `path`, relative to its parent.
	///
	/// Segments are static text, `:name` params, or a trailing `*`.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: Some(path.into()),
			..Self::default()
		}
	}

	/// Pathless route grouping its children.
	///
	/// Without a view of its own it renders the matched child in place.
	pub fn layout() -> Self {
		Self::default()
	}

	/// Route matching when its parent's path is fully consumed.
	pub fn index_route() -> Self {
		Self {
			index: true,
			..Self::default()
		}
	}

	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn view(self, view: impl View + 'static) -> Self {
		self.view_ref(Arc::new(view))
	}

	pub fn view_ref(mut self, view: Arc<dyn View>) -> Self {
		self.view = Some(view);
		self
	}

	/// View fetched on demand. Takes precedence over [`view`](Self::view).
	pub fn deferred_view(mut self, loader: LazyLoader<Arc<dyn View>>) -> Self {
		self.deferred_view = Some(loader);
		self
	}

	pub fn loading_view(self, view: impl LoadingView + 'static) -> Self {
		self.loading_view_ref(Arc::new(view))
	}

	pub fn loading_view_ref(mut self, view: Arc<dyn LoadingView>) -> Self {
		self.loading_view = Some(view);
		self
	}

	/// Appends a guard. Guards run in the order they were added.
	pub fn guard(mut self, guard: GuardSpec) -> Self {
		self.guards.push(guard);
		self
	}

	pub fn guards(mut self, guards: impl IntoIterator<Item = GuardSpec>) -> Self {
		self.guards.extend(guards);
		self
	}

	/// Adds a resolver under `key`, replacing any previous one for that key.
	pub fn resolver(mut self, key: impl Into<String>, resolver: ResolverSpec) -> Self {
		self.resolvers.insert(key.into(), resolver);
		self
	}

	pub fn resolvers<K: Into<String>>(mut self, resolvers: impl IntoIterator<Item = (K, ResolverSpec)>) -> Self {
		self.resolvers.extend(resolvers.into_iter().map(|(k, r)| (k.into(), r)));
		self
	}

	/// Title applied once the route finishes loading.
	pub fn title(mut self, title: impl Into<Arc<str>>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Declares that this route's view places an outlet for its children.
	///
	/// Child routes are mounted only under a route with an outlet. Routes
	/// without a view imply one.
	pub fn with_outlet(mut self) -> Self {
		self.has_outlet = true;
		self
	}

	pub fn on_status_change(mut self, listener: impl Fn(Status) + Send + Sync + 'static) -> Self {
		self.on_status_change = Some(Arc::new(listener));
		self
	}

	pub fn child(mut self, child: RouteNode) -> Self {
		self.children.push(child);
		self
	}

	pub fn children(mut self, children: impl IntoIterator<Item = RouteNode>) -> Self {
		self.children.extend(children);
		self
	}

	pub fn route_id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn title_text(&self) -> Option<&str> {
		self.title.as_deref()
	}

	pub fn has_outlet(&self) -> bool {
		self.has_outlet
	}

	pub fn guard_specs(&self) -> &[GuardSpec] {
		&self.guards
	}

	pub fn resolver_specs(&self) -> &IndexMap<String, ResolverSpec> {
		&self.resolvers
	}

	pub fn has_view(&self) -> bool {
		self.view.is_some() || self.deferred_view.is_some()
	}

	pub fn has_loading_view(&self) -> bool {
		self.loading_view.is_some()
	}
}

impl fmt::Debug for RouteNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteNode")
			.field("id", &self.id)
			.field("path", &self.path)
			.field("index", &self.index)
			.field("guards", &self.guards.len())
			.field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
			.field("deferred", &self.deferred_view.is_some())
			.field("title", &self.title)
			.field("has_outlet", &self.has_outlet)
			.field("children", &self.children)
			.finish_non_exhaustive()
	}
}
