//! Route-tree wrapping.
//!
//! [`wrap_routes`] turns the host's [`RouteNode`] tree into a tree of the
//! same shape whose entries carry an [`ActivationSpec`] in place of the
//! route's own view, guards and resolvers. Path, index flag and id pass
//! through unchanged so the matcher sees the tree exactly as configured.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use waypost_activation::{GuardSpec, LazyLoader, ResolverSpec};

use crate::machine::Shape;
use crate::route::{RouteNode, StatusListener};
use crate::view::{LoadingView, View};

/// Shape of a route tree as far as path matching is concerned.
pub trait RouteShape: Sized {
	fn route_path(&self) -> Option<&str>;
	fn is_index_route(&self) -> bool;
	fn child_routes(&self) -> &[Self];
}

impl RouteShape for RouteNode {
	fn route_path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	fn is_index_route(&self) -> bool {
		self.index
	}

	fn child_routes(&self) -> &[Self] {
		&self.children
	}
}

/// Activation configuration extracted from one route.
pub struct ActivationSpec {
	pub(crate) guards: Vec<GuardSpec>,
	pub(crate) resolvers: IndexMap<String, ResolverSpec>,
	pub(crate) view: Option<Arc<dyn View>>,
	pub(crate) deferred_view: Option<LazyLoader<Arc<dyn View>>>,
	pub(crate) loading_view: Option<Arc<dyn LoadingView>>,
	pub(crate) on_status_change: Option<StatusListener>,
	pub(crate) has_outlet: bool,
	pub(crate) shape: Shape,
}

impl ActivationSpec {
	fn from_route(route: &RouteNode) -> Self {
		Self {
			guards: route.guards.clone(),
			resolvers: route.resolvers.clone(),
			view: route.view.clone(),
			deferred_view: route.deferred_view.clone(),
			loading_view: route.loading_view.clone(),
			on_status_change: route.on_status_change.clone(),
			has_outlet: route.has_outlet || (route.view.is_none() && route.deferred_view.is_none()),
			shape: Shape {
				has_guards: !route.guards.is_empty(),
				has_resolvers: !route.resolvers.is_empty(),
				deferred: route.deferred_view.is_some(),
				has_loading_view: route.loading_view.is_some(),
				title: route.title.clone(),
			},
		}
	}

	pub fn shape(&self) -> &Shape {
		&self.shape
	}

	pub fn has_outlet(&self) -> bool {
		self.has_outlet
	}
}

impl fmt::Debug for ActivationSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActivationSpec")
			.field("guards", &self.guards.len())
			.field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
			.field("has_outlet", &self.has_outlet)
			.field("shape", &self.shape)
			.finish_non_exhaustive()
	}
}

/// A route whose element is an activation node.
#[derive(Debug, Clone)]
pub struct WrappedRoute {
	id: Option<String>,
	path: Option<String>,
	index: bool,
	activation: Arc<ActivationSpec>,
	children: Vec<WrappedRoute>,
}

impl WrappedRoute {
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	pub fn is_index(&self) -> bool {
		self.index
	}

	pub fn activation(&self) -> &Arc<ActivationSpec> {
		&self.activation
	}

	pub fn children(&self) -> &[WrappedRoute] {
		&self.children
	}

	/// Label used in logs and snapshots.
	pub fn label(&self) -> String {
		match (&self.id, &self.path, self.index) {
			(Some(id), _, _) => id.clone(),
			(None, Some(path), _) => path.clone(),
			(None, None, true) => "(index)".to_owned(),
			(None, None, false) => "(layout)".to_owned(),
		}
	}
}

impl RouteShape for WrappedRoute {
	fn route_path(&self) -> Option<&str> {
		self.path()
	}

	fn is_index_route(&self) -> bool {
		self.index
	}

	fn child_routes(&self) -> &[Self] {
		&self.children
	}
}

/// Wraps every route of the tree, recursively, preserving order.
pub fn wrap_routes(routes: &[RouteNode]) -> Vec<WrappedRoute> {
	routes
		.iter()
		.map(|route| WrappedRoute {
			id: route.id.clone(),
			path: route.path.clone(),
			index: route.index,
			activation: Arc::new(ActivationSpec::from_route(route)),
			children: wrap_routes(&route.children),
		})
		.collect()
}
