//! Route block parsing.
//!
//! Route blocks are parsed into plain [`RouteDecl`] values first, then built
//! into router routes against a [`RouteRegistry`]. Keeping the two stages
//! apart lets a table be validated without any registry at hand.

use indexmap::IndexMap;
use kdl::KdlNode;
use waypost_router::{RouteNode, RouterConfig};

use crate::error::{ConfigError, ConfigWarning, Result};
use crate::kdl_util::{flag, required_string, required_strings, string_args};
use crate::registry::RouteRegistry;


const ROUTE_BLOCK: &str = "route block";
const ROUTER_BLOCK: &str = "router block";

/// How a route consumes path segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteKind {
	/// `route "path" { }`
	#[default]
	Path,
	/// `index { }`: matches when the parent path is fully consumed.
	Index,
	/// `layout { }`: consumes nothing, groups children.
	Layout,
}

/// One route as written in the table, with registry names unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDecl {
	pub kind: RouteKind,
	pub path: Option<String>,
	pub id: Option<String>,
	pub view: Option<String>,
	pub deferred: Option<String>,
	pub loading: Option<String>,
	pub guards: Vec<String>,
	/// Resolver key to registered resolver name.
	pub resolvers: IndexMap<String, String>,
	pub title: Option<String>,
	pub outlet: bool,
	pub children: Vec<RouteDecl>,
}

impl RouteDecl {
	/// Id, path, or kind, for messages.
	pub fn label(&self) -> String {
		match (&self.id, &self.path, self.kind) {
			(Some(id), _, _) => id.clone(),
			(None, Some(path), _) => path.clone(),
			(None, None, RouteKind::Index) => "(index)".to_string(),
			(None, None, _) => "(layout)".to_string(),
		}
	}

	/// Resolves every registry name and builds the router route.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::UnknownName`] for the first name the registry
	/// does not know, in this route or any descendant.
	pub fn build(&self, registry: &RouteRegistry) -> Result<RouteNode> {
		let mut route = match self.kind {
			RouteKind::Path => RouteNode::new(self.path.clone().unwrap_or_default()),
			RouteKind::Index => RouteNode::index_route(),
			RouteKind::Layout => RouteNode::layout(),
		};
		if let Some(id) = &self.id {
			route = route.id(id.clone());
		}
		if let Some(name) = &self.view {
			route = route.view_ref(registry.lookup_view(name)?);
		}
		if let Some(name) = &self.deferred {
			route = route.deferred_view(registry.lookup_deferred(name)?);
		}
		if let Some(name) = &self.loading {
			route = route.loading_view_ref(registry.lookup_loading(name)?);
		}
		for name in &self.guards {
			route = route.guard(registry.lookup_guard(name)?);
		}
		for (key, name) in &self.resolvers {
			route = route.resolver(key.clone(), registry.lookup_resolver(name)?);
		}
		if let Some(title) = &self.title {
			route = route.title(title.as_str());
		}
		if self.outlet {
			route = route.with_outlet();
		}
		for child in &self.children {
			route = route.child(child.build(registry)?);
		}
		Ok(route)
	}
}

pub(crate) fn is_route_node(name: &str) -> bool {
	matches!(name, "route" | "index" | "layout")
}

/// Parses a `route`, `index` or `layout` node and its nested routes.
pub fn parse_route_node(node: &KdlNode, warnings: &mut Vec<ConfigWarning>) -> Result<RouteDecl> {
	let mut decl = match node.name().value() {
		"route" => {
			if string_args(node).next().is_none() {
				return Err(ConfigError::MissingField("route path".to_string()));
			}
			RouteDecl {
				path: Some(required_string(node)?.to_string()),
				..RouteDecl::default()
			}
		}
		"index" => RouteDecl {
			kind: RouteKind::Index,
			..RouteDecl::default()
		},
		"layout" => RouteDecl {
			kind: RouteKind::Layout,
			..RouteDecl::default()
		},
		other => {
			return Err(ConfigError::InvalidValue {
				node: other.to_string(),
				expected: "a route, index or layout node",
			});
		}
	};

	let Some(children) = node.children() else {
		return Ok(decl);
	};

	for child in children.nodes() {
		let name = child.name().value();
		match name {
			"id" => decl.id = Some(required_string(child)?.to_string()),
			"view" => decl.view = Some(required_string(child)?.to_string()),
			"deferred" => decl.deferred = Some(required_string(child)?.to_string()),
			"loading" => decl.loading = Some(required_string(child)?.to_string()),
			"title" => decl.title = Some(required_string(child)?.to_string()),
			"outlet" => decl.outlet = flag(child)?,
			"guard" => {
				let names: Option<Vec<&str>> = string_args(child).collect();
				match names {
					Some(names) if !names.is_empty() => decl.guards.extend(names.into_iter().map(String::from)),
					_ => {
						return Err(ConfigError::InvalidValue {
							node: name.to_string(),
							expected: "one or more guard names",
						});
					}
				}
			}
			"resolve" => {
				let [key, resolver] = required_strings::<2>(child)?;
				if decl.resolvers.insert(key.to_string(), resolver.to_string()).is_some() {
					warnings.push(ConfigWarning::DuplicateResolver {
						route: decl.label(),
						key: key.to_string(),
					});
				}
			}
			_ if is_route_node(name) => decl.children.push(parse_route_node(child, warnings)?),
			_ => warnings.push(ConfigWarning::UnknownNode {
				node: name.to_string(),
				found_in: ROUTE_BLOCK,
			}),
		}
	}

	if decl.view.is_some() && decl.deferred.is_some() {
		warnings.push(ConfigWarning::ViewShadowed { route: decl.label() });
	}
	Ok(decl)
}

/// Parses the `router { }` block.
pub fn parse_router_node(node: &KdlNode, warnings: &mut Vec<ConfigWarning>) -> Result<RouterConfig> {
	let mut config = RouterConfig::default();
	let Some(children) = node.children() else {
		return Ok(config);
	};

	for child in children.nodes() {
		match child.name().value() {
			"base" => config.base_path = Some(required_string(child)?.to_string()),
			"default-title" => config.default_title = Some(required_string(child)?.to_string()),
			"case-sensitive" => config.case_sensitive = flag(child)?,
			other => warnings.push(ConfigWarning::UnknownNode {
				node: other.to_string(),
				found_in: ROUTER_BLOCK,
			}),
		}
	}
	Ok(config)
}
