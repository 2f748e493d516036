#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Route tables for waypost.
//!
//! A route table is written in KDL (v2). Guards, resolvers and views are code,
//! so the table refers to them by name and a [`RouteRegistry`] supplies them
//! when the table is built into a [`Router`].
//!
//! ```kdl
//! router {
//!     base "/app"
//!     default-title "Waypost"
//!     case-sensitive #false
//! }
//!
//! route "account" {
//!     guard "signed-in"
//!     resolve "user" "load-user"
//!     loading "spinner"
//!     view "account"
//!     title "Account"
//!     outlet
//!
//!     index { view "account-home" }
//!     route "orders/:id" {
//!         id "order"
//!         guard "owns-order" "not-suspended"
//!         deferred "order-page"
//!     }
//! }
//!
//! layout {
//!     route "about" { view "about" }
//! }
//! ```
//!
//! Unknown nodes and shadowed settings are not fatal. They are collected in
//! [`RouteTable::warnings`]; unknown registry names are errors at build time.

pub mod error;
pub mod kdl_util;
pub mod registry;
pub mod routes;

use std::path::Path;

pub use error::{ConfigError, ConfigWarning, Result};
pub use registry::RouteRegistry;
pub use routes::{RouteDecl, RouteKind};
use waypost_router::{RouteNode, Router, RouterConfig};

/// A parsed route table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
	/// Settings from the `router { }` block.
	pub router: RouterConfig,
	/// Top-level routes, in file order.
	pub routes: Vec<RouteDecl>,
	/// Non-fatal warnings encountered during parsing.
	pub warnings: Vec<ConfigWarning>,
}

impl RouteTable {
	/// Parse a KDL string into a [`RouteTable`].
	pub fn parse(input: &str) -> Result<Self> {
		let doc: kdl::KdlDocument = input.parse()?;
		let mut table = RouteTable::default();

		for node in doc.nodes() {
			let name = node.name().value();
			match name {
				"router" => table.router = routes::parse_router_node(node, &mut table.warnings)?,
				_ if routes::is_route_node(name) => {
					let route = routes::parse_route_node(node, &mut table.warnings)?;
					table.routes.push(route);
				}
				_ => table.warnings.push(ConfigWarning::UnknownNode {
					node: name.to_string(),
					found_in: "route table",
				}),
			}
		}

		for warning in &table.warnings {
			tracing::warn!(%warning, "config.warning");
		}
		tracing::debug!(routes = table.routes.len(), "config.parsed");
		Ok(table)
	}

	/// Load a route table from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Merge another table into this one.
	///
	/// Routes from `other` are appended. Router settings present in `other`
	/// override those in `self`.
	pub fn merge(&mut self, other: RouteTable) {
		if other.router.base_path.is_some() {
			self.router.base_path = other.router.base_path;
		}
		if other.router.default_title.is_some() {
			self.router.default_title = other.router.default_title;
		}
		self.router.case_sensitive |= other.router.case_sensitive;
		self.routes.extend(other.routes);
		self.warnings.extend(other.warnings);
	}

	/// Builds every route against `registry`.
	pub fn build(&self, registry: &RouteRegistry) -> Result<Vec<RouteNode>> {
		self.routes.iter().map(|decl| decl.build(registry)).collect()
	}

	/// Builds a router from the table's routes and settings.
	pub fn into_router(self, registry: &RouteRegistry) -> Result<Router> {
		let routes = self.build(registry)?;
		Ok(Router::with_config(routes, self.router))
	}
}
