#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Guarded route activation for declarative route trees.
//!
//! Each configured [`RouteNode`] is wrapped in an activation node that runs
//! its guards, then its resolvers and deferred view, before the route's view
//! may render. Activation results flow to views through an explicit
//! [`ActivationHandle`], never through ambient context.
//!
//! # Architecture
//!
//! ```text
//! RouteNode tree ──wrap_routes──▶ WrappedRoute tree ──PathMatcher──▶ RouteMatch
//!                                                                      │
//! Router ── mounts ──▶ ActivationNode (one per matched level)          │
//!    ▲                   │  machine::transition(state, signal)         │
//!    │                   ▼                                             │
//!    └── Envelope{generation, event} ◀── spawned guard/resolver/lazy tasks
//! ```
//!
//! The [`Router`] is the single driver: it mounts nodes during render passes,
//! applies evaluation results one at a time, and drops results whose
//! generation no longer belongs to a mounted node.
//!
//! # Rendering
//!
//! A node renders its view once guards and resolvers are both `Loaded`, its
//! loading view while either is still `Loading`, and nothing otherwise. A
//! child route is mounted only under a loaded parent that declares an outlet.
//! A route without a view of its own, such as a plain layout, renders its
//! matched child in place.

pub mod config;
pub mod effect;
pub mod error;
pub mod handle;
pub mod machine;
pub mod matcher;
pub mod node;
pub mod outlet;
pub mod route;
pub mod router;
pub mod tree;
pub mod view;

pub use config::RouterConfig;
pub use effect::{EffectRunner, SharedTitle, TitleSink};
pub use error::{Result, RouterError};
pub use handle::{ActivationHandle, Location, Params};
pub use machine::{Effect, NodeState, RenderDecision, Shape, Signal, Transition};
pub use matcher::{PathMatcher, RouteMatch, SegmentMatcher};
pub use node::ActivationNode;
pub use outlet::OutletGate;
pub use route::{RouteNode, StatusListener};
pub use router::{NodeSnapshot, Router};
pub use tree::{ActivationSpec, RouteShape, WrappedRoute, wrap_routes};
pub use view::{LoadingContext, LoadingView, View, ViewContext, loading_fn, text, view_fn};
pub use waypost_activation::{
	BoxError, Channel, GuardSpec, LazyLoader, ResolvedData, ResolvedValue, ResolverSpec, SharedError, Status,
};
