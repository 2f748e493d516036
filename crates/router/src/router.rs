//! The router: navigation, render passes and event dispatch.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use waypost_activation::{GenerationClock, Status};

use crate::config::RouterConfig;
use crate::effect::{EffectRunner, TitleSink};
use crate::error::{Result, RouterError};
use crate::handle::{Location, Params};
use crate::machine::{Effect, NodeState, RenderDecision};
use crate::matcher::{PathMatcher, RouteMatch, SegmentMatcher};
use crate::node::{ActivationNode, Envelope};
use crate::outlet::OutletGate;
use crate::route::RouteNode;
use crate::tree::{WrappedRoute, wrap_routes};
use crate::view::{LoadingContext, ViewContext};

struct Mounted {
	/// Branch prefix identifying the route this node was mounted for.
	address: Vec<usize>,
	node: ActivationNode,
}

/// Point-in-time view of one mounted activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
	pub label: String,
	pub generation: u64,
	pub state: NodeState,
	pub status: Status,
	pub decision: RenderDecision,
}

/// Drives activations for one route tree.
///
/// The router holds the active branch as a stack of mounted nodes, root
/// first. Navigation keeps the nodes shared with the previous branch and
/// unmounts the rest; render passes mount what the new branch still needs.
/// Evaluation results are applied only through [`process_pending`],
/// [`next_event`] or [`settle`], one at a time.
///
/// [`process_pending`]: Self::process_pending
/// [`next_event`]: Self::next_event
/// [`settle`]: Self::settle
pub struct Router<M = SegmentMatcher> {
	routes: Vec<WrappedRoute>,
	matcher: M,
	config: RouterConfig,
	clock: GenerationClock,
	location: Location,
	matched: Option<RouteMatch>,
	active: Vec<Mounted>,
	events_tx: UnboundedSender<Envelope>,
	events_rx: UnboundedReceiver<Envelope>,
	effects: EffectRunner,
}

impl Router<SegmentMatcher> {
	pub fn new(routes: Vec<RouteNode>) -> Self {
		Self::with_config(routes, RouterConfig::default())
	}

	pub fn with_config(routes: Vec<RouteNode>, config: RouterConfig) -> Self {
		let matcher = SegmentMatcher::new(config.case_sensitive);
		Self::with_matcher(routes, config, matcher)
	}
}

impl<M: PathMatcher> Router<M> {
	pub fn with_matcher(routes: Vec<RouteNode>, config: RouterConfig, matcher: M) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		Self {
			routes: wrap_routes(&routes),
			matcher,
			config,
			clock: GenerationClock::new(),
			location: Location::default(),
			matched: None,
			active: Vec::new(),
			events_tx,
			events_rx,
			effects: EffectRunner::new(),
		}
	}

	pub fn with_title_sink(mut self, sink: Arc<dyn TitleSink>) -> Self {
		self.effects = self.effects.with_title_sink(sink);
		self
	}

	/// Publishes navigations through `location`.
	///
	/// Guards and resolvers built before the router can capture a clone of it
	/// and read the params of the match they are activated for.
	pub fn with_location(mut self, location: Location) -> Self {
		location.set(&self.location.path(), self.location.params());
		self.location = location;
		self
	}

	pub fn routes(&self) -> &[WrappedRoute] {
		&self.routes
	}

	pub fn config(&self) -> &RouterConfig {
		&self.config
	}

	/// Shared handle on the current location.
	pub fn location(&self) -> Location {
		self.location.clone()
	}

	/// Moves to `location`.
	///
	/// Nodes on the common prefix of the old and new branch stay mounted and
	/// keep their activation; every other node is unmounted, deepest first.
	/// New nodes mount on the next render pass.
	pub fn navigate(&mut self, location: &str) -> Result<()> {
		let Some(path) = self.config.strip_base(location) else {
			self.clear(location);
			return Err(RouterError::OutsideBase {
				location: location.to_owned(),
				base: self.config.base_path.clone().unwrap_or_default(),
			});
		};
		let Some(matched) = self.matcher.match_location(&self.routes, path) else {
			self.clear(path);
			return Err(RouterError::NoMatch(path.to_owned()));
		};

		let keep = self
			.active
			.iter()
			.enumerate()
			.take_while(|(depth, mounted)| matched.branch.get(..=*depth) == Some(mounted.address.as_slice()))
			.count();
		tracing::debug!(path, depth = matched.depth(), keep, "route.navigate");

		self.unmount_from(keep);
		self.location.set(path, matched.params.clone());
		self.matched = Some(matched);
		self.restore_title();
		Ok(())
	}

	fn clear(&mut self, path: &str) {
		tracing::debug!(path, "route.navigate.unmatched");
		self.unmount_from(0);
		self.location.set(path, Params::default());
		self.matched = None;
		self.restore_title();
	}

	/// Re-applies the title of the deepest loaded node still mounted, or the
	/// default title.
	fn restore_title(&self) {
		let title = self
			.active
			.iter()
			.rev()
			.filter(|m| m.node.status().is_loaded())
			.find_map(|m| m.node.spec().shape().title.clone())
			.or_else(|| self.config.default_title.as_deref().map(Arc::from));
		if let Some(title) = title {
			self.effects.apply(&Effect::SetTitle(title));
		}
	}

	/// Renders the matched branch.
	///
	/// Mounts any node of the branch that is not mounted yet and is reachable:
	/// a node below the root is reachable only while its parent renders its
	/// view and declares an outlet. A route without a view renders its child
	/// in place.
	pub fn render(&mut self) -> String {
		let Some(matched) = self.matched.take() else {
			return String::new();
		};
		let output = self.render_depth(&matched, 0);
		self.matched = Some(matched);
		output
	}

	fn render_depth(&mut self, matched: &RouteMatch, depth: usize) -> String {
		if self.active.len() <= depth && !self.mount_at(matched, depth) {
			return String::new();
		}

		let node = &self.active[depth].node;
		let handle = node.handle(&matched.params);
		match node.decide() {
			RenderDecision::Nothing => {
				self.unmount_from(depth + 1);
				String::new()
			}
			RenderDecision::Loading => {
				let loading = node.spec().loading_view.clone();
				self.unmount_from(depth + 1);
				loading.map(|view| view.render(&LoadingContext::new(&handle))).unwrap_or_default()
			}
			RenderDecision::View => {
				let view = node.view();
				let child = if node.spec().has_outlet() && depth + 1 < matched.depth() {
					Some(self.render_depth(matched, depth + 1))
				} else {
					self.unmount_from(depth + 1);
					None
				};
				let gate = OutletGate::new(true, child);
				match view {
					Some(view) => view.render(&ViewContext::new(&handle, &gate)),
					None => gate.render(),
				}
			}
		}
	}

	fn mount_at(&mut self, matched: &RouteMatch, depth: usize) -> bool {
		let address = matched.branch[..=depth].to_vec();
		let Some(route) = route_at(&self.routes, &address) else {
			return false;
		};
		let mut node = ActivationNode::new(Arc::clone(route.activation()), route.label(), self.events_tx.clone());
		let effects = node.mount(&self.clock);
		self.active.push(Mounted { address, node });
		self.effects.apply_all(effects);
		true
	}

	fn unmount_from(&mut self, depth: usize) {
		while self.active.len() > depth {
			if let Some(mut mounted) = self.active.pop() {
				mounted.node.unmount();
			}
		}
	}

	/// Applies every evaluation result already delivered. Returns how many
	/// were addressed to a mounted activation.
	pub fn process_pending(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(envelope) = self.events_rx.try_recv() {
			applied += usize::from(self.dispatch(envelope));
		}
		applied
	}

	/// Waits for the next evaluation result and applies it. Returns whether
	/// it was addressed to a mounted activation.
	pub async fn next_event(&mut self) -> bool {
		match self.events_rx.recv().await {
			Some(envelope) => self.dispatch(envelope),
			None => false,
		}
	}

	/// Renders and applies results until no mounted activation has work in
	/// flight, then returns the final output.
	///
	/// Never returns while a guard or resolver of the active branch is still
	/// pending.
	pub async fn settle(&mut self) -> String {
		loop {
			self.process_pending();
			let output = self.render();
			if self.is_idle() {
				return output;
			}
			self.next_event().await;
		}
	}

	/// Whether no mounted activation awaits an evaluation result.
	pub fn is_idle(&self) -> bool {
		self.active.iter().all(|m| m.node.is_quiescent())
	}

	fn dispatch(&mut self, envelope: Envelope) -> bool {
		let Envelope { generation, event } = envelope;
		let Some(mounted) = self.active.iter_mut().find(|m| m.node.generation() == Some(generation)) else {
			tracing::trace!(generation, "route.event.stale");
			return false;
		};
		let effects = mounted.node.settle(generation, event);
		self.effects.apply_all(effects);
		true
	}

	/// Mounted activations, root first.
	pub fn statuses(&self) -> Vec<NodeSnapshot> {
		self.active
			.iter()
			.map(|m| NodeSnapshot {
				label: m.node.label().to_owned(),
				generation: m.node.generation().unwrap_or_default(),
				state: m.node.state(),
				status: m.node.status(),
				decision: m.node.decide(),
			})
			.collect()
	}

	/// Mounted node at `depth` of the active branch.
	pub fn node(&self, depth: usize) -> Option<&ActivationNode> {
		self.active.get(depth).map(|m| &m.node)
	}
}

fn route_at<'a>(routes: &'a [WrappedRoute], address: &[usize]) -> Option<&'a WrappedRoute> {
	let (&first, rest) = address.split_first()?;
	let mut route = routes.get(first)?;
	for &index in rest {
		route = route.children().get(index)?;
	}
	Some(route)
}
