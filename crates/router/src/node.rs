//! Activation node: one mounted route and its in-flight evaluations.
//!
//! The node owns the machine state of its route and carries out the effects
//! of each transition. Evaluations run as spawned tasks that race the
//! activation token; their results come back to the router as [`Envelope`]s
//! tagged with the generation that started them.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use waypost_activation::{
	ActivationToken, Channel, EvalError, GenerationClock, GuardEvaluator, LazyLoadEvaluator, LazyOutcome, ResolvedData,
	ResolverEvaluator, SharedError, Status, StatusNotifier, spawn_evaluation,
};

use crate::handle::{ActivationHandle, Params};
use crate::machine::{self, Effect, NodeState, RenderDecision, Signal, Transition};
use crate::tree::ActivationSpec;
use crate::view::View;

/// Result of one channel evaluation.
pub(crate) enum NodeEvent {
	Guards(Result<(), EvalError>),
	Resolvers(Result<ResolvedData, EvalError>),
	LazyLoad(LazyOutcome<Arc<dyn View>>),
}

impl NodeEvent {
	fn channel(&self) -> Channel {
		match self {
			Self::Guards(_) => Channel::Guards,
			Self::Resolvers(_) => Channel::Resolvers,
			Self::LazyLoad(_) => Channel::LazyLoad,
		}
	}
}

/// An evaluation result addressed to the activation that started it.
pub(crate) struct Envelope {
	pub(crate) generation: u64,
	pub(crate) event: NodeEvent,
}

impl fmt::Debug for Envelope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Envelope")
			.field("generation", &self.generation)
			.field("channel", &self.event.channel())
			.finish()
	}
}

struct Notifiers {
	guards: StatusNotifier,
	resolvers: StatusNotifier,
	lazy: StatusNotifier,
	node: StatusNotifier,
}

impl Notifiers {
	fn new(spec: &ActivationSpec) -> Self {
		let channel = |channel: Channel| match &spec.loading_view {
			Some(view) => {
				let view = Arc::clone(view);
				StatusNotifier::with_subscriber(move |status| view.on_status(channel, status))
			}
			None => StatusNotifier::new(),
		};
		let node = match &spec.on_status_change {
			Some(listener) => {
				let listener = Arc::clone(listener);
				StatusNotifier::with_subscriber(move |status| listener(status))
			}
			None => StatusNotifier::new(),
		};
		Self {
			guards: channel(Channel::Guards),
			resolvers: channel(Channel::Resolvers),
			lazy: channel(Channel::LazyLoad),
			node,
		}
	}

	fn reset(&mut self) {
		for notifier in [&mut self.guards, &mut self.resolvers, &mut self.lazy, &mut self.node] {
			notifier.reset();
		}
	}

	fn channel(&mut self, channel: Channel) -> &mut StatusNotifier {
		match channel {
			Channel::Guards => &mut self.guards,
			Channel::Resolvers => &mut self.resolvers,
			Channel::LazyLoad => &mut self.lazy,
		}
	}
}

/// One mounted route.
pub struct ActivationNode {
	spec: Arc<ActivationSpec>,
	label: String,
	state: NodeState,
	token: Option<ActivationToken>,
	notifiers: Notifiers,
	resolved: Option<Arc<ResolvedData>>,
	lazy_view: Option<Arc<dyn View>>,
	lazy_error: Option<SharedError>,
	in_flight: usize,
	events: UnboundedSender<Envelope>,
}

impl ActivationNode {
	pub(crate) fn new(spec: Arc<ActivationSpec>, label: String, events: UnboundedSender<Envelope>) -> Self {
		let notifiers = Notifiers::new(&spec);
		Self {
			spec,
			label,
			state: NodeState::default(),
			token: None,
			notifiers,
			resolved: None,
			lazy_view: None,
			lazy_error: None,
			in_flight: 0,
			events,
		}
	}

	/// Starts an activation under a fresh generation.
	///
	/// Mounting a node that is already mounted does nothing; a second call
	/// never restarts guards or resolvers. Returns the effects the router must
	/// run.
	pub(crate) fn mount(&mut self, clock: &GenerationClock) -> Vec<Effect> {
		if self.state.mounted {
			tracing::trace!(route = %self.label, "route.node.remount_ignored");
			return Vec::new();
		}
		let token = clock.activate();
		tracing::debug!(route = %self.label, generation = token.generation(), "route.node.mount");
		self.token = Some(token);
		self.resolved = None;
		self.lazy_view = None;
		self.lazy_error = None;
		self.in_flight = 0;
		self.notifiers.reset();
		self.apply(Signal::Mount)
	}

	/// Cancels in-flight evaluations. Results still in transit are dropped by
	/// the router as stale.
	pub(crate) fn unmount(&mut self) {
		if let Some(generation) = self.generation() {
			tracing::debug!(route = %self.label, generation, in_flight = self.in_flight, "route.node.unmount");
		}
		self.apply(Signal::Unmount);
		self.token = None;
		self.resolved = None;
		self.lazy_view = None;
		self.lazy_error = None;
		self.in_flight = 0;
	}

	/// Applies an evaluation result. Returns the external effects.
	pub(crate) fn settle(&mut self, generation: u64, event: NodeEvent) -> Vec<Effect> {
		if !self.token.as_ref().is_some_and(|t| t.accepts(generation)) {
			tracing::trace!(route = %self.label, generation, "route.event.stale");
			return Vec::new();
		}
		self.in_flight = self.in_flight.saturating_sub(1);

		let signal = match event {
			NodeEvent::Guards(outcome) => {
				if let Err(error) = &outcome {
					if error.is_denial() {
						tracing::debug!(route = %self.label, %error, "route.node.denied");
					} else {
						tracing::warn!(route = %self.label, %error, "route.node.guard_failed");
					}
				}
				Signal::GuardsSettled { passed: outcome.is_ok() }
			}
			NodeEvent::Resolvers(outcome) => {
				let ok = outcome.is_ok();
				match outcome {
					Ok(data) if self.state.resolvers.is_loading() => self.resolved = Some(Arc::new(data)),
					Ok(_) => {}
					Err(error) => tracing::warn!(route = %self.label, %error, "route.node.resolve_failed"),
				}
				Signal::ResolversSettled { ok }
			}
			NodeEvent::LazyLoad(outcome) => {
				let ok = outcome.status().is_loaded();
				match outcome {
					LazyOutcome::Loaded(view) => self.lazy_view = Some(view),
					LazyOutcome::Failed { source, .. } => self.lazy_error = Some(source),
				}
				Signal::LazyLoadSettled { ok }
			}
		};
		self.apply(signal)
	}

	fn apply(&mut self, signal: Signal) -> Vec<Effect> {
		let Transition { state, effects } = machine::transition(&self.state, &self.spec.shape, signal);
		if state != self.state {
			tracing::trace!(
				route = %self.label,
				?signal,
				guards = %state.guards,
				resolvers = %state.resolvers,
				lazy = %state.lazy,
				"route.node.transition"
			);
		}
		self.state = state;

		let mut external = Vec::new();
		for effect in effects {
			match effect {
				Effect::Start(channel) => self.start(channel),
				Effect::Notify(channel, status) => {
					self.notifiers.channel(channel).notify(status);
				}
				Effect::NotifyNode(status) => {
					self.notifiers.node.notify(status);
				}
				Effect::Cancel => {
					if let Some(token) = &self.token {
						token.cancel();
					}
				}
				Effect::SetTitle(_) => external.push(effect),
			}
		}
		external
	}

	fn start(&mut self, channel: Channel) {
		let Some(token) = self.token.clone() else {
			return;
		};
		let generation = token.generation();
		let events = self.events.clone();
		self.in_flight += 1;

		match channel {
			Channel::Guards => {
				let evaluator = GuardEvaluator::new(self.spec.guards.iter().cloned());
				spawn_evaluation(channel, generation, async move {
					tokio::select! {
						biased;
						() = token.cancelled() => {}
						outcome = evaluator.evaluate() => {
							let _ = events.send(Envelope { generation, event: NodeEvent::Guards(outcome) });
						}
					}
				});
			}
			Channel::Resolvers => {
				let evaluator = ResolverEvaluator::new(self.spec.resolvers.iter().map(|(k, r)| (k.clone(), r.clone())));
				spawn_evaluation(channel, generation, async move {
					tokio::select! {
						biased;
						() = token.cancelled() => {}
						outcome = evaluator.evaluate() => {
							let _ = events.send(Envelope { generation, event: NodeEvent::Resolvers(outcome) });
						}
					}
				});
			}
			Channel::LazyLoad => {
				let Some(loader) = self.spec.deferred_view.clone() else {
					self.in_flight -= 1;
					return;
				};
				let evaluator = LazyLoadEvaluator::new(loader);
				spawn_evaluation(channel, generation, async move {
					tokio::select! {
						biased;
						() = token.cancelled() => {}
						outcome = evaluator.evaluate() => {
							let _ = events.send(Envelope { generation, event: NodeEvent::LazyLoad(outcome) });
						}
					}
				});
			}
		}
	}

	pub fn generation(&self) -> Option<u64> {
		self.token.as_ref().map(ActivationToken::generation)
	}

	pub fn state(&self) -> NodeState {
		self.state
	}

	pub fn status(&self) -> Status {
		self.state.status()
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Whether no evaluation of the current activation is outstanding.
	pub fn is_quiescent(&self) -> bool {
		self.in_flight == 0
	}

	pub fn decide(&self) -> RenderDecision {
		machine::decide(&self.state, &self.spec.shape)
	}

	pub fn spec(&self) -> &Arc<ActivationSpec> {
		&self.spec
	}

	/// The view to render: the deferred view once loaded, else the static one.
	pub fn view(&self) -> Option<Arc<dyn View>> {
		if self.spec.shape.deferred {
			self.lazy_view.clone()
		} else {
			self.spec.view.clone()
		}
	}

	pub fn handle(&self, params: &Params) -> ActivationHandle {
		ActivationHandle::new(
			self.generation().unwrap_or_default(),
			self.state.status(),
			(self.state.guards, self.state.resolvers, self.state.lazy),
			self.resolved.clone(),
			self.lazy_error.clone(),
			params.clone(),
		)
	}

	/// History of de-duplicated notifications on a channel.
	pub fn history(&self, channel: Channel) -> &[Status] {
		match channel {
			Channel::Guards => self.notifiers.guards.history(),
			Channel::Resolvers => self.notifiers.resolvers.history(),
			Channel::LazyLoad => self.notifiers.lazy.history(),
		}
	}

	/// History of combined status notifications.
	pub fn status_history(&self) -> &[Status] {
		self.notifiers.node.history()
	}
}

impl Drop for ActivationNode {
	fn drop(&mut self) {
		if let Some(token) = &self.token {
			token.cancel();
		}
	}
}

impl fmt::Debug for ActivationNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActivationNode")
			.field("label", &self.label)
			.field("generation", &self.generation())
			.field("state", &self.state)
			.field("in_flight", &self.in_flight)
			.finish_non_exhaustive()
	}
}
