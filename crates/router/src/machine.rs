//! Pure activation state machine.
//!
//! [`transition`] maps a node's state and one [`Signal`] to the next state and
//! the effects the caller must carry out. It performs no I/O and spawns
//! nothing, so every ordering rule of an activation is checkable here in
//! isolation:
//!
//! * a signal for a channel that is not `Loading` is ignored;
//! * resolvers and the deferred view start only after guards are `Loaded`;
//! * `Mount` on a mounted node and any signal on an unmounted node are no-ops.

use std::sync::Arc;

use waypost_activation::{Channel, Status};

/// Static facts about a route that steer its activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shape {
	pub has_guards: bool,
	pub has_resolvers: bool,
	pub deferred: bool,
	pub has_loading_view: bool,
	pub title: Option<Arc<str>>,
}

/// Per-channel status of one mounted activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
	pub mounted: bool,
	pub guards: Status,
	pub resolvers: Status,
	pub lazy: Status,
}

impl NodeState {
	/// Combined status: `Failed` if any channel failed, `Loaded` once guards
	/// and resolvers are loaded, `Loading` while either is pending.
	pub fn status(&self) -> Status {
		if !self.mounted {
			return Status::Initial;
		}
		let channels = [self.guards, self.resolvers, self.lazy];
		if channels.iter().any(|s| s.is_failed()) {
			Status::Failed
		} else if self.guards.is_loaded() && self.resolvers.is_loaded() {
			Status::Loaded
		} else if self.guards.is_loading() || self.resolvers.is_loading() {
			Status::Loading
		} else {
			Status::Initial
		}
	}

	pub fn channel(&self, channel: Channel) -> Status {
		match channel {
			Channel::Guards => self.guards,
			Channel::Resolvers => self.resolvers,
			Channel::LazyLoad => self.lazy,
		}
	}
}

/// Input to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
	Mount,
	GuardsSettled { passed: bool },
	ResolversSettled { ok: bool },
	LazyLoadSettled { ok: bool },
	Unmount,
}

/// Work requested by a transition, in the order it must be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
	/// Begin evaluating a channel under the current activation token.
	Start(Channel),
	/// Publish a channel status to its subscribers.
	Notify(Channel, Status),
	/// Publish the combined status to the route's listener.
	NotifyNode(Status),
	/// Cancel the activation token.
	Cancel,
	/// Apply a document title.
	SetTitle(Arc<str>),
}

impl Effect {
	/// Whether the effect leaves the node and must be run by the router.
	pub fn is_external(&self) -> bool {
		matches!(self, Self::SetTitle(_))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	pub state: NodeState,
	pub effects: Vec<Effect>,
}

impl Transition {
	fn unchanged(state: &NodeState) -> Self {
		Self {
			state: *state,
			effects: Vec::new(),
		}
	}
}

/// What the node renders in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
	/// The route's view, with children behind its outlet.
	View,
	/// The loading view.
	Loading,
	Nothing,
}

pub fn transition(state: &NodeState, shape: &Shape, signal: Signal) -> Transition {
	let mut next = *state;
	let mut effects = Vec::new();

	match signal {
		Signal::Mount => {
			if state.mounted {
				return Transition::unchanged(state);
			}
			next = NodeState {
				mounted: true,
				..NodeState::default()
			};
			if shape.has_guards {
				next.guards = Status::Loading;
				effects.push(Effect::Notify(Channel::Guards, Status::Loading));
				effects.push(Effect::Start(Channel::Guards));
			} else {
				next.guards = Status::Loaded;
				effects.push(Effect::Notify(Channel::Guards, Status::Loaded));
				after_guards(&mut next, shape, &mut effects);
			}
		}
		Signal::GuardsSettled { passed } => {
			if !state.mounted || !state.guards.is_loading() {
				return Transition::unchanged(state);
			}
			next.guards = Status::settled(passed);
			effects.push(Effect::Notify(Channel::Guards, next.guards));
			if passed {
				after_guards(&mut next, shape, &mut effects);
			}
		}
		Signal::ResolversSettled { ok } => {
			if !state.mounted || !state.resolvers.is_loading() {
				return Transition::unchanged(state);
			}
			next.resolvers = Status::settled(ok);
			effects.push(Effect::Notify(Channel::Resolvers, next.resolvers));
		}
		Signal::LazyLoadSettled { ok } => {
			if !state.mounted || !shape.deferred || !state.guards.is_loaded() || state.lazy.is_terminal() {
				return Transition::unchanged(state);
			}
			next.lazy = Status::settled(ok);
			effects.push(Effect::Notify(Channel::LazyLoad, next.lazy));
		}
		Signal::Unmount => {
			if !state.mounted {
				return Transition::unchanged(state);
			}
			return Transition {
				state: NodeState::default(),
				effects: vec![Effect::Cancel],
			};
		}
	}

	let before = state.status();
	let after = next.status();
	if after != before {
		effects.push(Effect::NotifyNode(after));
		if after.is_loaded()
			&& let Some(title) = &shape.title
		{
			effects.push(Effect::SetTitle(Arc::clone(title)));
		}
	}

	Transition { state: next, effects }
}

fn after_guards(next: &mut NodeState, shape: &Shape, effects: &mut Vec<Effect>) {
	if shape.has_resolvers {
		next.resolvers = Status::Loading;
		effects.push(Effect::Notify(Channel::Resolvers, Status::Loading));
		effects.push(Effect::Start(Channel::Resolvers));
	} else {
		next.resolvers = Status::Loaded;
		effects.push(Effect::Notify(Channel::Resolvers, Status::Loaded));
	}
	if shape.deferred {
		effects.push(Effect::Start(Channel::LazyLoad));
	}
}

/// Chooses what a node renders.
///
/// A pending deferred view keeps the loading view up in the host's place, as
/// does a failed one; its error is on the handle.
pub fn decide(state: &NodeState, shape: &Shape) -> RenderDecision {
	let loading = if shape.has_loading_view {
		RenderDecision::Loading
	} else {
		RenderDecision::Nothing
	};
	if !state.mounted || state.guards.is_failed() || state.resolvers.is_failed() {
		return RenderDecision::Nothing;
	}
	if state.guards.is_loading() || state.resolvers.is_loading() {
		return loading;
	}
	if !(state.guards.is_loaded() && state.resolvers.is_loaded()) {
		return RenderDecision::Nothing;
	}
	if shape.deferred && !state.lazy.is_loaded() {
		return loading;
	}
	RenderDecision::View
}

#[cfg(test)]
mod tests;
