use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn shape(has_guards: bool, has_resolvers: bool) -> Shape {
	Shape {
		has_guards,
		has_resolvers,
		..Shape::default()
	}
}

fn mounted(shape: &Shape) -> Transition {
	transition(&NodeState::default(), shape, Signal::Mount)
}

#[test]
fn bare_route_loads_without_passing_through_loading() {
	let t = mounted(&shape(false, false));
	assert_eq!(
		t.state,
		NodeState {
			mounted: true,
			guards: Status::Loaded,
			resolvers: Status::Loaded,
			lazy: Status::Initial,
		}
	);
	assert_eq!(
		t.effects,
		vec![
			Effect::Notify(Channel::Guards, Status::Loaded),
			Effect::Notify(Channel::Resolvers, Status::Loaded),
			Effect::NotifyNode(Status::Loaded),
		]
	);
}

#[test]
fn guards_gate_resolvers() {
	let shape = shape(true, true);
	let t = mounted(&shape);
	assert_eq!(t.state.guards, Status::Loading);
	assert_eq!(t.state.resolvers, Status::Initial);
	assert!(!t.effects.contains(&Effect::Start(Channel::Resolvers)));
	assert_eq!(t.effects.last(), Some(&Effect::NotifyNode(Status::Loading)));

	let t = transition(&t.state, &shape, Signal::GuardsSettled { passed: true });
	assert_eq!(t.state.guards, Status::Loaded);
	assert_eq!(t.state.resolvers, Status::Loading);
	assert_eq!(
		t.effects,
		vec![
			Effect::Notify(Channel::Guards, Status::Loaded),
			Effect::Notify(Channel::Resolvers, Status::Loading),
			Effect::Start(Channel::Resolvers),
		],
		"combined status stays Loading, so no node notification"
	);

	let t = transition(&t.state, &shape, Signal::ResolversSettled { ok: true });
	assert_eq!(t.state.status(), Status::Loaded);
	assert_eq!(t.effects.last(), Some(&Effect::NotifyNode(Status::Loaded)));
}

#[test]
fn denied_guards_never_start_resolvers() {
	let shape = shape(true, true);
	let t = mounted(&shape);
	let t = transition(&t.state, &shape, Signal::GuardsSettled { passed: false });

	assert_eq!(t.state.guards, Status::Failed);
	assert_eq!(t.state.resolvers, Status::Initial);
	assert_eq!(
		t.effects,
		vec![Effect::Notify(Channel::Guards, Status::Failed), Effect::NotifyNode(Status::Failed)]
	);
	assert_eq!(decide(&t.state, &shape), RenderDecision::Nothing);
}

#[test]
fn mount_is_idempotent() {
	let shape = shape(true, false);
	let first = mounted(&shape);
	let again = transition(&first.state, &shape, Signal::Mount);
	assert_eq!(again.state, first.state);
	assert!(again.effects.is_empty());
}

#[rstest]
#[case(Signal::GuardsSettled { passed: true })]
#[case(Signal::ResolversSettled { ok: true })]
#[case(Signal::LazyLoadSettled { ok: true })]
#[case(Signal::Unmount)]
fn unmounted_node_ignores_signals(#[case] signal: Signal) {
	let t = transition(&NodeState::default(), &shape(true, true), signal);
	assert_eq!(t.state, NodeState::default());
	assert!(t.effects.is_empty());
}

#[test]
fn settled_channels_ignore_repeats() {
	let shape = shape(true, true);
	let t = mounted(&shape);
	let t = transition(&t.state, &shape, Signal::GuardsSettled { passed: true });
	let t = transition(&t.state, &shape, Signal::ResolversSettled { ok: false });
	assert_eq!(t.state.status(), Status::Failed);

	let repeat = transition(&t.state, &shape, Signal::ResolversSettled { ok: true });
	assert_eq!(repeat.state, t.state);
	assert!(repeat.effects.is_empty());

	let late_guard = transition(&t.state, &shape, Signal::GuardsSettled { passed: false });
	assert!(late_guard.effects.is_empty());
}

#[test]
fn unmount_resets_and_cancels() {
	let shape = shape(true, false);
	let t = mounted(&shape);
	let t = transition(&t.state, &shape, Signal::Unmount);
	assert_eq!(t.state, NodeState::default());
	assert_eq!(t.effects, vec![Effect::Cancel]);
}

#[test]
fn deferred_view_starts_with_resolvers_and_holds_the_view() {
	let shape = Shape {
		deferred: true,
		has_loading_view: true,
		..shape(false, true)
	};
	let t = mounted(&shape);
	assert!(t.effects.contains(&Effect::Start(Channel::Resolvers)));
	assert!(t.effects.contains(&Effect::Start(Channel::LazyLoad)));
	assert_eq!(t.state.lazy, Status::Initial, "lazy channel is never reported Loading");

	let t = transition(&t.state, &shape, Signal::ResolversSettled { ok: true });
	assert_eq!(decide(&t.state, &shape), RenderDecision::Loading);

	let loaded = transition(&t.state, &shape, Signal::LazyLoadSettled { ok: true });
	assert_eq!(loaded.effects, vec![Effect::Notify(Channel::LazyLoad, Status::Loaded)]);
	assert_eq!(decide(&loaded.state, &shape), RenderDecision::View);

	let failed = transition(&t.state, &shape, Signal::LazyLoadSettled { ok: false });
	assert_eq!(failed.state.status(), Status::Failed);
	assert_eq!(decide(&failed.state, &shape), RenderDecision::Loading);
}

#[test]
fn lazy_result_before_guards_is_ignored() {
	let shape = Shape {
		deferred: true,
		..shape(true, false)
	};
	let t = mounted(&shape);
	assert!(!t.effects.contains(&Effect::Start(Channel::LazyLoad)));
	let early = transition(&t.state, &shape, Signal::LazyLoadSettled { ok: true });
	assert!(early.effects.is_empty());
}

#[test]
fn title_is_set_once_loaded() {
	let shape = Shape {
		title: Some("Account".into()),
		..shape(true, false)
	};
	let t = mounted(&shape);
	assert!(!t.effects.iter().any(Effect::is_external));

	let t = transition(&t.state, &shape, Signal::GuardsSettled { passed: true });
	assert_eq!(t.effects.last(), Some(&Effect::SetTitle("Account".into())));
}

#[rstest]
#[case(false, Status::Loading, Status::Initial, RenderDecision::Nothing)]
#[case(true, Status::Loading, Status::Initial, RenderDecision::Loading)]
#[case(true, Status::Loaded, Status::Loading, RenderDecision::Loading)]
#[case(true, Status::Loaded, Status::Loaded, RenderDecision::View)]
#[case(true, Status::Failed, Status::Initial, RenderDecision::Nothing)]
#[case(true, Status::Loaded, Status::Failed, RenderDecision::Nothing)]
fn decisions(#[case] has_loading_view: bool, #[case] guards: Status, #[case] resolvers: Status, #[case] expected: RenderDecision) {
	let shape = Shape {
		has_loading_view,
		..shape(true, true)
	};
	let state = NodeState {
		mounted: true,
		guards,
		resolvers,
		lazy: Status::Initial,
	};
	assert_eq!(decide(&state, &shape), expected);
}
