use std::time::Duration;

use pretty_assertions::assert_eq;
use waypost_router::{RenderDecision, RouteNode, Router, Status, loading_fn, text, view_fn};

use crate::common::{self, Counter, Log};

fn account_routes(log: &Log) -> Vec<RouteNode> {
	vec![
		RouteNode::new("account")
			.guard(common::delayed_guard(log, "account.session", Duration::from_millis(20), true))
			.guard(common::delayed_guard(log, "account.verified", Duration::from_millis(5), true))
			.resolver("user", common::delayed_value(log, "account.user", Duration::from_millis(10), "joe"))
			.view(view_fn(|cx| {
				let user = cx.data::<&str>("user").copied().unwrap_or("?");
				format!("<account user={user}>{}</account>", cx.outlet().render())
			}))
			.with_outlet()
			.child(
				RouteNode::new("orders")
					.resolver("count", common::delayed_value(log, "orders.count", Duration::from_millis(5), 3usize))
					.view(view_fn(|cx| format!("<orders count={}/>", cx.data::<usize>("count").copied().unwrap_or_default()))),
			),
	]
}

#[tokio::test(start_paused = true)]
async fn parent_then_child_activate_in_order() {
	common::init_tracing();
	let log = Log::default();
	let mut router = Router::new(account_routes(&log));
	router.navigate("/account/orders").unwrap();

	assert_eq!(router.render(), "");
	let statuses = router.statuses();
	assert_eq!(statuses.len(), 1, "the child waits for its parent");
	assert_eq!(statuses[0].state.guards, Status::Loading);
	assert_eq!(statuses[0].state.resolvers, Status::Initial);

	let output = router.settle().await;
	assert_eq!(output, "<account user=joe><orders count=3/></account>");
	assert_eq!(
		log.entries(),
		["account.session", "account.verified", "account.user", "orders.count"]
	);

	let statuses = router.statuses();
	assert_eq!(statuses.len(), 2);
	assert!(statuses.iter().all(|s| s.status == Status::Loaded));
	assert!(statuses.iter().all(|s| s.decision == RenderDecision::View));
	assert!(router.is_idle());
}

#[tokio::test]
async fn failing_resolver_blocks_view_and_children() {
	let child_checks = Counter::default();
	let routes = vec![
		RouteNode::new("dash")
			.resolver("stats", common::failing_resolver("stats backend down"))
			.loading_view(loading_fn(|_| "loading".to_string()))
			.view(text("dash"))
			.with_outlet()
			.child(RouteNode::new("detail").guard(common::counted_guard(&child_checks, true)).view(text("detail"))),
	];
	let mut router = Router::new(routes);
	router.navigate("/dash/detail").unwrap();

	assert_eq!(router.render(), "loading");
	assert_eq!(router.settle().await, "");

	let statuses = router.statuses();
	assert_eq!(statuses.len(), 1);
	assert_eq!(statuses[0].status, Status::Failed);
	assert_eq!(statuses[0].state.resolvers, Status::Failed);
	assert_eq!(statuses[0].decision, RenderDecision::Nothing);
	assert_eq!(child_checks.get(), 0);
}

#[tokio::test]
async fn denied_guard_never_starts_resolvers() {
	let resolves = Counter::default();
	let routes = vec![
		RouteNode::new("admin")
			.guard(waypost_router::GuardSpec::from_fn(|| false).labeled("is_admin"))
			.resolver("audit", common::counted_value(&resolves, 1u8))
			.view(text("admin")),
	];
	let mut router = Router::new(routes);
	router.navigate("/admin").unwrap();

	assert_eq!(router.settle().await, "");
	let statuses = router.statuses();
	assert_eq!(statuses[0].state.guards, Status::Failed);
	assert_eq!(statuses[0].state.resolvers, Status::Initial);
	assert_eq!(resolves.get(), 0);
}

#[tokio::test]
async fn children_need_a_declared_outlet() {
	let child_checks = Counter::default();
	let routes = vec![
		RouteNode::new("docs")
			.view(text("docs"))
			.child(RouteNode::new("page").guard(common::counted_guard(&child_checks, true)).view(text("page"))),
	];
	let mut router = Router::new(routes);
	router.navigate("/docs/page").unwrap();

	assert_eq!(router.settle().await, "docs");
	assert_eq!(router.statuses().len(), 1);
	assert_eq!(child_checks.get(), 0);
}

#[tokio::test]
async fn bare_routes_render_on_the_first_pass() {
	let routes = vec![
		RouteNode::layout()
			.view(view_fn(|cx| format!("[{}]", cx.outlet().render())))
			.with_outlet()
			.child(RouteNode::new("about").view(text("about"))),
	];
	let mut router = Router::new(routes);
	router.navigate("/about").unwrap();

	assert_eq!(router.render(), "[about]");
	assert!(router.is_idle());
	let node = router.node(1).unwrap();
	assert_eq!(node.status_history(), [Status::Loaded]);
}

#[tokio::test]
async fn layouts_without_a_view_render_their_child() {
	let checks = Counter::default();
	let routes = vec![
		RouteNode::layout().child(RouteNode::new("about").view(text("about"))),
		RouteNode::layout()
			.with_outlet()
			.guard(common::counted_guard(&checks, true))
			.child(RouteNode::new("help").view(text("help"))),
	];
	let mut router = Router::new(routes);

	router.navigate("/about").unwrap();
	assert_eq!(router.settle().await, "about");
	assert_eq!(router.statuses().len(), 2);

	router.navigate("/help").unwrap();
	assert_eq!(router.settle().await, "help");
	assert_eq!(checks.get(), 1);
}
