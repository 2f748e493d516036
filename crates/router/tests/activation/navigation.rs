use std::time::Duration;

use pretty_assertions::assert_eq;
use waypost_router::{Channel, GuardSpec, Location, RouteNode, Router, RouterError, Status, text, view_fn};

use crate::common::{self, Counter, Log};

#[tokio::test(start_paused = true)]
async fn leaving_a_pending_route_drops_its_results() {
	common::init_tracing();
	let log = Log::default();
	let resolves = Counter::default();
	let routes = vec![
		RouteNode::new("slow")
			.guard(common::delayed_guard(&log, "slow.guard", Duration::from_millis(30), true))
			.resolver("never", common::counted_value(&resolves, ()))
			.view(text("slow")),
		RouteNode::new("fast").view(text("fast")),
	];
	let mut router = Router::new(routes);

	router.navigate("/slow").unwrap();
	assert_eq!(router.render(), "");
	let slow_generation = router.statuses()[0].generation;

	router.navigate("/fast").unwrap();
	assert_eq!(router.render(), "fast");

	tokio::time::sleep(Duration::from_millis(100)).await;
	assert_eq!(router.process_pending(), 0);
	assert!(log.entries().is_empty(), "cancelled guard never completes");
	assert_eq!(resolves.get(), 0);

	let statuses = router.statuses();
	assert_eq!(statuses.len(), 1);
	assert_eq!(statuses[0].label, "fast");
	assert!(statuses[0].generation > slow_generation);
}

#[tokio::test]
async fn pending_route_never_settles_until_its_guard_does() {
	let routes = vec![RouteNode::new("stuck").guard(GuardSpec::from_async(std::future::pending::<bool>)).view(text("stuck"))];
	let mut router = Router::new(routes);
	router.navigate("/stuck").unwrap();

	let settled = tokio::time::timeout(Duration::from_millis(20), router.settle()).await;
	assert!(settled.is_err());
	assert_eq!(router.statuses()[0].status, Status::Loading);
}

#[tokio::test]
async fn remounting_starts_a_fresh_activation() {
	let resolves = Counter::default();
	let routes = vec![
		RouteNode::new("a").resolver("n", common::counted_value(&resolves, 1u8)).view(text("a")),
		RouteNode::new("b").view(text("b")),
	];
	let mut router = Router::new(routes);

	router.navigate("/a").unwrap();
	assert_eq!(router.settle().await, "a");
	let first = router.statuses()[0].generation;

	router.navigate("/b").unwrap();
	assert_eq!(router.settle().await, "b");
	router.navigate("/a").unwrap();
	assert_eq!(router.settle().await, "a");

	assert_eq!(resolves.get(), 2, "results are not cached across mounts");
	assert_ne!(router.statuses()[0].generation, first);
}

#[tokio::test]
async fn same_route_keeps_its_activation() {
	let resolves = Counter::default();
	let routes = vec![
		RouteNode::new("users/:id")
			.resolver("profile", common::counted_value(&resolves, "profile"))
			.view(view_fn(|cx| format!("user {}", cx.param("id").unwrap_or("?")))),
	];
	let mut router = Router::new(routes);

	router.navigate("/users/1").unwrap();
	assert_eq!(router.settle().await, "user 1");
	let generation = router.statuses()[0].generation;

	router.navigate("/users/2").unwrap();
	assert_eq!(router.settle().await, "user 2");
	assert_eq!(router.statuses()[0].generation, generation);
	assert_eq!(resolves.get(), 1);
}

#[tokio::test]
async fn shared_parent_survives_child_navigation() {
	let parent_resolves = Counter::default();
	let child_checks = Counter::default();
	let routes = vec![
		RouteNode::new("account")
			.resolver("user", common::counted_value(&parent_resolves, "joe"))
			.view(view_fn(|cx| format!("account/{}", cx.outlet().render())))
			.with_outlet()
			.children([
				RouteNode::new("orders").guard(common::counted_guard(&child_checks, true)).view(text("orders")),
				RouteNode::new("profile").guard(common::counted_guard(&child_checks, true)).view(text("profile")),
			]),
	];
	let mut router = Router::new(routes);

	router.navigate("/account/orders").unwrap();
	assert_eq!(router.settle().await, "account/orders");
	let parent = router.statuses()[0].generation;

	router.navigate("/account/profile").unwrap();
	assert_eq!(router.settle().await, "account/profile");

	assert_eq!(router.statuses()[0].generation, parent);
	assert_eq!(parent_resolves.get(), 1);
	assert_eq!(child_checks.get(), 2);
}

#[tokio::test]
async fn unknown_location_is_an_error() {
	let mut router = Router::new(vec![RouteNode::new("home").view(text("home"))]);
	assert_eq!(router.navigate("/away"), Err(RouterError::NoMatch("/away".into())));
	assert_eq!(router.settle().await, "");
	assert_eq!(router.location().path(), "/away");
}

#[tokio::test]
async fn guards_read_params_through_the_location() {
	let location = Location::new();
	let current = location.clone();
	let routes = vec![
		RouteNode::new("orders/:id")
			.guard(GuardSpec::from_fn(move || current.param("id").as_deref() != Some("0")))
			.view(view_fn(|cx| format!("order {}", cx.param("id").unwrap_or("?")))),
		RouteNode::new("home").view(text("home")),
	];
	let mut router = Router::new(routes).with_location(location);

	router.navigate("/orders/0").unwrap();
	assert_eq!(router.settle().await, "");
	assert_eq!(router.statuses()[0].status, Status::Failed);

	router.navigate("/home").unwrap();
	router.settle().await;
	router.navigate("/orders/7").unwrap();
	assert_eq!(router.settle().await, "order 7");
}

#[tokio::test]
async fn queued_result_from_an_earlier_mount_is_ignored() {
	let calls = Counter::default();
	let guard = {
		let calls = calls.clone();
		GuardSpec::from_fn(move || {
			calls.bump();
			calls.get() > 1
		})
	};
	let routes = vec![
		RouteNode::new("a").guard(guard).view(text("a")),
		RouteNode::new("b").view(text("b")),
	];
	let mut router = Router::new(routes);

	router.navigate("/a").unwrap();
	assert_eq!(router.render(), "");
	while calls.get() == 0 {
		tokio::task::yield_now().await;
	}

	router.navigate("/b").unwrap();
	assert_eq!(router.render(), "b");
	router.navigate("/a").unwrap();
	assert_eq!(router.settle().await, "a");

	assert_eq!(calls.get(), 2);
	assert_eq!(router.statuses()[0].status, Status::Loaded);
	assert_eq!(router.node(0).unwrap().history(Channel::Guards), [Status::Loading, Status::Loaded]);
}
