use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use waypost_router::{
	BoxError, LazyLoader, RouteNode, Router, RouterConfig, SharedTitle, Status, View, loading_fn, text, view_fn,
};

use crate::common::{self, Log};

#[tokio::test(start_paused = true)]
async fn loading_view_shows_while_guards_are_pending() {
	let log = Log::default();
	let routes = vec![
		RouteNode::new("inbox")
			.guard(common::delayed_guard(&log, "inbox.session", Duration::from_millis(50), true))
			.loading_view(loading_fn(|cx| format!("loading guards={}", cx.handle().guard_status())))
			.view(text("inbox")),
	];
	let mut router = Router::new(routes);
	router.navigate("/inbox").unwrap();

	assert_eq!(router.render(), "loading guards=loading");
	assert_eq!(router.process_pending(), 0);

	assert!(router.next_event().await);
	assert_eq!(router.render(), "inbox");
	assert_eq!(log.entries(), ["inbox.session"]);
}

#[tokio::test]
async fn deferred_view_loads_behind_the_loading_view() {
	let loader = LazyLoader::new(|| async {
		tokio::task::yield_now().await;
		Ok::<_, BoxError>(Arc::new(text("reports")) as Arc<dyn View>)
	});
	let routes = vec![
		RouteNode::new("reports")
			.deferred_view(loader)
			.loading_view(loading_fn(|_| "fetching".to_string())),
	];
	let mut router = Router::new(routes);
	router.navigate("/reports").unwrap();

	assert_eq!(router.render(), "fetching");
	assert_eq!(router.settle().await, "reports");
	assert_eq!(router.statuses()[0].state.lazy, Status::Loaded);
}

#[tokio::test]
async fn deferred_view_failure_reaches_the_loading_view() {
	let loader = LazyLoader::<Arc<dyn View>>::new(|| async { Err(std::io::Error::other("chunk 7 missing")) });
	let routes = vec![
		RouteNode::new("reports")
			.deferred_view(loader)
			.loading_view(loading_fn(|cx| match cx.handle().lazy_error() {
				Some(error) => format!("failed: {error}"),
				None => "fetching".to_owned(),
			})),
	];
	let mut router = Router::new(routes);
	router.navigate("/reports").unwrap();

	assert_eq!(router.settle().await, "failed: chunk 7 missing");
	let statuses = router.statuses();
	assert_eq!(statuses[0].state.lazy, Status::Failed);
	assert_eq!(statuses[0].status, Status::Failed);
}

#[tokio::test]
async fn outlet_places_the_child_once() {
	let routes = vec![
		RouteNode::new("shop")
			.view(view_fn(|cx| {
				let outlet = cx.outlet();
				assert!(outlet.is_parent_loaded());
				format!("{}|{}|{}", outlet.has_child(), outlet.render(), outlet.render())
			}))
			.with_outlet()
			.child(RouteNode::new("cart").view(text("cart"))),
	];
	let mut router = Router::new(routes);

	router.navigate("/shop/cart").unwrap();
	assert_eq!(router.settle().await, "true|cart|");

	router.navigate("/shop").unwrap();
	assert_eq!(router.settle().await, "false||");
}

#[tokio::test]
async fn params_reach_views() {
	let routes = vec![
		RouteNode::new("users/:id")
			.view(view_fn(|cx| format!("user {}", cx.param("id").unwrap_or("?")))),
		RouteNode::new("files/*").view(view_fn(|cx| format!("file {}", cx.param("*").unwrap_or_default()))),
	];
	let mut router = Router::new(routes);

	router.navigate("/users/7?tab=posts").unwrap();
	assert_eq!(router.settle().await, "user 7");
	assert_eq!(router.location().param("id").as_deref(), Some("7"));

	router.navigate("/files/a/b.txt").unwrap();
	assert_eq!(router.settle().await, "file a/b.txt");
}

#[tokio::test]
async fn titles_follow_loaded_routes() {
	let title = SharedTitle::default();
	let config = RouterConfig::default().with_default_title("Waypost");
	let routes = vec![
		RouteNode::new("inbox")
			.title("Inbox")
			.guard(waypost_router::GuardSpec::from_async(|| async {
				tokio::task::yield_now().await;
				true
			}))
			.view(text("inbox")),
		RouteNode::new("about").view(text("about")),
	];
	let mut router = Router::with_config(routes, config).with_title_sink(Arc::new(title.clone()));

	router.navigate("/inbox").unwrap();
	assert_eq!(title.get().as_deref(), Some("Waypost"));
	router.settle().await;
	assert_eq!(title.get().as_deref(), Some("Inbox"));

	router.navigate("/about").unwrap();
	assert_eq!(router.settle().await, "about");
	assert_eq!(title.get().as_deref(), Some("Waypost"));
}
