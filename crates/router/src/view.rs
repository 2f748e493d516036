//! View contracts.
//!
//! Views render to strings. A view receives its activation's handle and the
//! outlet behind which its child route, if any, is placed.

use std::any::Any;

use waypost_activation::{Channel, Status};

use crate::handle::{ActivationHandle, Params};
use crate::outlet::OutletGate;

/// Everything a view may read while rendering.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
	handle: &'a ActivationHandle,
	outlet: &'a OutletGate,
}

impl<'a> ViewContext<'a> {
	pub fn new(handle: &'a ActivationHandle, outlet: &'a OutletGate) -> Self {
		Self { handle, outlet }
	}

	pub fn handle(&self) -> &'a ActivationHandle {
		self.handle
	}

	pub fn outlet(&self) -> &'a OutletGate {
		self.outlet
	}

	pub fn params(&self) -> &'a Params {
		self.handle.params()
	}

	pub fn param(&self, name: &str) -> Option<&'a str> {
		self.handle.params().get(name)
	}

	/// Resolved value for `key`, if every resolver succeeded and the value is a `T`.
	pub fn data<T: Any>(&self, key: &str) -> Option<&'a T> {
		self.handle.data(key)
	}
}

/// Renders a route once its activation has completed.
pub trait View: Send + Sync {
	fn render(&self, cx: &ViewContext<'_>) -> String;
}

impl<F> View for F
where
	F: Fn(&ViewContext<'_>) -> String + Send + Sync,
{
	fn render(&self, cx: &ViewContext<'_>) -> String {
		self(cx)
	}
}

/// What a loading view may read.
#[derive(Debug, Clone, Copy)]
pub struct LoadingContext<'a> {
	handle: &'a ActivationHandle,
}

impl<'a> LoadingContext<'a> {
	pub fn new(handle: &'a ActivationHandle) -> Self {
		Self { handle }
	}

	pub fn handle(&self) -> &'a ActivationHandle {
		self.handle
	}
}

/// Shown while a route's guards or resolvers are pending.
///
/// [`on_status`](Self::on_status) is subscribed to every channel of the
/// activation for the lifetime of the mount, and receives `Failed` too, so a
/// loading view can react to failures it will never be rendered for.
pub trait LoadingView: Send + Sync {
	fn render(&self, cx: &LoadingContext<'_>) -> String;

	fn on_status(&self, _channel: Channel, _status: Status) {}
}

impl<F> LoadingView for F
where
	F: Fn(&LoadingContext<'_>) -> String + Send + Sync,
{
	fn render(&self, cx: &LoadingContext<'_>) -> String {
		self(cx)
	}
}

/// Pins a closure's signature to [`View`].
pub fn view_fn<F>(render: F) -> F
where
	F: Fn(&ViewContext<'_>) -> String + Send + Sync + 'static,
{
	render
}

/// Pins a closure's signature to [`LoadingView`].
pub fn loading_fn<F>(render: F) -> F
where
	F: Fn(&LoadingContext<'_>) -> String + Send + Sync + 'static,
{
	render
}

/// View rendering fixed text.
pub fn text(content: impl Into<String>) -> impl View + Clone + 'static {
	let content = content.into();
	view_fn(move |_| content.clone())
}
