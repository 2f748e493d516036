use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::Channel;

/// Runtime for evaluations started outside any tokio context.
static DETACHED: OnceLock<Option<Runtime>> = OnceLock::new();

/// Spawns one channel's evaluation.
///
/// Runs on the ambient runtime when there is one. Otherwise the evaluation
/// goes to a lazily built single-worker runtime, so a host can call
/// `Router::render` from plain threads. Returns `None` only if that runtime
/// cannot be built; the channel then stays `Loading`, like a hanging guard.
#[allow(clippy::disallowed_methods)]
pub fn spawn_evaluation<F>(channel: Channel, generation: u64, fut: F) -> Option<JoinHandle<F::Output>>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(channel = channel.as_str(), generation, "route.eval.spawn");
	if let Ok(handle) = Handle::try_current() {
		return Some(handle.spawn(fut));
	}

	let detached = DETACHED.get_or_init(|| {
		Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("waypost-eval")
			.build()
			.inspect_err(|error| tracing::error!(%error, "route.eval.runtime_unavailable"))
			.ok()
	});
	detached.as_ref().map(|runtime| runtime.spawn(fut))
}
