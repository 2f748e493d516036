use std::fmt;

use smallvec::SmallVec;

use crate::Status;

/// Callback invoked with each distinct status.
pub type StatusCallback = Box<dyn FnMut(Status) + Send>;

/// De-duplicating status forwarder for one subscription.
///
/// Records every distinct status it forwards and suppresses consecutive
/// repeats, so an evaluator that re-reports an unchanged status never causes
/// a second downstream effect. One notifier serves exactly one channel of one
/// activation.
#[derive(Default)]
pub struct StatusNotifier {
	history: SmallVec<[Status; 4]>,
	subscriber: Option<StatusCallback>,
}

impl StatusNotifier {
	/// Creates a notifier without a subscriber. History is still recorded.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a notifier forwarding to `subscriber`.
	pub fn with_subscriber(subscriber: impl FnMut(Status) + Send + 'static) -> Self {
		Self {
			history: SmallVec::new(),
			subscriber: Some(Box::new(subscriber)),
		}
	}

	/// Replaces the subscriber. History is kept.
	pub fn subscribe(&mut self, subscriber: impl FnMut(Status) + Send + 'static) {
		self.subscriber = Some(Box::new(subscriber));
	}

	/// Records `status` and forwards it if it differs from the last one.
	///
	/// Returns `true` when the status was new.
	pub fn notify(&mut self, status: Status) -> bool {
		if self.last() == Some(status) {
			return false;
		}
		self.history.push(status);
		if let Some(subscriber) = self.subscriber.as_mut() {
			subscriber(status);
		}
		true
	}

	/// Most recently recorded status.
	pub fn last(&self) -> Option<Status> {
		self.history.last().copied()
	}

	/// Distinct statuses recorded since creation or the last reset.
	pub fn history(&self) -> &[Status] {
		&self.history
	}

	/// Forgets recorded history. The subscriber stays attached.
	pub fn reset(&mut self) {
		self.history.clear();
	}
}

impl fmt::Debug for StatusNotifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StatusNotifier")
			.field("history", &self.history)
			.field("subscribed", &self.subscriber.is_some())
			.finish()
	}
}
