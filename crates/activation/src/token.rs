use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for route activations.
///
/// Every mount takes a fresh generation, so results tagged with an older one
/// can be recognised as belonging to a previous activation.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Issues a token for a new activation.
	pub fn activate(&self) -> ActivationToken {
		ActivationToken::new(self.next(), CancellationToken::new())
	}
}

/// Generation-scoped liveness token for one activation.
///
/// Cancelled on unmount. Evaluation tasks stop at their next suspension point,
/// and any result that still arrives is rejected by generation.
#[derive(Debug, Clone)]
pub struct ActivationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl ActivationToken {
	/// Creates a new activation token.
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true while the activation is still mounted.
	pub fn is_live(&self) -> bool {
		!self.cancel.is_cancelled()
	}

	/// Returns true if `generation` belongs to this live activation.
	pub fn accepts(&self, generation: u64) -> bool {
		self.is_live() && self.generation == generation
	}

	/// Marks the activation as gone.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when the activation is cancelled.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
