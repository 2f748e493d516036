//! Effects that leave the activation node.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::machine::Effect;

/// Receives document titles.
pub trait TitleSink: Send + Sync {
	fn set_title(&self, title: &str);
}

/// Title sink that stores the last title for later inspection.
#[derive(Debug, Clone, Default)]
pub struct SharedTitle(Arc<Mutex<Option<String>>>);

impl SharedTitle {
	pub fn get(&self) -> Option<String> {
		self.0.lock().clone()
	}
}

impl TitleSink for SharedTitle {
	fn set_title(&self, title: &str) {
		*self.0.lock() = Some(title.to_owned());
	}
}

/// Runs external effects on behalf of the router.
#[derive(Default, Clone)]
pub struct EffectRunner {
	title: Option<Arc<dyn TitleSink>>,
}

impl EffectRunner {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_title_sink(mut self, sink: Arc<dyn TitleSink>) -> Self {
		self.title = Some(sink);
		self
	}

	pub fn apply(&self, effect: &Effect) {
		match effect {
			Effect::SetTitle(title) => {
				tracing::debug!(title = %title, "route.title");
				if let Some(sink) = &self.title {
					sink.set_title(title);
				}
			}
			other => tracing::trace!(effect = ?other, "route.effect.internal"),
		}
	}

	pub fn apply_all(&self, effects: impl IntoIterator<Item = Effect>) {
		for effect in effects {
			self.apply(&effect);
		}
	}
}

impl fmt::Debug for EffectRunner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EffectRunner").field("title", &self.title.is_some()).finish()
	}
}
