use std::cell::Cell;

/// Placement point for a child route's output inside its parent's view.
///
/// The child's output is handed out on the first [`render`](Self::render)
/// only; later calls yield an empty string so a view that places the outlet
/// twice does not duplicate the child.
#[derive(Debug, Default)]
pub struct OutletGate {
	parent_loaded: bool,
	content: Option<String>,
	consumed: Cell<bool>,
}

impl OutletGate {
	pub fn new(parent_loaded: bool, content: Option<String>) -> Self {
		Self {
			parent_loaded,
			content,
			consumed: Cell::new(false),
		}
	}

	/// Gate of a node whose activation has not completed.
	pub fn closed() -> Self {
		Self::default()
	}

	/// Whether the node owning this outlet has finished loading.
	pub fn is_parent_loaded(&self) -> bool {
		self.parent_loaded
	}

	/// Whether a matched child route is placed behind this outlet.
	pub fn has_child(&self) -> bool {
		self.content.is_some()
	}

	pub fn is_consumed(&self) -> bool {
		self.consumed.get()
	}

	pub fn render(&self) -> String {
		if !self.parent_loaded || self.consumed.replace(true) {
			return String::new();
		}
		self.content.clone().unwrap_or_default()
	}
}
