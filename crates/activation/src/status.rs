use std::cmp::Ordering;
use std::fmt;

/// Evaluation status shared by guards, resolvers and lazy loads.
///
/// The lifecycle is `Initial → Loading → {Loaded | Failed}`. `Loaded` and
/// `Failed` are terminal and mutually exclusive, so the ordering is partial:
/// the two outcomes compare as unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
	/// Nothing has been evaluated yet.
	#[default]
	Initial,
	/// Evaluation is in flight.
	Loading,
	/// Evaluation completed successfully.
	Loaded,
	/// Evaluation was denied or errored.
	Failed,
}

impl Status {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Initial => "initial",
			Self::Loading => "loading",
			Self::Loaded => "loaded",
			Self::Failed => "failed",
		}
	}

	/// Returns `true` for `Loaded` and `Failed`.
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Loaded | Self::Failed)
	}

	pub const fn is_loading(self) -> bool {
		matches!(self, Self::Loading)
	}

	pub const fn is_loaded(self) -> bool {
		matches!(self, Self::Loaded)
	}

	pub const fn is_failed(self) -> bool {
		matches!(self, Self::Failed)
	}

	/// Lifecycle stage. Both terminal outcomes share the last stage.
	pub const fn stage(self) -> u8 {
		match self {
			Self::Initial => 0,
			Self::Loading => 1,
			Self::Loaded | Self::Failed => 2,
		}
	}

	/// Returns `true` if moving from `self` to `next` is a forward transition.
	///
	/// Self-transitions are not transitions. `Initial` may skip straight to a
	/// terminal status when there is nothing to evaluate.
	pub const fn can_transition_to(self, next: Status) -> bool {
		matches!(
			(self, next),
			(Self::Initial, Self::Loading | Self::Loaded | Self::Failed) | (Self::Loading, Self::Loaded | Self::Failed)
		)
	}

	/// Status of an evaluation that ran to completion.
	pub const fn settled(ok: bool) -> Self {
		if ok { Self::Loaded } else { Self::Failed }
	}
}

impl PartialOrd for Status {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		if self == other {
			return Some(Ordering::Equal);
		}
		match self.stage().cmp(&other.stage()) {
			Ordering::Equal => None,
			ord => Some(ord),
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
