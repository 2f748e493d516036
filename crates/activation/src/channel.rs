/// Independent evaluation channels of one route activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
	/// Sequential access checks gating everything else.
	Guards,
	/// Concurrent data providers started once guards pass.
	Resolvers,
	/// Deferred view fetch, observed for its outcome only.
	LazyLoad,
}

impl Channel {
	pub const ALL: [Channel; 3] = [Self::Guards, Self::Resolvers, Self::LazyLoad];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Guards => "guards",
			Self::Resolvers => "resolvers",
			Self::LazyLoad => "lazy_load",
		}
	}
}
