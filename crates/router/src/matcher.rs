//! Path matching.
//!
//! Matching selects one branch of the route tree for a location. Activation
//! never looks at paths; it only sees the branch the matcher picked.

use crate::handle::Params;
use crate::tree::RouteShape;

/// A matched branch: the child index taken at each level, plus captured params.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
	pub(crate) branch: Vec<usize>,
	pub(crate) params: Params,
}

impl RouteMatch {
	pub fn branch(&self) -> &[usize] {
		&self.branch
	}

	pub fn params(&self) -> &Params {
		&self.params
	}

	pub fn depth(&self) -> usize {
		self.branch.len()
	}
}

/// Picks the branch of a route tree that renders a location.
pub trait PathMatcher {
	fn match_location<R: RouteShape>(&self, routes: &[R], path: &str) -> Option<RouteMatch>;
}

/// Segment-wise matcher.
///
/// Patterns are split on `/`. A segment is static text, a `:name` param
/// matching any one segment, or a final `*` capturing the remainder. Routes
/// are tried in order; the first route whose subtree matches wins, and a
/// route matches by itself only when the whole location is consumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentMatcher {
	case_sensitive: bool,
}

impl SegmentMatcher {
	pub fn new(case_sensitive: bool) -> Self {
		Self { case_sensitive }
	}

	fn same(&self, pattern: &str, segment: &str) -> bool {
		if self.case_sensitive {
			pattern == segment
		} else {
			pattern.eq_ignore_ascii_case(segment)
		}
	}

	/// Consumes `pattern` from the front of `segments`, returning how many
	/// segments it used.
	fn consume(&self, pattern: &str, segments: &[&str], params: &mut Params) -> Option<usize> {
		let mut used = 0;
		for part in split(pattern) {
			if part == "*" {
				params.insert("*", segments[used..].join("/"));
				return Some(segments.len());
			}
			let segment = segments.get(used)?;
			if let Some(name) = part.strip_prefix(':') {
				params.insert(name, *segment);
			} else if !self.same(part, segment) {
				return None;
			}
			used += 1;
		}
		Some(used)
	}

	fn match_in<R: RouteShape>(&self, routes: &[R], segments: &[&str], params: &Params) -> Option<RouteMatch> {
		for (i, route) in routes.iter().enumerate() {
			if route.is_index_route() {
				if segments.is_empty() {
					return Some(RouteMatch {
						branch: vec![i],
						params: params.clone(),
					});
				}
				continue;
			}

			let mut scoped = params.clone();
			let used = match route.route_path() {
				Some(pattern) => match self.consume(pattern, segments, &mut scoped) {
					Some(used) => used,
					None => continue,
				},
				None => 0,
			};
			let rest = &segments[used..];

			if let Some(mut nested) = self.match_in(route.child_routes(), rest, &scoped) {
				nested.branch.insert(0, i);
				return Some(nested);
			}
			if rest.is_empty() {
				return Some(RouteMatch {
					branch: vec![i],
					params: scoped,
				});
			}
		}
		None
	}
}

impl PathMatcher for SegmentMatcher {
	fn match_location<R: RouteShape>(&self, routes: &[R], path: &str) -> Option<RouteMatch> {
		let segments: Vec<&str> = split(path).collect();
		self.match_in(routes, &segments, &Params::default())
	}
}

fn split(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|s| !s.is_empty())
}
