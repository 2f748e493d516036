//! KDL parsing utilities shared across config modules.

use kdl::KdlNode;

use crate::error::{ConfigError, Result};

/// Positional string arguments of a node, in order.
pub fn string_args(node: &KdlNode) -> impl Iterator<Item = Option<&str>> {
	node.entries()
		.iter()
		.filter(|e| e.name().is_none())
		.map(|e| e.value().as_string())
}

/// The first positional argument, which must be a string.
pub fn required_string(node: &KdlNode) -> Result<&str> {
	string_args(node).next().flatten().ok_or_else(|| ConfigError::InvalidValue {
		node: node.name().value().to_string(),
		expected: "a string argument",
	})
}

/// Exactly `N` positional string arguments.
pub fn required_strings<const N: usize>(node: &KdlNode) -> Result<[&str; N]> {
	let invalid = || ConfigError::InvalidValue {
		node: node.name().value().to_string(),
		expected: if N == 2 { "two string arguments" } else { "string arguments" },
	};
	let args: Vec<&str> = string_args(node).collect::<Option<_>>().ok_or_else(invalid)?;
	args.try_into().map_err(|_| invalid())
}

/// A flag node: bare (`outlet`) means `true`, otherwise one boolean argument.
pub fn flag(node: &KdlNode) -> Result<bool> {
	let Some(entry) = node.entries().iter().find(|e| e.name().is_none()) else {
		return Ok(true);
	};
	entry.value().as_bool().ok_or_else(|| ConfigError::InvalidValue {
		node: node.name().value().to_string(),
		expected: "a boolean",
	})
}

/// Closest candidate within two edits of `name`.
pub fn suggest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
	candidates
		.into_iter()
		.map(|candidate| (strsim::levenshtein(name, candidate), candidate))
		.filter(|(distance, _)| *distance <= 2)
		.min_by_key(|(distance, _)| *distance)
		.map(|(_, candidate)| candidate.to_string())
}
