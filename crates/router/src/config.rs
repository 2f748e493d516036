/// Router-wide options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterConfig {
	/// Prefix stripped from every location before matching.
	pub base_path: Option<String>,
	/// Title applied when no mounted route has set one.
	pub default_title: Option<String>,
	/// Compare static path segments case-sensitively.
	pub case_sensitive: bool,
}

impl RouterConfig {
	pub fn with_base_path(mut self, base: impl Into<String>) -> Self {
		self.base_path = Some(base.into());
		self
	}

	pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
		self.default_title = Some(title.into());
		self
	}

	pub fn case_sensitive(mut self, yes: bool) -> Self {
		self.case_sensitive = yes;
		self
	}

	/// Reduces a location to the path the matcher sees.
	///
	/// Query and fragment are dropped, then the base path is removed. Returns
	/// `None` when the location lies outside the base path.
	pub fn strip_base<'a>(&self, location: &'a str) -> Option<&'a str> {
		let path = location.split(['?', '#']).next().unwrap_or_default();
		let Some(base) = self.base_path.as_deref().map(|b| b.trim_end_matches('/')) else {
			return Some(path);
		};
		if base.is_empty() {
			return Some(path);
		}

		let rest = path.strip_prefix(base)?;
		if rest.is_empty() {
			Some("/")
		} else if rest.starts_with('/') {
			Some(rest)
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(None, "/users/1?tab=2#top", Some("/users/1"))]
	#[case(Some("/app"), "/app/users", Some("/users"))]
	#[case(Some("/app/"), "/app", Some("/"))]
	#[case(Some("/app"), "/apple", None)]
	#[case(Some("/app"), "/other", None)]
	#[case(Some("/"), "/x", Some("/x"))]
	fn strips_base(#[case] base: Option<&str>, #[case] location: &str, #[case] expected: Option<&str>) {
		let config = RouterConfig {
			base_path: base.map(str::to_owned),
			..RouterConfig::default()
		};
		assert_eq!(config.strip_base(location), expected);
	}
}
