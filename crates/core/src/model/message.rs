use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern must compile"));

/// A message pattern with positional `{n}` arguments.
///
/// Placeholders without a matching argument are left as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
	pattern: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	args: Vec<String>,
}

impl Message {
	/// Creates a message without arguments.
	pub fn new(pattern: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
			args: Vec::new(),
		}
	}

	/// Creates a message with positional arguments.
	pub fn with_args<I, S>(pattern: impl Into<String>, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			pattern: pattern.into(),
			args: args.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns the raw pattern.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Substitutes the arguments into the pattern.
	pub fn format(&self) -> Cow<'_, str> {
		if self.args.is_empty() {
			return Cow::Borrowed(&self.pattern);
		}
		PLACEHOLDER.replace_all(&self.pattern, |caps: &Captures<'_>| {
			caps[1]
				.parse::<usize>()
				.ok()
				.and_then(|i| self.args.get(i))
				.map_or_else(|| caps[0].to_string(), Clone::clone)
		})
	}
}

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.format())
	}
}

impl From<&str> for Message {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for Message {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
