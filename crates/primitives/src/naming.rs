//! Id-name grammar and generated id segments.
//!
//! Developer-assigned id-names start with an ASCII letter followed by letters,
//! digits or underscores. Generated segments are child indices; when the
//! prefix they extend already ends in a digit, the new digits are shifted to
//! letters (`0`-`9` to `a`-`j`) so that `"1" + "2"` can never be confused with
//! `"12"`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

static ID_NAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z][0-9A-Za-z_]*$").expect("id-name grammar must compile")
});

/// An id-name that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id name {0:?}: expected a letter followed by letters, digits or underscores")]
pub struct IdNameError(pub String);

/// Returns true if `name` matches the id-name grammar.
pub fn is_valid_id_name(name: &str) -> bool {
	ID_NAME.is_match(name)
}

/// A validated developer-assigned id-name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdName(String);

impl IdName {
	/// Validates `name` against the id-name grammar.
	pub fn parse(name: impl Into<String>) -> Result<Self, IdNameError> {
		let name = name.into();
		if is_valid_id_name(&name) {
			Ok(Self(name))
		} else {
			Err(IdNameError(name))
		}
	}

	/// Returns the name as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for IdName {
	type Error = IdNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl From<IdName> for String {
	fn from(value: IdName) -> Self {
		value.0
	}
}

impl AsRef<str> for IdName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for IdName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Returns true if the last character of `s` is an ASCII digit.
pub fn ends_with_digit(s: &str) -> bool {
	s.as_bytes().last().is_some_and(u8::is_ascii_digit)
}

/// Appends the decimal `index` to `buf`, shifting its digits to letters when
/// `buf` already ends in a digit.
pub fn append_index(buf: &mut String, index: usize) {
	let shift = ends_with_digit(buf);
	for digit in index.to_string().bytes() {
		let ch = if shift { digit - b'0' + b'a' } else { digit };
		buf.push(char::from(ch));
	}
}
