use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identity of a data row.
///
/// Holds the canonical JSON text of the key value, so keys compare and hash
/// structurally and survive serialization as map keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
	/// Derives the key of a row from its key value.
	pub fn new(value: &Value) -> Self {
		Self(value.to_string())
	}

	/// Returns the canonical key text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&Value> for RowKey {
	fn from(value: &Value) -> Self {
		Self::new(value)
	}
}

impl fmt::Display for RowKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
