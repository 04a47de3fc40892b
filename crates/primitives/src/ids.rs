use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable arena index of a component within its tree.
///
/// Identifiers are assigned once at creation and never reused, so they can key
/// per-session model maps for as long as the tree lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl ComponentId {
	/// Returns the arena slot index.
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}
