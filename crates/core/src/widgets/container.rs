use trellis_primitives::CapabilitySet;

use crate::tree::Component;

/// Groups children. May be flagged as a naming context.
#[derive(Debug, Clone, Copy, Default)]
pub struct Container;

impl Component for Container {
	fn kind(&self) -> &'static str {
		"container"
	}

	fn capabilities(&self) -> CapabilitySet {
		CapabilitySet::NAMING_CONTEXT
	}
}
