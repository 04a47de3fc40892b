/// A behaviour a component may support, queried during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
	/// Can be disabled; disabled components skip validation.
	Disableable,
	/// Accepts user input; read-only inputs skip validation.
	Input,
	/// May be flagged as a naming context.
	NamingContext,
}

bitflags::bitflags! {
	/// A set of component capabilities.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct CapabilitySet: u8 {
		/// Can be disabled.
		const DISABLEABLE = 1 << 0;
		/// Accepts user input.
		const INPUT = 1 << 1;
		/// May be flagged as a naming context.
		const NAMING_CONTEXT = 1 << 2;
	}
}

impl Capability {
	/// Returns the bitflag for this capability.
	pub const fn as_set(self) -> CapabilitySet {
		match self {
			Self::Disableable => CapabilitySet::DISABLEABLE,
			Self::Input => CapabilitySet::INPUT,
			Self::NamingContext => CapabilitySet::NAMING_CONTEXT,
		}
	}
}

impl CapabilitySet {
	/// Returns true if `cap` is part of this set.
	pub const fn supports(self, cap: Capability) -> bool {
		self.contains(cap.as_set())
	}
}

impl From<Capability> for CapabilitySet {
	fn from(cap: Capability) -> Self {
		cap.as_set()
	}
}

impl FromIterator<Capability> for CapabilitySet {
	fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
		let mut set = CapabilitySet::empty();
		for cap in iter {
			set |= cap.as_set();
		}
		set
	}
}
