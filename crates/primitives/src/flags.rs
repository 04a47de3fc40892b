bitflags::bitflags! {
	/// Boolean state held by a component model.
	///
	/// A session model tracks which of these bits it has written; bits it has
	/// not written read through to the shared model.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
	pub struct ModelFlags: u16 {
		/// Component takes part in request handling and painting.
		const VISIBLE = 1 << 0;
		/// Component has run its one-off session initialisation.
		const INITIALISED = 1 << 1;
		/// Component ignores user input.
		const DISABLED = 1 << 2;
		/// Input is shown but cannot be edited.
		const READ_ONLY = 1 << 3;
		/// Input requires a value.
		const MANDATORY = 1 << 4;
		/// Component and its subtree take part in validation.
		const VALIDATE = 1 << 5;
		/// Client should submit the form when the value changes.
		const SUBMIT_ON_CHANGE = 1 << 6;
		/// Painted but hidden on the client.
		const HIDDEN = 1 << 7;
		/// User data has been attached.
		const USER_DATA_SET = 1 << 8;
		/// Text output is escaped.
		const ENCODE_TEXT = 1 << 9;
		/// Component interactions are tracked.
		const TRACKABLE = 1 << 10;
		/// Subtree owns its own id-name namespace.
		const NAMING_CONTEXT = 1 << 11;
	}
}

impl ModelFlags {
	/// Flags carried by a freshly created model.
	pub const DEFAULT: Self = Self::VISIBLE.union(Self::VALIDATE).union(Self::ENCODE_TEXT);
}

impl Default for ModelFlags {
	fn default() -> Self {
		Self::DEFAULT
	}
}
