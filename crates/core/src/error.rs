//! Configuration errors raised by the component model.
//!
//! Every variant is fatal for the current request: traversals stop at the
//! first error and return it. Bad request data is never reported here; widgets
//! log it and keep their previous state.

use thiserror::Error;
use trellis_primitives::{Capability, ComponentId, IdNameError};

use crate::repeater::RowKey;

/// Errors raised when the component tree is misconfigured.
#[derive(Debug, Error)]
pub enum ComponentError {
	/// An id-name does not match the grammar.
	#[error(transparent)]
	InvalidIdName(#[from] IdNameError),

	/// Two components registered the same id-name in one naming context.
	#[error("duplicate id name {name:?} in naming context {context:?}: {existing} and {duplicate}")]
	DuplicateIdName {
		/// The clashing id-name.
		name: String,
		/// Rendered id of the naming context.
		context: String,
		/// Component registered first.
		existing: ComponentId,
		/// Component that tried to register second.
		duplicate: ComponentId,
	},

	/// The child already has a parent.
	#[error("{child} already has parent {parent}")]
	AlreadyParented {
		/// Component being added.
		child: ComponentId,
		/// Its current parent.
		parent: ComponentId,
	},

	/// A component lacks a capability an operation requires.
	#[error("{component} ({kind}) does not support {capability:?}")]
	MissingCapability {
		/// The component.
		component: ComponentId,
		/// Its kind name.
		kind: &'static str,
		/// The missing capability.
		capability: Capability,
	},

	/// Two rows of one pass resolved to the same row context.
	#[error("repeater {repeater}: rows share row context {seq} (key {key})")]
	DuplicateRowContext {
		/// The repeater.
		repeater: ComponentId,
		/// The colliding row key.
		key: RowKey,
		/// Sequence number of the shared row context.
		seq: u64,
	},

	/// A row render id does not match the id-name grammar.
	#[error("repeater {repeater}: invalid row render id {value:?}")]
	InvalidRowRenderId {
		/// The repeater.
		repeater: ComponentId,
		/// The rejected render id.
		value: String,
	},

	/// A row context was requested that the repeater does not hold.
	#[error("repeater {repeater} has no row context for key {key}")]
	UnknownRowContext {
		/// The repeater.
		repeater: ComponentId,
		/// The requested key.
		key: RowKey,
	},

	/// A repeater has no repeated root child.
	#[error("repeater {0} has no repeated root")]
	EmptyRepeater(ComponentId),

	/// The component is not a repeater.
	#[error("{0} is not a repeater")]
	NotARepeater(ComponentId),

	/// Framework state was written on a locked component without a session.
	#[error("{component} is locked and no session context is active")]
	NoActiveContext {
		/// The component whose model would have been written.
		component: ComponentId,
	},

	/// Row contexts never own the environment.
	#[error("environment cannot be set on a row context")]
	RowContextEnvironment,

	/// A renderer failed.
	#[error("rendering {component} failed: {message}")]
	Render {
		/// The component being painted.
		component: ComponentId,
		/// Renderer message.
		message: String,
	},
}

/// Result type for component model operations.
pub type Result<T> = std::result::Result<T, ComponentError>;
