//! Core types shared by the component model: identifiers, flag sets,
//! capabilities and the id-name grammar.

/// Component capability sets.
pub mod capability;
/// Per-model boolean state flags.
pub mod flags;
/// Arena identifiers for components.
pub mod ids;
/// Developer id-name grammar and generated id segments.
pub mod naming;

pub use capability::{Capability, CapabilitySet};
pub use flags::ModelFlags;
pub use ids::ComponentId;
pub use naming::{IdName, IdNameError, append_index, ends_with_digit, is_valid_id_name};
