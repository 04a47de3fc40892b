//! Server-side component trees with per-session state.
//!
//! One [`ComponentTree`] is built at startup and shared by every session.
//! Each component owns a shared model; once the tree is locked, writes made
//! under a session land in that session's copy-on-write model instead. Row
//! contexts extend the same overlay one level further for repeated subtrees.
//!
//! All access goes through a [`Scope`], which carries the active context
//! explicitly:
//!
//! ```
//! use trellis_core::widgets::{Container, Text};
//! use trellis_core::{ComponentTree, Scope, SessionContext};
//!
//! let tree = ComponentTree::default();
//! let root = tree.create(Container);
//! let greeting = tree.create(Text);
//! let mut setup = Scope::detached(&tree);
//! setup.add(root, greeting).unwrap();
//! tree.lock(root);
//!
//! let mut session = SessionContext::new();
//! let mut scope = Scope::new(&tree, &mut session);
//! Text::set_text(&mut scope, greeting, "hello");
//! assert_eq!(Text::text(&scope, greeting), "hello");
//! assert_eq!(Text::text(&Scope::detached(&tree), greeting), "");
//! ```
//!
//! # Sub-modules
//!
//! - [`model`] - component models and the field table
//! - [`context`] - session and row contexts
//! - [`tree`] - the shared arena and the [`Component`] trait
//! - [`scope`] - context-sensitive reads and writes
//! - [`naming`] - internal ids, rendered ids and duplicate detection
//! - [`repeater`] - row contexts for repeated subtrees
//! - [`traversal`] - request, paint and validate passes

/// Session and row contexts.
pub mod context;
/// Validation diagnostics.
pub mod diagnostic;
/// Component model errors.
pub mod error;
/// Component models.
pub mod model;
/// Id generation and duplicate id-name detection.
pub mod naming;
/// Property access on row data.
pub mod property;
/// Render sinks and renderers.
pub mod render;
/// Repeaters and row keys.
pub mod repeater;
/// Request data.
pub mod request;
/// Context-sensitive tree access.
pub mod scope;
/// Traversal passes.
pub mod traversal;
/// The shared component tree.
pub mod tree;
/// Reference widgets.
pub mod widgets;

pub use context::{RowContext, RowScope, SessionContext, UiContext};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{ComponentError, Result};
pub use model::{ComponentModel, Message, ModelView};
pub use repeater::{Repeater, RowKey};
pub use request::{FormRequest, Request};
pub use scope::Scope;
pub use traversal::{Outcome, Pass};
pub use tree::{Component, ComponentTree};
pub use trellis_config::Config;
pub use trellis_primitives::{Capability, CapabilitySet, ComponentId, IdName, ModelFlags};
