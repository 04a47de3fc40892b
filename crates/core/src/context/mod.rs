//! Per-session state: session models, scratch storage, focus and deferred
//! actions.
//!
//! A [`UiContext`] maps components to their session models. The top-level
//! implementation is [`SessionContext`]; repeaters nest a [`RowScope`] per
//! data row that keeps its own models for the repeated subtree and delegates
//! everything else to its parent.

mod row;
mod session;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use trellis_primitives::ComponentId;

pub use row::{RowContext, RowFrame, RowScope};
pub use session::SessionContext;

use crate::error::Result;
use crate::model::ComponentModel;
use crate::repeater::RowKey;
use crate::scope::Scope;
use crate::traversal::Outcome;

/// A deferred action, run once after the top-level request traversal.
pub type Deferred = Box<dyn FnOnce(&mut Scope<'_>) -> Result<Outcome> + Send>;

/// Row contexts entered between the session and the current scope, outermost
/// first.
pub type RowPath = SmallVec<[RowRef; 2]>;

/// One entered row: the repeater and the row key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowRef {
	/// The repeater owning the row.
	pub repeater: ComponentId,
	/// Key of the row within the repeater.
	pub key: RowKey,
}

/// The focused component, with the rendered id that tells repeated rows apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Focus {
	/// The focused component.
	pub component: ComponentId,
	/// Its rendered id when focus was requested.
	pub rendered_id: String,
}

/// Host-provided request environment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Environment {
	/// Application path the tree is served under.
	pub app_path: String,
	/// Base URL for generated links.
	pub base_url: String,
}

/// Volatile per-component cache.
///
/// Cleared whenever the tree shape changes or the host starts a new request;
/// never rely on an entry surviving a call.
#[derive(Debug, Clone, Default)]
pub struct ScratchMap(FxHashMap<&'static str, String>);

impl ScratchMap {
	/// Returns a cached value.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Caches a value.
	pub fn insert(&mut self, key: &'static str, value: String) {
		self.0.insert(key, value);
	}

	/// Drops a cached value.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.0.remove(key)
	}

	/// Returns true if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Session-scoped state consumed by the component model.
pub trait UiContext {
	/// Returns the session model of a component, if one exists.
	fn model(&self, id: ComponentId) -> Option<&ComponentModel>;

	/// Returns the session model of a component mutably, if one exists.
	fn model_mut(&mut self, id: ComponentId) -> Option<&mut ComponentModel>;

	/// Returns the session model, storing `make()` first if none exists.
	fn model_or_insert_with(
		&mut self,
		id: ComponentId,
		make: &mut dyn FnMut() -> ComponentModel,
	) -> &mut ComponentModel;

	/// Stores a session model.
	fn set_model(&mut self, id: ComponentId, model: ComponentModel);

	/// Drops a session model.
	fn remove_model(&mut self, id: ComponentId) -> Option<ComponentModel>;

	/// Components with a session model stored directly in this context.
	fn model_ids(&self) -> Vec<ComponentId>;

	/// Returns the scratch map of a component, if any.
	fn scratch(&self, id: ComponentId) -> Option<&ScratchMap>;

	/// Returns the scratch map of a component, creating it if needed.
	fn scratch_mut(&mut self, id: ComponentId) -> &mut ScratchMap;

	/// Drops every scratch map this context owns.
	fn clear_scratch(&mut self);

	/// Drops the scratch map of one component.
	fn clear_scratch_for(&mut self, id: ComponentId);

	/// Queues an action to run after the top-level request traversal.
	fn invoke_later(&mut self, action: Deferred);

	/// Takes every queued action, in enqueue order.
	fn take_invoke_laters(&mut self) -> Vec<Deferred>;

	/// Returns the focused component.
	fn focus(&self) -> Option<&Focus>;

	/// Sets or clears the focused component.
	fn set_focus(&mut self, focus: Option<Focus>);

	/// Returns the request environment.
	fn environment(&self) -> Option<&Environment>;

	/// Sets the request environment.
	fn set_environment(&mut self, environment: Environment) -> Result<()>;

	/// Returns the innermost row frame whose repeated subtree contains `id`.
	fn row_frame(&self, id: ComponentId) -> Option<&RowFrame>;

	/// Returns the rows entered to reach this context, outermost first.
	fn row_path(&self) -> RowPath;

	/// Returns the data of the innermost row containing `id`.
	fn row_data(&self, id: ComponentId) -> Option<&Value>;

	/// Returns the data of the innermost row containing `id` mutably.
	fn row_data_mut(&mut self, id: ComponentId) -> Option<&mut Value>;
}
