use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_primitives::ComponentId;

use super::{Deferred, Environment, Focus, RowFrame, RowPath, ScratchMap, UiContext};
use crate::error::Result;
use crate::model::ComponentModel;

/// Top-level context of one user session.
///
/// Owns the session models, scratch maps, focus, environment and the deferred
/// action queue. Scratch maps and queued actions are not persisted.
#[derive(Default, Serialize, Deserialize)]
pub struct SessionContext {
	models: FxHashMap<ComponentId, ComponentModel>,
	#[serde(skip)]
	scratch: FxHashMap<ComponentId, ScratchMap>,
	#[serde(skip)]
	deferred: Vec<Deferred>,
	focus: Option<Focus>,
	environment: Option<Environment>,
}

impl SessionContext {
	/// Creates an empty session context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of session models held.
	pub fn model_count(&self) -> usize {
		self.models.len()
	}

	/// Number of queued deferred actions.
	pub fn pending_actions(&self) -> usize {
		self.deferred.len()
	}
}

impl fmt::Debug for SessionContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionContext")
			.field("models", &self.models.len())
			.field("scratch", &self.scratch.len())
			.field("deferred", &self.deferred.len())
			.field("focus", &self.focus)
			.field("environment", &self.environment)
			.finish()
	}
}

impl UiContext for SessionContext {
	fn model(&self, id: ComponentId) -> Option<&ComponentModel> {
		self.models.get(&id)
	}

	fn model_mut(&mut self, id: ComponentId) -> Option<&mut ComponentModel> {
		self.models.get_mut(&id)
	}

	fn model_or_insert_with(
		&mut self,
		id: ComponentId,
		make: &mut dyn FnMut() -> ComponentModel,
	) -> &mut ComponentModel {
		self.models.entry(id).or_insert_with(make)
	}

	fn set_model(&mut self, id: ComponentId, model: ComponentModel) {
		self.models.insert(id, model);
	}

	fn remove_model(&mut self, id: ComponentId) -> Option<ComponentModel> {
		self.models.remove(&id)
	}

	fn model_ids(&self) -> Vec<ComponentId> {
		let mut ids: Vec<_> = self.models.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	fn scratch(&self, id: ComponentId) -> Option<&ScratchMap> {
		self.scratch.get(&id)
	}

	fn scratch_mut(&mut self, id: ComponentId) -> &mut ScratchMap {
		self.scratch.entry(id).or_default()
	}

	fn clear_scratch(&mut self) {
		self.scratch.clear();
	}

	fn clear_scratch_for(&mut self, id: ComponentId) {
		self.scratch.remove(&id);
	}

	fn invoke_later(&mut self, action: Deferred) {
		self.deferred.push(action);
	}

	fn take_invoke_laters(&mut self) -> Vec<Deferred> {
		std::mem::take(&mut self.deferred)
	}

	fn focus(&self) -> Option<&Focus> {
		self.focus.as_ref()
	}

	fn set_focus(&mut self, focus: Option<Focus>) {
		self.focus = focus;
	}

	fn environment(&self) -> Option<&Environment> {
		self.environment.as_ref()
	}

	fn set_environment(&mut self, environment: Environment) -> Result<()> {
		self.environment = Some(environment);
		Ok(())
	}

	fn row_frame(&self, _id: ComponentId) -> Option<&RowFrame> {
		None
	}

	fn row_path(&self) -> RowPath {
		RowPath::new()
	}

	fn row_data(&self, _id: ComponentId) -> Option<&Value> {
		None
	}

	fn row_data_mut(&mut self, _id: ComponentId) -> Option<&mut Value> {
		None
	}
}
