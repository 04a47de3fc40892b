use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_primitives::ComponentId;

use super::{Deferred, Environment, Focus, RowPath, RowRef, ScratchMap, UiContext};
use crate::error::{ComponentError, Result};
use crate::model::ComponentModel;
use crate::repeater::{self, RowKey};
use crate::scope::Scope;
use crate::traversal::Outcome;
use crate::tree::ComponentTree;

/// Stored state of one repeated row.
///
/// Identified within its repeater by a row key and a sequence number that is
/// assigned once per key and kept across repaints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowContext {
	seq: u64,
	render_id: Option<String>,
	row_data: Value,
	models: FxHashMap<ComponentId, ComponentModel>,
	#[serde(skip)]
	scratch: FxHashMap<ComponentId, ScratchMap>,
}

impl RowContext {
	/// Creates an empty row context.
	pub fn new(seq: u64, render_id: Option<String>, row_data: Value) -> Self {
		Self {
			seq,
			render_id,
			row_data,
			models: FxHashMap::default(),
			scratch: FxHashMap::default(),
		}
	}

	/// Sequence number of this row context.
	pub fn seq(&self) -> u64 {
		self.seq
	}

	/// Developer-supplied render id, if any.
	pub fn render_id(&self) -> Option<&str> {
		self.render_id.as_deref()
	}

	/// Row data bound to this context.
	pub fn row_data(&self) -> &Value {
		&self.row_data
	}

	pub(crate) fn set_row_data(&mut self, data: Value) {
		self.row_data = data;
	}

	pub(crate) fn set_render_id(&mut self, render_id: Option<String>) {
		if self.render_id != render_id {
			self.render_id = render_id;
			self.scratch.clear();
		}
	}

	/// Suffix naming this row in rendered ids.
	pub fn suffix(&self) -> String {
		match &self.render_id {
			Some(id) => id.clone(),
			None => self.seq.to_string(),
		}
	}

	/// Number of row-local models.
	pub fn model_count(&self) -> usize {
		self.models.len()
	}

	pub(crate) fn clear_scratch(&mut self) {
		self.scratch.clear();
	}
}

impl PartialEq for RowContext {
	fn eq(&self, other: &Self) -> bool {
		self.seq == other.seq
			&& self.render_id == other.render_id
			&& self.row_data == other.row_data
			&& self.models == other.models
	}
}

/// Naming information of an entered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFrame {
	/// The repeater owning the row.
	pub repeater: ComponentId,
	/// Root of the repeated subtree.
	pub repeat_root: ComponentId,
	/// Row key.
	pub key: RowKey,
	/// Rendered id of the row's naming scope.
	pub prefix: String,
}

/// A row context entered on top of its parent context.
///
/// Requests about components of the repeated subtree are served from the
/// row's own storage; all others go to the parent. Components below a nested
/// repeater's repeated root belong to that repeater's rows, not this one.
pub struct RowScope<'a> {
	tree: &'a ComponentTree,
	parent: &'a mut dyn UiContext,
	row: &'a mut RowContext,
	frame: RowFrame,
}

impl<'a> RowScope<'a> {
	/// Enters `row` on top of `parent`.
	pub fn new(
		tree: &'a ComponentTree,
		parent: &'a mut dyn UiContext,
		row: &'a mut RowContext,
		frame: RowFrame,
	) -> Self {
		Self {
			tree,
			parent,
			row,
			frame,
		}
	}

	/// Naming information of this row.
	pub fn frame(&self) -> &RowFrame {
		&self.frame
	}

	/// Returns true if `id` is part of this row's repeated subtree.
	pub fn owns(&self, id: ComponentId) -> bool {
		let mut current = id;
		loop {
			if current == self.frame.repeat_root {
				return true;
			}
			let Some(parent) = self.tree.shared_parent(current) else {
				return false;
			};
			if self.tree.is_repeater(parent) {
				return false;
			}
			current = parent;
		}
	}
}

impl UiContext for RowScope<'_> {
	fn model(&self, id: ComponentId) -> Option<&ComponentModel> {
		if self.owns(id) {
			self.row.models.get(&id)
		} else {
			self.parent.model(id)
		}
	}

	fn model_mut(&mut self, id: ComponentId) -> Option<&mut ComponentModel> {
		if self.owns(id) {
			self.row.models.get_mut(&id)
		} else {
			self.parent.model_mut(id)
		}
	}

	fn model_or_insert_with(
		&mut self,
		id: ComponentId,
		make: &mut dyn FnMut() -> ComponentModel,
	) -> &mut ComponentModel {
		if self.owns(id) {
			self.row.models.entry(id).or_insert_with(make)
		} else {
			self.parent.model_or_insert_with(id, make)
		}
	}

	fn set_model(&mut self, id: ComponentId, model: ComponentModel) {
		if self.owns(id) {
			self.row.models.insert(id, model);
		} else {
			self.parent.set_model(id, model);
		}
	}

	fn remove_model(&mut self, id: ComponentId) -> Option<ComponentModel> {
		if self.owns(id) {
			self.row.models.remove(&id)
		} else {
			self.parent.remove_model(id)
		}
	}

	fn model_ids(&self) -> Vec<ComponentId> {
		let mut ids: Vec<_> = self.row.models.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	fn scratch(&self, id: ComponentId) -> Option<&ScratchMap> {
		if self.owns(id) {
			self.row.scratch.get(&id)
		} else {
			self.parent.scratch(id)
		}
	}

	fn scratch_mut(&mut self, id: ComponentId) -> &mut ScratchMap {
		if self.owns(id) {
			self.row.scratch.entry(id).or_default()
		} else {
			self.parent.scratch_mut(id)
		}
	}

	fn clear_scratch(&mut self) {
		// Scratch lifecycle belongs to the session.
		tracing::trace!(repeater = %self.frame.repeater, key = %self.frame.key, "ignoring scratch clear on row context");
	}

	fn clear_scratch_for(&mut self, id: ComponentId) {
		if self.owns(id) {
			self.row.scratch.remove(&id);
		} else {
			self.parent.clear_scratch_for(id);
		}
	}

	fn invoke_later(&mut self, action: Deferred) {
		let repeater = self.frame.repeater;
		let key = self.frame.key.clone();
		self.parent.invoke_later(Box::new(move |scope: &mut Scope<'_>| {
			if !repeater::has_row(scope, repeater, &key) {
				tracing::warn!(%repeater, %key, "dropping deferred action for purged row");
				return Ok(Outcome::Continue);
			}
			repeater::with_row(scope, repeater, &key, |row_scope| action(row_scope))
		}));
	}

	fn take_invoke_laters(&mut self) -> Vec<Deferred> {
		self.parent.take_invoke_laters()
	}

	fn focus(&self) -> Option<&Focus> {
		self.parent.focus()
	}

	fn set_focus(&mut self, focus: Option<Focus>) {
		self.parent.set_focus(focus);
	}

	fn environment(&self) -> Option<&Environment> {
		self.parent.environment()
	}

	fn set_environment(&mut self, _environment: Environment) -> Result<()> {
		Err(ComponentError::RowContextEnvironment)
	}

	fn row_frame(&self, id: ComponentId) -> Option<&RowFrame> {
		if self.owns(id) {
			Some(&self.frame)
		} else {
			self.parent.row_frame(id)
		}
	}

	fn row_path(&self) -> RowPath {
		let mut path = self.parent.row_path();
		path.push(RowRef {
			repeater: self.frame.repeater,
			key: self.frame.key.clone(),
		});
		path
	}

	fn row_data(&self, id: ComponentId) -> Option<&Value> {
		if self.owns(id) {
			Some(&self.row.row_data)
		} else {
			self.parent.row_data(id)
		}
	}

	fn row_data_mut(&mut self, id: ComponentId) -> Option<&mut Value> {
		if self.owns(id) {
			Some(&mut self.row.row_data)
		} else {
			self.parent.row_data_mut(id)
		}
	}
}
