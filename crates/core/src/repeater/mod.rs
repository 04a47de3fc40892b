//! Repeated subtrees.
//!
//! A repeater has exactly one child, its repeated root, and renders that
//! subtree once per element of its bound data. The components of the subtree
//! exist once; each row gets a [`RowContext`] that holds the row's own models
//! and is entered on top of the session while the row is processed.
//!
//! Row contexts are keyed by [`RowKey`] and numbered by a per-repeater
//! sequence. A key keeps its sequence number, and therefore its rendered ids,
//! across repaints for as long as it stays in the data.

mod key;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_primitives::{ComponentId, IdName};

pub use key::RowKey;

use crate::context::{RowContext, RowFrame, RowScope};
use crate::error::{ComponentError, Result};
use crate::model::ComponentModel;
use crate::scope::Scope;
use crate::traversal::Pass;
use crate::tree::{Component, ComponentTree};


/// Row state of one repeater, per scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeaterModel {
	#[serde(default)]
	data: Vec<Value>,
	#[serde(default)]
	rows: FxHashMap<RowKey, RowContext>,
	#[serde(default)]
	next_seq: u64,
}

impl RepeaterModel {
	/// Bound data, in display order.
	pub fn data(&self) -> &[Value] {
		&self.data
	}

	/// Number of live row contexts.
	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	/// Returns the row context of `key`.
	pub fn row(&self, key: &RowKey) -> Option<&RowContext> {
		self.rows.get(key)
	}

	/// Sequence number the next new row context receives.
	pub fn next_seq(&self) -> u64 {
		self.next_seq
	}

	/// Returns the sequence number of `key`, creating its row context first
	/// if needed, and refreshes the row's data and render id.
	fn ensure_row(
		&mut self,
		repeater: ComponentId,
		key: &RowKey,
		render_id: Option<String>,
		data: Value,
	) -> u64 {
		let row = self.rows.entry(key.clone()).or_insert_with(|| {
			let seq = self.next_seq;
			self.next_seq += 1;
			tracing::trace!(%repeater, %key, seq, "created row context");
			RowContext::new(seq, None, Value::Null)
		});
		row.set_row_data(data);
		row.set_render_id(render_id);
		row.seq()
	}
}

/// Component behaviour that repeats its only child per data row.
#[derive(Debug, Clone, Default)]
pub struct Repeater {
	key_property: Option<String>,
	render_id_property: Option<String>,
	preserve_row_contexts: bool,
}

impl Repeater {
	/// Creates a repeater keyed by the row data itself.
	pub fn new() -> Self {
		Self::default()
	}

	/// Keys rows by the value at `path` in the row data.
	pub fn with_key_property(mut self, path: impl Into<String>) -> Self {
		self.key_property = Some(path.into());
		self
	}

	/// Names rows in rendered ids by the value at `path` instead of their
	/// sequence number.
	pub fn with_render_id_property(mut self, path: impl Into<String>) -> Self {
		self.render_id_property = Some(path.into());
		self
	}

	/// Keeps row contexts of rows missing from the data, for tables whose
	/// rows are edited across several pages.
	pub fn preserving_row_contexts(mut self) -> Self {
		self.preserve_row_contexts = true;
		self
	}

	/// Path of the key property, if keyed by property.
	pub fn key_property(&self) -> Option<&str> {
		self.key_property.as_deref()
	}

	/// Returns true if stale row contexts are kept.
	pub fn preserves_row_contexts(&self) -> bool {
		self.preserve_row_contexts
	}

	/// Derives the key of a data row.
	pub fn row_key(&self, tree: &ComponentTree, row: &Value) -> RowKey {
		RowKey::new(&self.key_value(tree, row))
	}

	fn key_value(&self, tree: &ComponentTree, row: &Value) -> Value {
		match &self.key_property {
			Some(path) => tree.properties().get(row, path).unwrap_or(Value::Null),
			None => row.clone(),
		}
	}

	fn render_id(
		&self,
		tree: &ComponentTree,
		repeater: ComponentId,
		row: &Value,
	) -> Result<Option<String>> {
		let Some(path) = &self.render_id_property else {
			return Ok(None);
		};
		let value = match tree.properties().get(row, path) {
			None | Some(Value::Null) => return Ok(None),
			Some(Value::String(s)) => s,
			Some(other) => other.to_string(),
		};
		match IdName::parse(value) {
			Ok(name) => Ok(Some(name.into())),
			Err(err) => Err(ComponentError::InvalidRowRenderId {
				repeater,
				value: err.0,
			}),
		}
	}
}

impl Component for Repeater {
	fn kind(&self) -> &'static str {
		"repeater"
	}

	fn init_model(&self, model: &mut ComponentModel) {
		model.set_repeater(RepeaterModel::default());
	}

	fn model_created(&self, model: &mut ComponentModel) {
		if let Some(state) = model.repeater_mut() {
			state.rows.clear();
			state.next_seq = 0;
		}
	}

	fn visit_children(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		pass: Pass,
		visit: &mut dyn FnMut(&mut Scope<'_>, ComponentId) -> Result<()>,
	) -> Result<()> {
		let keys = prepare_rows(scope, id)?;
		if !keys.is_empty() {
			let root = repeat_root(scope, id)?;
			for key in &keys {
				with_row(scope, id, key, |row| visit(row, root))?;
			}
		}
		if matches!(pass, Pass::Request | Pass::PreparePaint) && !self.preserve_row_contexts {
			purge_stale(scope, id, &keys)?;
		}
		Ok(())
	}

	fn as_repeater(&self) -> Option<&Repeater> {
		Some(self)
	}
}

fn behavior(tree: &ComponentTree, id: ComponentId) -> Result<Repeater> {
	tree.node(id)
		.behavior()
		.as_repeater()
		.cloned()
		.ok_or(ComponentError::NotARepeater(id))
}

fn repeat_root(scope: &Scope<'_>, repeater: ComponentId) -> Result<ComponentId> {
	scope
		.children(repeater)
		.first()
		.copied()
		.ok_or(ComponentError::EmptyRepeater(repeater))
}

/// Binds `data` to a repeater for the current scope.
pub fn set_data(scope: &mut Scope<'_>, repeater: ComponentId, data: Vec<Value>) -> Result<()> {
	behavior(scope.tree(), repeater)?;
	scope.model_mut(repeater, |m| {
		m.repeater
			.get_or_insert_with(Default::default)
			.data = data;
	});
	Ok(())
}

/// Data bound to a repeater, as the current scope sees it.
pub fn data(scope: &Scope<'_>, repeater: ComponentId) -> Vec<Value> {
	scope.model(repeater, |m| {
		m.repeater().map(|state| state.data.clone()).unwrap_or_default()
	})
}

/// Row data of a repeater in bound order, including edits made through bean
/// binding during request handling.
pub fn beans(scope: &Scope<'_>, repeater: ComponentId) -> Vec<Value> {
	data(scope, repeater)
}

/// Creates missing row contexts for the bound data and refreshes existing
/// ones. Returns the row keys in data order.
///
/// Fails if two rows resolve to the same row context, or a row render id is
/// not a valid id-name.
pub fn prepare_rows(scope: &mut Scope<'_>, repeater: ComponentId) -> Result<Vec<RowKey>> {
	let tree = scope.tree();
	let behavior = behavior(tree, repeater)?;
	let rows = data(scope, repeater);
	let mut keys = Vec::with_capacity(rows.len());
	let mut seen = FxHashSet::default();
	let mut composite = 0usize;
	for row in rows {
		let value = behavior.key_value(tree, &row);
		if value.is_object() || value.is_array() {
			composite += 1;
		}
		let key = RowKey::new(&value);
		let render_id = behavior.render_id(tree, repeater, &row)?;
		let seq = scope.model_mut_internal(repeater, |m| {
			m.repeater
				.get_or_insert_with(Default::default)
				.ensure_row(repeater, &key, render_id, row)
		})?;
		if !seen.insert(seq) {
			return Err(ComponentError::DuplicateRowContext { repeater, key, seq });
		}
		keys.push(key);
	}
	if composite > 0 {
		tracing::warn!(
			%repeater,
			rows = composite,
			"row keys are composite values; edits to them break row context reuse"
		);
	}
	Ok(keys)
}

/// Drops row contexts whose key is not in `keys`. Returns how many were
/// dropped.
pub fn purge_stale(scope: &mut Scope<'_>, repeater: ComponentId, keys: &[RowKey]) -> Result<usize> {
	let live: FxHashSet<&RowKey> = keys.iter().collect();
	let stale = scope.model(repeater, |m| {
		m.repeater()
			.is_some_and(|state| state.rows.keys().any(|k| !live.contains(k)))
	});
	if !stale {
		return Ok(0);
	}
	let removed = scope.model_mut_internal(repeater, |m| {
		let Some(state) = m.repeater_mut() else {
			return 0;
		};
		let before = state.rows.len();
		state.rows.retain(|k, _| live.contains(k));
		before - state.rows.len()
	})?;
	tracing::debug!(%repeater, removed, "purged stale row contexts");
	Ok(removed)
}

/// Copies row data edited during request handling back into the bound data,
/// so [`beans`] reflects submitted values.
pub(crate) fn sync_data(scope: &mut Scope<'_>, repeater: ComponentId) -> Result<()> {
	let tree = scope.tree();
	let behavior = behavior(tree, repeater)?;
	let changed: Vec<(usize, Value)> = scope.model(repeater, |m| {
		let Some(state) = m.repeater() else {
			return Vec::new();
		};
		state
			.data
			.iter()
			.enumerate()
			.filter_map(|(i, value)| {
				let row = state.rows.get(&behavior.row_key(tree, value))?;
				(value != row.row_data()).then(|| (i, row.row_data().clone()))
			})
			.collect()
	});
	if changed.is_empty() {
		return Ok(());
	}
	tracing::trace!(%repeater, rows = changed.len(), "synced edited row data");
	scope.model_mut_internal(repeater, |m| {
		if let Some(state) = m.repeater_mut() {
			for (i, value) in changed {
				if let Some(slot) = state.data.get_mut(i) {
					*slot = value;
				}
			}
		}
	})
}

/// Returns true if the repeater holds a row context for `key` in this scope.
pub fn has_row(scope: &Scope<'_>, repeater: ComponentId, key: &RowKey) -> bool {
	scope.model(repeater, |m| {
		m.repeater().is_some_and(|state| state.rows.contains_key(key))
	})
}

/// Sequence number of the row context for `key`.
pub fn row_seq(scope: &Scope<'_>, repeater: ComponentId, key: &RowKey) -> Option<u64> {
	scope.model(repeater, |m| m.repeater()?.rows.get(key).map(RowContext::seq))
}

/// Runs `f` with the row context of `key` entered on top of the current
/// context.
///
/// The row context is moved out of the repeater model while `f` runs and put
/// back afterwards, whatever `f` returns.
pub fn with_row<R>(
	scope: &mut Scope<'_>,
	repeater: ComponentId,
	key: &RowKey,
	f: impl FnOnce(&mut Scope<'_>) -> Result<R>,
) -> Result<R> {
	if !scope.has_context() {
		return Err(ComponentError::NoActiveContext {
			component: repeater,
		});
	}
	let root = repeat_root(scope, repeater)?;
	let base = scope.id(repeater);
	let separator = scope.config().ids.context_separator;
	let mut row = scope
		.model_mut_internal(repeater, |m| m.repeater_mut().and_then(|s| s.rows.remove(key)))?
		.ok_or_else(|| ComponentError::UnknownRowContext {
			repeater,
			key: key.clone(),
		})?;
	row.clear_scratch();
	let frame = RowFrame {
		repeater,
		repeat_root: root,
		key: key.clone(),
		prefix: format!("{base}{separator}{}", row.suffix()),
	};

	let tree = scope.tree();
	let result = match scope.context_mut() {
		Some(parent) => {
			let mut row_scope = RowScope::new(tree, parent, &mut row, frame);
			let mut inner = Scope::new(tree, &mut row_scope);
			f(&mut inner)
		}
		None => Err(ComponentError::NoActiveContext {
			component: repeater,
		}),
	};

	scope.model_mut_internal(repeater, |m| {
		m.repeater
			.get_or_insert_with(Default::default)
			.rows
			.insert(key.clone(), row);
	})?;
	result
}
