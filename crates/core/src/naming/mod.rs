//! Internal and rendered ids.
//!
//! Both ids are derived from the tree shape alone and cached in the scratch
//! map of the scope that computed them. The internal id is positional from
//! a fixed root sentinel. The rendered id honours developer id-names, the
//! nearest active naming context and the row a component is repeated in.
//!
//! ```text
//! root                         "id"
//! └─ panel (naming context)    "panel"
//!    ├─ field                  "panel/field"
//!    └─ (unnamed)              "panel_1"
//!       └─ (unnamed)           "panel_1a"
//! ```

use trellis_primitives::{ComponentId, append_index};

use crate::error::{ComponentError, Result};
use crate::scope::Scope;

#[cfg(test)]
mod tests;

/// Internal id of a component without a parent.
pub const ROOT_INTERNAL_ID: &str = "0";

const INTERNAL_ID_KEY: &str = "internal_id";
const ID_KEY: &str = "id";

impl Scope<'_> {
	/// Positional id independent of id-names and rows.
	///
	/// The parent's internal id followed by this component's child index,
	/// case-shifted when the parent's id ends in a digit.
	pub fn internal_id(&mut self, id: ComponentId) -> String {
		if let Some(cached) = self.scratch(id, INTERNAL_ID_KEY) {
			return cached;
		}
		let value = match self.parent(id) {
			None => ROOT_INTERNAL_ID.to_owned(),
			Some(parent) => {
				let mut buf = self.internal_id(parent);
				append_index(&mut buf, self.index_under(parent, id));
				buf
			}
		};
		self.set_scratch(id, INTERNAL_ID_KEY, &value);
		value
	}

	/// Id rendered for this component in the current scope.
	pub fn id(&mut self, id: ComponentId) -> String {
		if let Some(cached) = self.scratch(id, ID_KEY) {
			return cached;
		}
		let value = self.compute_id(id);
		self.set_scratch(id, ID_KEY, &value);
		value
	}

	fn compute_id(&mut self, id: ComponentId) -> String {
		let ids = &self.config().ids;
		if let Some(name) = self.id_name(id) {
			return match self.naming_prefix(id) {
				Some(mut prefix) => {
					prefix.push(ids.context_separator);
					prefix.push_str(name.as_str());
					prefix
				}
				None => name.to_string(),
			};
		}
		if let Some(frame) = self.row_root_frame(id) {
			return frame.prefix;
		}
		let Some(parent) = self.parent(id) else {
			return ids.root_prefix.clone();
		};
		let index = self.index_under(parent, id);
		let mut buf = self.id(parent);
		if self.is_name_boundary(parent) {
			buf.push(ids.framework_separator);
			buf.push_str(&index.to_string());
		} else {
			append_index(&mut buf, index);
		}
		buf
	}

	/// Rendered id of the scope an id-name of `id` is resolved in, if any.
	///
	/// That is the nearest active naming context or entered row, counting a
	/// row's repeated root as the row itself.
	pub fn naming_prefix(&mut self, id: ComponentId) -> Option<String> {
		if let Some(frame) = self.row_root_frame(id) {
			return Some(frame.prefix);
		}
		let mut current = self.parent(id);
		while let Some(ancestor) = current {
			if self.is_active_naming_context(ancestor) {
				return Some(self.id(ancestor));
			}
			if let Some(frame) = self.row_root_frame(ancestor) {
				return Some(frame.prefix);
			}
			current = self.parent(ancestor);
		}
		None
	}

	/// Returns true if ids generated below `id` join it with the framework
	/// separator instead of extending it.
	fn is_name_boundary(&self, id: ComponentId) -> bool {
		self.id_name(id).is_some() || self.parent(id).is_none() || self.row_root_frame(id).is_some()
	}

	fn index_under(&self, parent: ComponentId, id: ComponentId) -> usize {
		self.model(parent, |m| m.children().iter().position(|&c| c == id))
			.unwrap_or_else(|| {
				tracing::warn!(component = %id, %parent, "component missing from its parent's children");
				0
			})
	}

	/// Component whose registry records the id-name of `id`: the nearest
	/// active naming context or row root above it, else `id` itself when it
	/// is an active naming context.
	fn registration_target(&self, id: ComponentId) -> Option<ComponentId> {
		let mut current = self.parent(id);
		while let Some(ancestor) = current {
			if self.is_active_naming_context(ancestor) || self.row_root_frame(ancestor).is_some() {
				return Some(ancestor);
			}
			current = self.parent(ancestor);
		}
		self.is_active_naming_context(id).then_some(id)
	}

	/// Records the id-name of `id` for duplicate detection.
	///
	/// Fails if another component already registered the same name in the
	/// same naming context during this paint. Does nothing when duplicate
	/// checks are disabled.
	pub fn register_id_name(&mut self, id: ComponentId) -> Result<()> {
		if !self.config().ids.check_duplicates {
			return Ok(());
		}
		let Some(name) = self.id_name(id) else {
			return Ok(());
		};
		let Some(target) = self.registration_target(id) else {
			return Ok(());
		};
		let existing = self.model(target, |m| {
			m.naming_registry()
				.and_then(|registry| registry.get(name.as_str()).copied())
		});
		match existing {
			Some(existing) if existing != id => Err(ComponentError::DuplicateIdName {
				name: name.to_string(),
				context: self.id(target),
				existing,
				duplicate: id,
			}),
			Some(_) => Ok(()),
			None => self.model_mut_internal(target, |m| {
				m.naming_registry
					.get_or_insert_with(Default::default)
					.insert(name.to_string(), id);
			}),
		}
	}

	/// Discards the id-names registered with `id`.
	pub fn clear_naming_registry(&mut self, id: ComponentId) -> Result<()> {
		if self.model(id, |m| m.naming_registry().is_none_or(|r| r.is_empty())) {
			return Ok(());
		}
		self.model_mut_internal(id, |m| m.naming_registry = None)
	}
}
