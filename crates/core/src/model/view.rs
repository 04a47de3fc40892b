use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde_json::Value;
use trellis_primitives::{ComponentId, IdName, ModelFlags};

use super::{ComponentModel, Message, ModelField};
use crate::repeater::RepeaterModel;

/// Read access to a component's state as one session sees it.
///
/// Written scalar fields and all container fields come from the session
/// model; everything else comes from the shared model.
#[derive(Debug, Clone, Copy)]
pub struct ModelView<'a> {
	shared: &'a ComponentModel,
	session: Option<&'a ComponentModel>,
}

impl<'a> ModelView<'a> {
	/// Creates a view over a shared model and an optional session overlay.
	pub fn new(shared: &'a ComponentModel, session: Option<&'a ComponentModel>) -> Self {
		Self { shared, session }
	}

	/// Returns true if a session model backs this view.
	pub fn has_session_model(&self) -> bool {
		self.session.is_some()
	}

	fn scalar(&self, field: ModelField) -> &'a ComponentModel {
		match self.session {
			Some(session) if session.overrides.contains(field.as_set()) => session,
			_ => self.shared,
		}
	}

	fn container(&self) -> &'a ComponentModel {
		self.session.unwrap_or(self.shared)
	}

	/// Effective flags.
	pub fn flags(&self) -> ModelFlags {
		match self.session {
			Some(session) => session.effective_flags(self.shared),
			None => self.shared.flags,
		}
	}

	/// Returns true if every bit of `flag` is set.
	pub fn flag(&self, flag: ModelFlags) -> bool {
		self.flags().contains(flag)
	}

	/// Child list.
	pub fn children(&self) -> &'a [ComponentId] {
		&self.container().children
	}

	/// Parent component.
	pub fn parent(&self) -> Option<ComponentId> {
		self.scalar(ModelField::Parent).parent
	}

	/// Markup tag hint.
	pub fn tag(&self) -> Option<&'a str> {
		self.scalar(ModelField::Tag).tag.as_deref()
	}

	/// Layout template reference.
	pub fn template(&self) -> Option<&'a str> {
		self.scalar(ModelField::Template).template.as_deref()
	}

	/// Tooltip.
	pub fn tooltip(&self) -> Option<&'a Message> {
		self.scalar(ModelField::Tooltip).tooltip.as_ref()
	}

	/// Accessible text.
	pub fn accessible_text(&self) -> Option<&'a Message> {
		self.scalar(ModelField::AccessibleText)
			.accessible_text
			.as_ref()
	}

	/// Extra CSS class.
	pub fn html_class(&self) -> Option<&'a Message> {
		self.scalar(ModelField::HtmlClass).html_class.as_ref()
	}

	/// Associated label.
	pub fn label(&self) -> Option<ComponentId> {
		self.scalar(ModelField::Label).label
	}

	/// Developer-assigned id-name.
	pub fn id_name(&self) -> Option<&'a IdName> {
		self.scalar(ModelField::IdName).id_name.as_ref()
	}

	/// One attribute.
	pub fn attribute(&self, name: &str) -> Option<&'a Value> {
		self.container().attributes.get(name)
	}

	/// All attributes.
	pub fn attributes(&self) -> &'a BTreeMap<String, Value> {
		&self.container().attributes
	}

	/// Id-names registered during the current paint.
	pub fn naming_registry(&self) -> Option<&'a FxHashMap<String, ComponentId>> {
		self.container().naming_registry.as_ref()
	}

	/// Repeater row state.
	pub fn repeater(&self) -> Option<&'a RepeaterModel> {
		self.container().repeater.as_deref()
	}
}
