//! Component models: the extrinsic state of a component.
//!
//! Every component owns one shared model. A session may overlay it with a
//! session model, created on the first write after the component is locked.
//! Scalar fields of a session model read through to the shared model until
//! they are written; container fields are copied when the overlay is created
//! so that session writes never alias shared containers.

mod field;
mod message;
mod view;

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_primitives::{ComponentId, IdName, ModelFlags};

pub use field::{FieldSet, ModelField};
pub use message::Message;
pub use view::ModelView;

use crate::repeater::RepeaterModel;


/// Per-scope state of one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentModel {
	/// Component whose shared model this overlays. Restored lazily after
	/// deserialization.
	#[serde(skip)]
	pub(crate) shared: Option<ComponentId>,
	/// Scalar fields written on this model.
	#[serde(default)]
	pub(crate) overrides: FieldSet,
	pub(crate) flags: ModelFlags,
	/// Flag bits written on this model.
	#[serde(default = "ModelFlags::empty")]
	pub(crate) flag_overrides: ModelFlags,
	#[serde(default)]
	pub(crate) children: Vec<ComponentId>,
	#[serde(default)]
	pub(crate) parent: Option<ComponentId>,
	#[serde(default)]
	pub(crate) tag: Option<String>,
	#[serde(default)]
	pub(crate) template: Option<String>,
	#[serde(default)]
	pub(crate) tooltip: Option<Message>,
	#[serde(default)]
	pub(crate) accessible_text: Option<Message>,
	#[serde(default)]
	pub(crate) html_class: Option<Message>,
	#[serde(default)]
	pub(crate) attributes: BTreeMap<String, Value>,
	#[serde(default)]
	pub(crate) label: Option<ComponentId>,
	#[serde(default)]
	pub(crate) id_name: Option<IdName>,
	#[serde(skip)]
	pub(crate) naming_registry: Option<FxHashMap<String, ComponentId>>,
	#[serde(default)]
	pub(crate) repeater: Option<Box<RepeaterModel>>,
}

impl Default for ComponentModel {
	fn default() -> Self {
		Self {
			shared: None,
			overrides: FieldSet::empty(),
			flags: ModelFlags::DEFAULT,
			flag_overrides: ModelFlags::empty(),
			children: Vec::new(),
			parent: None,
			tag: None,
			template: None,
			tooltip: None,
			accessible_text: None,
			html_class: None,
			attributes: BTreeMap::new(),
			label: None,
			id_name: None,
			naming_registry: None,
			repeater: None,
		}
	}
}

impl ComponentModel {
	/// Creates a model with default flags and no other state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a session overlay of `shared`, the shared model of `component`.
	///
	/// Containers are copied; scalar fields are copied too but stay unmarked,
	/// so reads keep following the shared model until written.
	pub fn overlay(component: ComponentId, shared: &ComponentModel) -> Self {
		Self {
			shared: Some(component),
			overrides: FieldSet::empty(),
			flag_overrides: ModelFlags::empty(),
			naming_registry: None,
			..shared.clone()
		}
	}

	/// Returns the component this model overlays, if linked.
	pub fn shared_link(&self) -> Option<ComponentId> {
		self.shared
	}

	/// Scalar fields written on this model.
	pub fn overrides(&self) -> FieldSet {
		self.overrides
	}

	/// Returns the flags stored on this model.
	pub fn flags(&self) -> ModelFlags {
		self.flags
	}

	/// Sets or clears one or more flags and marks them as written.
	pub fn set_flag(&mut self, flag: ModelFlags, on: bool) {
		self.flags.set(flag, on);
		self.flag_overrides |= flag;
		self.overrides |= FieldSet::FLAGS;
	}

	/// Returns the child list.
	pub fn children(&self) -> &[ComponentId] {
		&self.children
	}

	/// Returns the parent stored on this model.
	pub fn parent(&self) -> Option<ComponentId> {
		self.parent
	}

	pub(crate) fn set_parent(&mut self, parent: Option<ComponentId>) {
		self.parent = parent;
		self.overrides |= FieldSet::PARENT;
	}

	/// Sets the markup tag hint.
	pub fn set_tag(&mut self, tag: Option<String>) {
		self.tag = tag;
		self.overrides |= FieldSet::TAG;
	}

	/// Sets the layout template reference.
	pub fn set_template(&mut self, template: Option<String>) {
		self.template = template;
		self.overrides |= FieldSet::TEMPLATE;
	}

	/// Sets the tooltip.
	pub fn set_tooltip(&mut self, tooltip: Option<Message>) {
		self.tooltip = tooltip;
		self.overrides |= FieldSet::TOOLTIP;
	}

	/// Sets the accessible text.
	pub fn set_accessible_text(&mut self, text: Option<Message>) {
		self.accessible_text = text;
		self.overrides |= FieldSet::ACCESSIBLE_TEXT;
	}

	/// Sets the extra CSS class.
	pub fn set_html_class(&mut self, class: Option<Message>) {
		self.html_class = class;
		self.overrides |= FieldSet::HTML_CLASS;
	}

	/// Sets the associated label.
	pub fn set_label(&mut self, label: Option<ComponentId>) {
		self.label = label;
		self.overrides |= FieldSet::LABEL;
	}

	/// Returns the id-name stored on this model.
	pub fn id_name(&self) -> Option<&IdName> {
		self.id_name.as_ref()
	}

	pub(crate) fn set_id_name(&mut self, name: Option<IdName>) {
		self.id_name = name;
		self.overrides |= FieldSet::ID_NAME;
	}

	/// Returns an attribute.
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Sets an attribute, returning the previous value.
	pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
		self.attributes.insert(name.into(), value)
	}

	/// Removes an attribute, returning its value.
	pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
		self.attributes.remove(name)
	}

	/// Returns the repeater state, if this is a repeater model.
	pub fn repeater(&self) -> Option<&RepeaterModel> {
		self.repeater.as_deref()
	}

	/// Returns the repeater state mutably, if this is a repeater model.
	pub fn repeater_mut(&mut self) -> Option<&mut RepeaterModel> {
		self.repeater.as_deref_mut()
	}

	/// Installs repeater state on this model.
	pub fn set_repeater(&mut self, state: RepeaterModel) {
		self.repeater = Some(Box::new(state));
	}

	/// Flags as seen through this overlay of `shared`.
	pub fn effective_flags(&self, shared: &ComponentModel) -> ModelFlags {
		(shared.flags & !self.flag_overrides) | (self.flags & self.flag_overrides)
	}

	/// Compares the stored values of one field.
	pub fn field_eq(&self, other: &ComponentModel, field: ModelField) -> bool {
		match field {
			ModelField::AccessibleText => self.accessible_text == other.accessible_text,
			ModelField::Attributes => self.attributes == other.attributes,
			ModelField::Children => self.children == other.children,
			ModelField::Flags => self.flags == other.flags,
			ModelField::HtmlClass => self.html_class == other.html_class,
			ModelField::IdName => self.id_name == other.id_name,
			ModelField::Label => self.label == other.label,
			ModelField::NamingRegistry => self.naming_registry == other.naming_registry,
			ModelField::Parent => self.parent == other.parent,
			ModelField::Repeater => self.repeater == other.repeater,
			ModelField::Tag => self.tag == other.tag,
			ModelField::Template => self.template == other.template,
			ModelField::Tooltip => self.tooltip == other.tooltip,
		}
	}

	/// Returns true if, read as an overlay of `shared`, `field` has the
	/// shared value.
	pub fn matches_shared(&self, shared: &ComponentModel, field: ModelField) -> bool {
		if field == ModelField::Flags {
			return self.effective_flags(shared) == shared.flags;
		}
		if !field.is_collection() && !self.overrides.contains(field.as_set()) {
			return true;
		}
		self.field_eq(shared, field)
	}

	/// Returns true if every persistent field of this overlay reads the same
	/// as `shared`.
	pub fn is_default_of(&self, shared: &ComponentModel) -> bool {
		ModelField::ALL
			.iter()
			.filter(|f| !f.is_transient())
			.all(|&f| self.matches_shared(shared, f))
	}
}

impl PartialEq for ComponentModel {
	fn eq(&self, other: &Self) -> bool {
		self.overrides == other.overrides
			&& self.flag_overrides == other.flag_overrides
			&& ModelField::ALL
				.iter()
				.filter(|f| !f.is_transient())
				.all(|&f| self.field_eq(other, f))
	}
}
