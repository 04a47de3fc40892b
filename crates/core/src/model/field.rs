//! Field descriptor table for [`ComponentModel`](super::ComponentModel).
//!
//! Equality, default-state detection and overlay creation iterate
//! [`ModelField::ALL`], which lists every field exactly once in name order.

bitflags::bitflags! {
	/// A set of model fields, used to track which scalar fields a session
	/// model has written.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
	pub struct FieldSet: u16 {
		const ACCESSIBLE_TEXT = 1 << 0;
		const ATTRIBUTES = 1 << 1;
		const CHILDREN = 1 << 2;
		const FLAGS = 1 << 3;
		const HTML_CLASS = 1 << 4;
		const ID_NAME = 1 << 5;
		const LABEL = 1 << 6;
		const NAMING_REGISTRY = 1 << 7;
		const PARENT = 1 << 8;
		const REPEATER = 1 << 9;
		const TAG = 1 << 10;
		const TEMPLATE = 1 << 11;
		const TOOLTIP = 1 << 12;
	}
}

/// One field of a component model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelField {
	/// Text for assistive technologies.
	AccessibleText,
	/// Generic string-keyed attributes.
	Attributes,
	/// Ordered child list.
	Children,
	/// Boolean state flags.
	Flags,
	/// Extra CSS class.
	HtmlClass,
	/// Developer-assigned id-name.
	IdName,
	/// Associated label component.
	Label,
	/// Id-names registered in a naming context during the current paint.
	NamingRegistry,
	/// Parent component.
	Parent,
	/// Row state of a repeater.
	Repeater,
	/// Markup tag hint.
	Tag,
	/// Layout template reference.
	Template,
	/// Tooltip text.
	Tooltip,
}

impl ModelField {
	/// Every field, ordered by name.
	pub const ALL: [ModelField; 13] = [
		Self::AccessibleText,
		Self::Attributes,
		Self::Children,
		Self::Flags,
		Self::HtmlClass,
		Self::IdName,
		Self::Label,
		Self::NamingRegistry,
		Self::Parent,
		Self::Repeater,
		Self::Tag,
		Self::Template,
		Self::Tooltip,
	];

	/// Returns the field name.
	pub const fn name(self) -> &'static str {
		match self {
			Self::AccessibleText => "accessible_text",
			Self::Attributes => "attributes",
			Self::Children => "children",
			Self::Flags => "flags",
			Self::HtmlClass => "html_class",
			Self::IdName => "id_name",
			Self::Label => "label",
			Self::NamingRegistry => "naming_registry",
			Self::Parent => "parent",
			Self::Repeater => "repeater",
			Self::Tag => "tag",
			Self::Template => "template",
			Self::Tooltip => "tooltip",
		}
	}

	/// Returns the bitflag for this field.
	pub const fn as_set(self) -> FieldSet {
		match self {
			Self::AccessibleText => FieldSet::ACCESSIBLE_TEXT,
			Self::Attributes => FieldSet::ATTRIBUTES,
			Self::Children => FieldSet::CHILDREN,
			Self::Flags => FieldSet::FLAGS,
			Self::HtmlClass => FieldSet::HTML_CLASS,
			Self::IdName => FieldSet::ID_NAME,
			Self::Label => FieldSet::LABEL,
			Self::NamingRegistry => FieldSet::NAMING_REGISTRY,
			Self::Parent => FieldSet::PARENT,
			Self::Repeater => FieldSet::REPEATER,
			Self::Tag => FieldSet::TAG,
			Self::Template => FieldSet::TEMPLATE,
			Self::Tooltip => FieldSet::TOOLTIP,
		}
	}

	/// Container fields are copied into a session model when it is created;
	/// the session copy is authoritative from then on.
	pub const fn is_collection(self) -> bool {
		matches!(
			self,
			Self::Attributes | Self::Children | Self::NamingRegistry | Self::Repeater
		)
	}

	/// Transient fields are rebuilt every pass and take no part in equality or
	/// serialization.
	pub const fn is_transient(self) -> bool {
		matches!(self, Self::NamingRegistry)
	}
}
