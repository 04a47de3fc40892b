use serde_json::Value;
use trellis_primitives::{CapabilitySet, ComponentId, ModelFlags};

use super::{TEXT_ATTRIBUTE, escape};
use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::model::Message;
use crate::render::RenderContext;
use crate::request::Request;
use crate::scope::Scope;
use crate::traversal::Outcome;
use crate::tree::Component;

/// Single-line text input.
///
/// Reads its submitted value from the request parameter named by its
/// rendered id. Inside a repeater row it can be bound to a property of the
/// row data: the property is loaded before painting and written back when a
/// new value is submitted.
#[derive(Debug, Clone, Default)]
pub struct TextField {
	property: Option<String>,
}

impl TextField {
	/// Creates an unbound field.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds the field to the row-data property at `path`.
	pub fn bound_to(path: impl Into<String>) -> Self {
		Self {
			property: Some(path.into()),
		}
	}

	/// Returns the current value.
	pub fn value(scope: &Scope<'_>, id: ComponentId) -> String {
		match scope.attribute(id, TEXT_ATTRIBUTE) {
			Some(Value::String(s)) => s,
			Some(Value::Null) | None => String::new(),
			Some(other) => other.to_string(),
		}
	}

	/// Sets the current value.
	pub fn set_value(scope: &mut Scope<'_>, id: ComponentId, value: impl Into<String>) {
		let value = value.into();
		if Self::value(scope, id) != value {
			scope.set_attribute(id, TEXT_ATTRIBUTE, Value::String(value));
		}
	}
}

impl Component for TextField {
	fn kind(&self) -> &'static str {
		"text_field"
	}

	fn capabilities(&self) -> CapabilitySet {
		CapabilitySet::INPUT | CapabilitySet::DISABLEABLE
	}

	fn handle_request(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		request: &dyn Request,
	) -> Result<Outcome> {
		if scope.flag(id, ModelFlags::DISABLED) || scope.flag(id, ModelFlags::READ_ONLY) {
			return Ok(Outcome::Continue);
		}
		let name = scope.id(id);
		let Some(submitted) = request.parameter(&name) else {
			return Ok(Outcome::Continue);
		};
		let submitted = submitted.to_owned();
		if let Some(path) = &self.property {
			let properties = scope.tree().properties();
			let value = Value::String(submitted.clone());
			if scope.row_data_mut(id, |row| properties.set(row, path, value)).is_none() {
				tracing::warn!(component = %id, path = %path, "bound field outside a row; value not stored in row data");
			}
		}
		Self::set_value(scope, id, submitted);
		Ok(Outcome::Continue)
	}

	fn prepare_paint(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		_request: &dyn Request,
	) -> Result<()> {
		let Some(path) = &self.property else {
			return Ok(());
		};
		let Some(row) = scope.row_data(id) else {
			return Ok(());
		};
		let value = match scope.tree().properties().get(&row, path) {
			Some(Value::String(s)) => s,
			Some(Value::Null) | None => String::new(),
			Some(other) => other.to_string(),
		};
		Self::set_value(scope, id, value);
		Ok(())
	}

	fn paint_body(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		let name = scope.id(id);
		let value = Self::value(scope, id);
		out.write(&format!(
			"<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"",
			escape(&value)
		));
		if scope.flag(id, ModelFlags::DISABLED) {
			out.write(" disabled");
		}
		if scope.flag(id, ModelFlags::READ_ONLY) {
			out.write(" readonly");
		}
		out.write("/>");
		Ok(())
	}

	fn validate_component(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		diagnostics: &mut Vec<Diagnostic>,
	) {
		if scope.flag(id, ModelFlags::MANDATORY) && Self::value(scope, id).trim().is_empty() {
			let rendered_id = scope.id(id);
			let message = Message::with_args("{0} is required", [rendered_id.clone()]);
			diagnostics.push(Diagnostic::error(id, rendered_id, message));
		}
	}
}
