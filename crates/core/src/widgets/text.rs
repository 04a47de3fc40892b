use serde_json::Value;
use trellis_primitives::{ComponentId, ModelFlags};

use super::{TEXT_ATTRIBUTE, escape};
use crate::error::Result;
use crate::render::RenderContext;
use crate::scope::Scope;
use crate::tree::Component;

/// Static text, escaped unless [`ModelFlags::ENCODE_TEXT`] is cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Text {
	/// Returns the text.
	pub fn text(scope: &Scope<'_>, id: ComponentId) -> String {
		match scope.attribute(id, TEXT_ATTRIBUTE) {
			Some(Value::String(s)) => s,
			Some(other) => other.to_string(),
			None => String::new(),
		}
	}

	/// Sets the text.
	pub fn set_text(scope: &mut Scope<'_>, id: ComponentId, text: impl Into<String>) {
		scope.set_attribute(id, TEXT_ATTRIBUTE, Value::String(text.into()));
	}
}

impl Component for Text {
	fn kind(&self) -> &'static str {
		"text"
	}

	fn paint_body(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		let text = Self::text(scope, id);
		if scope.flag(id, ModelFlags::ENCODE_TEXT) {
			out.write(&escape(&text));
		} else {
			out.write(&text);
		}
		Ok(())
	}
}
