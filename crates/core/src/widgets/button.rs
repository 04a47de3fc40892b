use std::fmt;
use std::sync::Arc;

use trellis_primitives::{CapabilitySet, ComponentId, ModelFlags};

use super::{TEXT_ATTRIBUTE, escape};
use crate::error::Result;
use crate::render::RenderContext;
use crate::request::Request;
use crate::scope::Scope;
use crate::traversal::Outcome;
use crate::tree::Component;

type Action = dyn Fn(&mut Scope<'_>, ComponentId) -> Result<Outcome> + Send + Sync;

/// Submit button.
///
/// Pressing it queues its action, which runs after the request pass in the
/// scope the button was pressed in. Presses are only honoured on mutating
/// requests.
#[derive(Clone)]
pub struct Button {
	action: Arc<Action>,
}

impl Button {
	/// Creates a button running `action` when pressed.
	pub fn new(
		action: impl Fn(&mut Scope<'_>, ComponentId) -> Result<Outcome> + Send + Sync + 'static,
	) -> Self {
		Self {
			action: Arc::new(action),
		}
	}
}

impl fmt::Debug for Button {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Button").finish_non_exhaustive()
	}
}

impl Component for Button {
	fn kind(&self) -> &'static str {
		"button"
	}

	fn capabilities(&self) -> CapabilitySet {
		CapabilitySet::DISABLEABLE
	}

	fn handle_request(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		request: &dyn Request,
	) -> Result<Outcome> {
		let name = scope.id(id);
		if request.parameter(&name).is_none() {
			return Ok(Outcome::Continue);
		}
		if !request.is_mutating() {
			tracing::warn!(component = %id, method = request.method(), "ignoring button press on non-mutating request");
			return Ok(Outcome::Continue);
		}
		if scope.flag(id, ModelFlags::DISABLED) {
			tracing::warn!(component = %id, "ignoring press of disabled button");
			return Ok(Outcome::Continue);
		}
		let action = Arc::clone(&self.action);
		scope.invoke_later(id, move |scope| action(scope, id))?;
		Ok(Outcome::Continue)
	}

	fn paint_body(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		let name = scope.id(id);
		let label = scope
			.attribute(id, TEXT_ATTRIBUTE)
			.and_then(|v| v.as_str().map(str::to_owned))
			.unwrap_or_default();
		out.write(&format!(
			"<button type=\"submit\" id=\"{name}\" name=\"{name}\"{}>{}</button>",
			if scope.flag(id, ModelFlags::DISABLED) { " disabled" } else { "" },
			escape(&label)
		));
		Ok(())
	}
}
