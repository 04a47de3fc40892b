use trellis_primitives::{CapabilitySet, ComponentId};

use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::model::ComponentModel;
use crate::render::RenderContext;
use crate::repeater::Repeater;
use crate::request::Request;
use crate::scope::Scope;
use crate::traversal::{self, Outcome, Pass};

/// Behaviour of one component in the tree.
///
/// A component's state lives in its models, not in the implementing type; the
/// same behaviour object serves every session. Every hook receives the scope
/// it runs in and the component's own id.
pub trait Component: Send + Sync + 'static {
	/// Kind name, used to look up renderers.
	fn kind(&self) -> &'static str;

	/// Capabilities queried during traversal.
	fn capabilities(&self) -> CapabilitySet {
		CapabilitySet::empty()
	}

	/// Initialises the shared model when the component is created.
	fn init_model(&self, _model: &mut ComponentModel) {}

	/// Runs once on every newly created session model.
	fn model_created(&self, _model: &mut ComponentModel) {}

	/// Processes submitted request data.
	fn handle_request(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_request: &dyn Request,
	) -> Result<Outcome> {
		Ok(Outcome::Continue)
	}

	/// Prepares for painting; runs pre-order before the paint pass.
	fn prepare_paint(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_request: &dyn Request,
	) -> Result<()> {
		Ok(())
	}

	/// Runs before the body is painted.
	fn before_paint(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_out: &mut dyn RenderContext,
	) -> Result<()> {
		Ok(())
	}

	/// Paints the body: the registered renderer, or every child in order.
	fn paint_body(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		traversal::paint_body(scope, id, out)
	}

	/// Runs after the body is painted.
	fn after_paint(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_out: &mut dyn RenderContext,
	) -> Result<()> {
		Ok(())
	}

	/// Validates this component only; children are visited by the traversal.
	fn validate_component(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_diagnostics: &mut Vec<Diagnostic>,
	) {
	}

	/// Visits the children a traversal pass descends into, each in the scope
	/// it must run in.
	fn visit_children(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		_pass: Pass,
		visit: &mut dyn FnMut(&mut Scope<'_>, ComponentId) -> Result<()>,
	) -> Result<()> {
		for child in scope.children(id) {
			visit(scope, child)?;
		}
		Ok(())
	}

	/// Returns the repeater behaviour, if this component repeats its subtree.
	fn as_repeater(&self) -> Option<&Repeater> {
		None
	}
}
