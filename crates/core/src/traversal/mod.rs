//! Request, prepare-paint, paint and validate passes.
//!
//! Every pass visits only visible components and descends through
//! [`Component::visit_children`], so repeaters can enter a row context around
//! each repetition of their subtree.

use trellis_primitives::{Capability, ComponentId, ModelFlags};

use crate::context::{RowPath, RowRef};
use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::render::RenderContext;
use crate::repeater;
use crate::request::Request;
use crate::scope::Scope;

#[cfg(test)]
mod tests;

/// The pass a traversal is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
	/// Collating components for request handling.
	Request,
	/// Preparing components for painting.
	PreparePaint,
	/// Painting.
	Paint,
	/// Validating.
	Validate,
}

/// Content served instead of the painted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
	/// MIME type of `bytes`.
	pub mime_type: String,
	/// Response body.
	pub bytes: Vec<u8>,
}

/// Result of request handling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
	/// Carry on with the remaining components and the paint.
	#[default]
	Continue,
	/// Stop and redirect to a URL.
	Forward(String),
	/// Stop and serve this content.
	ServeContent(Content),
}

impl Outcome {
	/// Returns true for [`Outcome::Continue`].
	pub fn is_continue(&self) -> bool {
		matches!(self, Self::Continue)
	}
}

/// A component collated for request handling, with the rows to enter to
/// reach it, relative to the scope the traversal started in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
	/// The component.
	pub id: ComponentId,
	/// Rows entered to reach it, outermost first.
	pub rows: RowPath,
}

/// Collects the visible components under `root`, each after its children.
pub fn collate(scope: &mut Scope<'_>, root: ComponentId) -> Result<Vec<Visit>> {
	let base = scope.context().map_or(0, |ctx| ctx.row_path().len());
	let mut visits = Vec::new();
	collect(scope, root, base, &mut visits)?;
	Ok(visits)
}

fn collect(scope: &mut Scope<'_>, id: ComponentId, base: usize, out: &mut Vec<Visit>) -> Result<()> {
	if !scope.is_visible(id) {
		return Ok(());
	}
	let node = scope.tree().node(id);
	node.behavior()
		.visit_children(scope, id, Pass::Request, &mut |s, child| collect(s, child, base, &mut *out))?;
	let mut rows = scope.context().map(|ctx| ctx.row_path()).unwrap_or_default();
	rows.drain(..base.min(rows.len()));
	out.push(Visit { id, rows });
	Ok(())
}

/// Hands `request` to every visible component under `root`.
///
/// Components are collated first, children before their container, and then
/// handled in that order; visibility changes made while handling do not
/// change who is handled. Row data edited by bound inputs is then copied back
/// into each repeater's data. When `root` is the top of the tree, scratch maps are
/// cleared beforehand and deferred actions are run afterwards. The first
/// outcome other than [`Outcome::Continue`] stops the traversal and discards
/// any deferred actions.
pub fn service_request(
	scope: &mut Scope<'_>,
	root: ComponentId,
	request: &dyn Request,
) -> Result<Outcome> {
	let top = scope.parent(root).is_none();
	if top && let Some(ctx) = scope.context_mut() {
		ctx.clear_scratch();
	}

	let visits = collate(scope, root)?;
	tracing::debug!(root = %root, components = visits.len(), "servicing request");
	for visit in &visits {
		let handled = enter_rows(scope, &visit.rows, &mut |s| {
			let node = s.tree().node(visit.id);
			node.behavior().handle_request(s, visit.id, request)
		})?;
		match handled {
			Some(Outcome::Continue) => {}
			Some(outcome) => {
				discard_invoke_laters(scope);
				return Ok(outcome);
			}
			None => tracing::warn!(component = %visit.id, "row vanished before its request was handled"),
		}
	}
	let tree = scope.tree();
	for visit in visits.iter().filter(|v| tree.is_repeater(v.id)) {
		enter_rows(scope, &visit.rows, &mut |s| repeater::sync_data(s, visit.id))?;
	}

	if !top {
		return Ok(Outcome::Continue);
	}
	let outcome = run_invoke_laters(scope)?;
	if outcome.is_continue() && scope.config().session.compact_default_models {
		scope.compact();
	}
	Ok(outcome)
}

/// Runs queued deferred actions in enqueue order, including actions they
/// queue themselves.
pub fn run_invoke_laters(scope: &mut Scope<'_>) -> Result<Outcome> {
	loop {
		let actions = match scope.context_mut() {
			Some(ctx) => ctx.take_invoke_laters(),
			None => return Ok(Outcome::Continue),
		};
		if actions.is_empty() {
			return Ok(Outcome::Continue);
		}
		tracing::trace!(count = actions.len(), "running deferred actions");
		for action in actions {
			let outcome = action(scope)?;
			if !outcome.is_continue() {
				discard_invoke_laters(scope);
				return Ok(outcome);
			}
		}
	}
}

fn discard_invoke_laters(scope: &mut Scope<'_>) {
	if let Some(ctx) = scope.context_mut() {
		let dropped = ctx.take_invoke_laters().len();
		if dropped > 0 {
			tracing::debug!(dropped, "discarded deferred actions");
		}
	}
}

/// Enters `rows` one after another and runs `f` in the innermost one.
/// Returns `None` if one of the rows no longer exists.
fn enter_rows<R>(
	scope: &mut Scope<'_>,
	rows: &[RowRef],
	f: &mut dyn FnMut(&mut Scope<'_>) -> Result<R>,
) -> Result<Option<R>> {
	let Some((first, rest)) = rows.split_first() else {
		return f(scope).map(Some);
	};
	if !repeater::has_row(scope, first.repeater, &first.key) {
		return Ok(None);
	}
	repeater::with_row(scope, first.repeater, &first.key, |inner| {
		enter_rows(inner, rest, f)
	})
}

/// Prepares the visible components under `id` for painting, parents first.
pub fn prepare_paint(scope: &mut Scope<'_>, id: ComponentId, request: &dyn Request) -> Result<()> {
	if !scope.is_visible(id) {
		return Ok(());
	}
	let node = scope.tree().node(id);
	let behavior = node.behavior();
	behavior.prepare_paint(scope, id, request)?;
	behavior.visit_children(scope, id, Pass::PreparePaint, &mut |s, child| {
		prepare_paint(s, child, request)
	})
}

/// Paints `id` and its visible subtree.
///
/// Naming contexts and row roots start with an empty id-name registry; every
/// painted component with an id-name registers in its naming context before
/// its hooks run.
pub fn paint(scope: &mut Scope<'_>, id: ComponentId, out: &mut dyn RenderContext) -> Result<()> {
	if !scope.is_visible(id) {
		return Ok(());
	}
	if scope.is_active_naming_context(id) || scope.row_root_frame(id).is_some() {
		scope.clear_naming_registry(id)?;
	}
	scope.register_id_name(id)?;

	let node = scope.tree().node(id);
	let behavior = node.behavior();
	behavior.before_paint(scope, id, out)?;
	behavior.paint_body(scope, id, out)?;
	behavior.after_paint(scope, id, out)
}

/// Default body: the renderer registered for the component's kind, or the
/// children in order.
pub fn paint_body(scope: &mut Scope<'_>, id: ComponentId, out: &mut dyn RenderContext) -> Result<()> {
	let tree = scope.tree();
	match tree.renderer(tree.kind(id)) {
		Some(renderer) => renderer.render(scope, id, out),
		None => paint_children(scope, id, out),
	}
}

/// Paints the children of `id` in order.
pub fn paint_children(
	scope: &mut Scope<'_>,
	id: ComponentId,
	out: &mut dyn RenderContext,
) -> Result<()> {
	let node = scope.tree().node(id);
	node.behavior()
		.visit_children(scope, id, Pass::Paint, &mut |s, child| paint(s, child, &mut *out))
}

/// Validates `id` and its subtree, collecting diagnostics.
///
/// Skips invisible components, components with validation switched off,
/// disabled disableables and read-only inputs, together with their subtrees.
pub fn validate(
	scope: &mut Scope<'_>,
	id: ComponentId,
	diagnostics: &mut Vec<Diagnostic>,
) -> Result<()> {
	if !should_validate(scope, id) {
		return Ok(());
	}
	let node = scope.tree().node(id);
	let behavior = node.behavior();
	behavior.validate_component(scope, id, diagnostics);
	behavior.visit_children(scope, id, Pass::Validate, &mut |s, child| {
		validate(s, child, &mut *diagnostics)
	})
}

fn should_validate(scope: &Scope<'_>, id: ComponentId) -> bool {
	let flags = scope.model(id, |m| m.flags());
	if !flags.contains(ModelFlags::VISIBLE) || !flags.contains(ModelFlags::VALIDATE) {
		return false;
	}
	let capabilities = scope.tree().capabilities(id);
	if capabilities.supports(Capability::Disableable) && flags.contains(ModelFlags::DISABLED) {
		return false;
	}
	!(capabilities.supports(Capability::Input) && flags.contains(ModelFlags::READ_ONLY))
}
