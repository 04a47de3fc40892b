//! Context-sensitive access to the component tree.
//!
//! A [`Scope`] pairs the shared tree with the context of the caller: the
//! session, a row nested in it, or nothing at all. Every read resolves the
//! model the scope sees; every write goes to the model the scope owns.
//!
//! Reads never allocate: without a session model they fall back to the shared
//! model. The first write to a locked component under a context creates the
//! session model, copying its containers from the shared model.

use serde_json::Value;
use trellis_config::Config;
use trellis_primitives::{Capability, ComponentId, IdName, ModelFlags};

use crate::context::{Focus, RowFrame, UiContext};
use crate::error::{ComponentError, Result};
use crate::model::{ComponentModel, Message, ModelView};
use crate::traversal::Outcome;
use crate::tree::{ComponentTree, Node};


/// The tree as seen from one context.
pub struct Scope<'a> {
	tree: &'a ComponentTree,
	ctx: Option<&'a mut dyn UiContext>,
}

impl<'a> Scope<'a> {
	/// Creates a scope that resolves models through `ctx`.
	pub fn new(tree: &'a ComponentTree, ctx: &'a mut dyn UiContext) -> Self {
		Self {
			tree,
			ctx: Some(ctx),
		}
	}

	/// Creates a scope without a context. Reads and writes use the shared
	/// models.
	pub fn detached(tree: &'a ComponentTree) -> Self {
		Self { tree, ctx: None }
	}

	/// Returns the shared tree.
	pub fn tree(&self) -> &'a ComponentTree {
		self.tree
	}

	/// Returns the tree configuration.
	pub fn config(&self) -> &'a Config {
		self.tree.config()
	}

	/// Returns true if a context is active.
	pub fn has_context(&self) -> bool {
		self.ctx.is_some()
	}

	/// Returns the active context.
	pub fn context(&self) -> Option<&dyn UiContext> {
		match &self.ctx {
			Some(ctx) => Some(&**ctx as &dyn UiContext),
			None => None,
		}
	}

	/// Returns the active context mutably.
	pub fn context_mut(&mut self) -> Option<&mut dyn UiContext> {
		match &mut self.ctx {
			Some(ctx) => Some(&mut **ctx as &mut dyn UiContext),
			None => None,
		}
	}

	/// Borrows this scope for a shorter lifetime.
	pub fn reborrow(&mut self) -> Scope<'_> {
		Scope {
			tree: self.tree,
			ctx: self.context_mut(),
		}
	}

	/// Reads a component's state as this scope sees it.
	///
	/// A restored session model whose shared-model link is missing is read
	/// as is; the link only selects the shared model, which is always the
	/// node's own, and is repaired on the next write or
	/// [`Scope::is_default_state`].
	///
	/// The closure must not call back into the scope.
	pub fn model<R>(&self, id: ComponentId, f: impl FnOnce(ModelView<'_>) -> R) -> R {
		let node = self.tree.node(id);
		// Row contexts walk shared parents to resolve ownership, so resolve
		// before taking the read guard.
		let session = self.ctx.as_deref().and_then(|ctx| ctx.model(id));
		let shared = node.shared();
		f(ModelView::new(&shared, session))
	}

	/// Writes a component's model, creating the session model when needed.
	///
	/// Writing a locked component without a context mutates the shared model
	/// for every session; this is logged and allowed.
	pub fn model_mut<R>(&mut self, id: ComponentId, f: impl FnOnce(&mut ComponentModel) -> R) -> R {
		let node = self.tree.node(id);
		if !node.is_locked() {
			return f(&mut node.shared_mut());
		}
		match self.ctx.as_deref_mut() {
			Some(ctx) => f(session_model(ctx, &node, id)),
			None => {
				tracing::warn!(component = %id, "writing shared model of a locked component outside a session");
				f(&mut node.shared_mut())
			}
		}
	}

	/// Like [`Scope::model_mut`], but refuses to touch the shared model of a
	/// locked component.
	pub(crate) fn model_mut_internal<R>(
		&mut self,
		id: ComponentId,
		f: impl FnOnce(&mut ComponentModel) -> R,
	) -> Result<R> {
		let node = self.tree.node(id);
		if !node.is_locked() {
			return Ok(f(&mut node.shared_mut()));
		}
		match self.ctx.as_deref_mut() {
			Some(ctx) => Ok(f(session_model(ctx, &node, id))),
			None => Err(ComponentError::NoActiveContext { component: id }),
		}
	}

	/// Returns true if the component is visible.
	pub fn is_visible(&self, id: ComponentId) -> bool {
		self.flag(id, ModelFlags::VISIBLE)
	}

	/// Shows or hides the component.
	pub fn set_visible(&mut self, id: ComponentId, visible: bool) {
		self.set_flag(id, ModelFlags::VISIBLE, visible);
	}

	/// Returns true if every bit of `flag` is set.
	pub fn flag(&self, id: ComponentId, flag: ModelFlags) -> bool {
		self.model(id, |m| m.flag(flag))
	}

	/// Sets or clears `flag`.
	pub fn set_flag(&mut self, id: ComponentId, flag: ModelFlags, on: bool) {
		let wanted = if on { flag } else { ModelFlags::empty() };
		if self.model(id, |m| m.flags() & flag) == wanted {
			return;
		}
		self.model_mut(id, |m| m.set_flag(flag, on));
	}

	/// Returns the children, in order.
	pub fn children(&self, id: ComponentId) -> Vec<ComponentId> {
		self.model(id, |m| m.children().to_vec())
	}

	/// Returns the parent.
	pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
		self.model(id, |m| m.parent())
	}

	/// Returns the position of `id` among its parent's children.
	pub fn child_index(&self, id: ComponentId) -> Option<usize> {
		let parent = self.parent(id)?;
		self.model(parent, |m| m.children().iter().position(|&c| c == id))
	}

	/// Adds `child` as the last child of `parent`.
	///
	/// Fails if `child` already has a parent.
	pub fn add(&mut self, parent: ComponentId, child: ComponentId) -> Result<()> {
		if let Some(existing) = self.parent(child) {
			return Err(ComponentError::AlreadyParented {
				child,
				parent: existing,
			});
		}
		self.model_mut(parent, |m| m.children.push(child));
		self.model_mut(child, |m| m.set_parent(Some(parent)));
		self.invalidate_ids(child);
		Ok(())
	}

	/// Detaches `child` from `parent`. Returns false if it was not a child.
	pub fn remove(&mut self, parent: ComponentId, child: ComponentId) -> bool {
		let Some(index) = self.model(parent, |m| m.children().iter().position(|&c| c == child))
		else {
			return false;
		};
		// Later siblings shift down one index.
		let shifted: Vec<_> = self.children(parent).into_iter().skip(index).collect();
		self.model_mut(parent, |m| {
			m.children.remove(index);
		});
		self.model_mut(child, |m| m.set_parent(None));
		for id in shifted {
			self.invalidate_ids(id);
		}
		true
	}

	/// Returns the tooltip.
	pub fn tooltip(&self, id: ComponentId) -> Option<Message> {
		self.model(id, |m| m.tooltip().cloned())
	}

	/// Sets or clears the tooltip.
	pub fn set_tooltip(&mut self, id: ComponentId, tooltip: Option<Message>) {
		self.model_mut(id, |m| m.set_tooltip(tooltip));
	}

	/// Returns the accessible text.
	pub fn accessible_text(&self, id: ComponentId) -> Option<Message> {
		self.model(id, |m| m.accessible_text().cloned())
	}

	/// Sets or clears the accessible text.
	pub fn set_accessible_text(&mut self, id: ComponentId, text: Option<Message>) {
		self.model_mut(id, |m| m.set_accessible_text(text));
	}

	/// Returns the extra CSS class.
	pub fn html_class(&self, id: ComponentId) -> Option<Message> {
		self.model(id, |m| m.html_class().cloned())
	}

	/// Sets or clears the extra CSS class.
	pub fn set_html_class(&mut self, id: ComponentId, class: Option<Message>) {
		self.model_mut(id, |m| m.set_html_class(class));
	}

	/// Returns the markup tag hint.
	pub fn tag(&self, id: ComponentId) -> Option<String> {
		self.model(id, |m| m.tag().map(str::to_owned))
	}

	/// Sets or clears the markup tag hint.
	pub fn set_tag(&mut self, id: ComponentId, tag: Option<&str>) {
		let tag = tag.map(str::to_owned);
		self.model_mut(id, |m| m.set_tag(tag));
	}

	/// Returns the layout template reference.
	pub fn template(&self, id: ComponentId) -> Option<String> {
		self.model(id, |m| m.template().map(str::to_owned))
	}

	/// Sets or clears the layout template reference.
	pub fn set_template(&mut self, id: ComponentId, template: Option<&str>) {
		let template = template.map(str::to_owned);
		self.model_mut(id, |m| m.set_template(template));
	}

	/// Returns the associated label.
	pub fn label(&self, id: ComponentId) -> Option<ComponentId> {
		self.model(id, |m| m.label())
	}

	/// Sets or clears the associated label.
	pub fn set_label(&mut self, id: ComponentId, label: Option<ComponentId>) {
		self.model_mut(id, |m| m.set_label(label));
	}

	/// Returns an attribute.
	pub fn attribute(&self, id: ComponentId, name: &str) -> Option<Value> {
		self.model(id, |m| m.attribute(name).cloned())
	}

	/// Sets an attribute, returning the previous value.
	pub fn set_attribute(
		&mut self,
		id: ComponentId,
		name: impl Into<String>,
		value: Value,
	) -> Option<Value> {
		self.model_mut(id, |m| m.set_attribute(name, value))
	}

	/// Removes an attribute, returning its value.
	pub fn remove_attribute(&mut self, id: ComponentId, name: &str) -> Option<Value> {
		if self.attribute(id, name).is_none() {
			return None;
		}
		self.model_mut(id, |m| m.remove_attribute(name))
	}

	/// Returns the developer-assigned id-name.
	pub fn id_name(&self, id: ComponentId) -> Option<IdName> {
		self.model(id, |m| m.id_name().cloned())
	}

	/// Sets or clears the id-name.
	///
	/// Fails if `name` does not match the id-name grammar.
	pub fn set_id_name(&mut self, id: ComponentId, name: Option<&str>) -> Result<()> {
		let name = name.map(IdName::parse).transpose()?;
		self.model_mut(id, |m| m.set_id_name(name));
		self.invalidate_ids(id);
		Ok(())
	}

	/// Flags or unflags the component as a naming context.
	///
	/// Fails unless the component supports [`Capability::NamingContext`].
	pub fn set_naming_context(&mut self, id: ComponentId, on: bool) -> Result<()> {
		let node = self.tree.node(id);
		let behavior = node.behavior();
		if !behavior.capabilities().supports(Capability::NamingContext) {
			return Err(ComponentError::MissingCapability {
				component: id,
				kind: behavior.kind(),
				capability: Capability::NamingContext,
			});
		}
		self.set_flag(id, ModelFlags::NAMING_CONTEXT, on);
		self.invalidate_ids(id);
		Ok(())
	}

	/// Returns true if the component is flagged as a naming context and
	/// carries an id-name.
	pub fn is_active_naming_context(&self, id: ComponentId) -> bool {
		self.model(id, |m| m.flag(ModelFlags::NAMING_CONTEXT) && m.id_name().is_some())
	}

	/// Returns the frame of the row whose repeated root is `id`.
	pub fn row_root_frame(&self, id: ComponentId) -> Option<RowFrame> {
		self.context()?
			.row_frame(id)
			.filter(|frame| frame.repeat_root == id)
			.cloned()
	}

	/// Returns the data of the innermost row containing `id`.
	pub fn row_data(&self, id: ComponentId) -> Option<Value> {
		self.context()?.row_data(id).cloned()
	}

	/// Edits the data of the innermost row containing `id`.
	pub fn row_data_mut<R>(&mut self, id: ComponentId, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
		self.context_mut()?.row_data_mut(id).map(f)
	}

	/// Returns a volatile cached value.
	pub fn scratch(&self, id: ComponentId, key: &str) -> Option<String> {
		self.context()?.scratch(id)?.get(key).map(str::to_owned)
	}

	/// Caches a volatile value. Does nothing without a context.
	pub fn set_scratch(&mut self, id: ComponentId, key: &'static str, value: &str) {
		if let Some(ctx) = self.context_mut() {
			ctx.scratch_mut(id).insert(key, value.to_owned());
		}
	}

	/// Drops the cached ids of `id` and its subtree.
	pub fn invalidate_ids(&mut self, id: ComponentId) {
		if !self.has_context() {
			return;
		}
		for current in self.subtree(id) {
			if let Some(ctx) = self.context_mut() {
				ctx.clear_scratch_for(current);
			}
		}
	}

	/// `id` followed by its descendants, pre-order.
	pub fn subtree(&self, id: ComponentId) -> Vec<ComponentId> {
		let mut out = Vec::new();
		let mut stack = vec![id];
		while let Some(current) = stack.pop() {
			out.push(current);
			let children = self.children(current);
			stack.extend(children.into_iter().rev());
		}
		out
	}

	/// Returns true if the component has no session model, or its session
	/// model reads the same as the shared model.
	pub fn is_default_state(&mut self, id: ComponentId) -> bool {
		let node = self.tree.node(id);
		let Some(model) = self.ctx.as_deref_mut().and_then(|ctx| ctx.model_mut(id)) else {
			return true;
		};
		repair_link(model, id);
		model.is_default_of(&node.shared())
	}

	/// Drops every session model of this context that reads the same as its
	/// shared model. Returns the number dropped.
	pub fn compact(&mut self) -> usize {
		let tree = self.tree;
		let Some(ctx) = self.ctx.as_deref_mut() else {
			return 0;
		};
		let mut removed = 0;
		for id in ctx.model_ids() {
			if !tree.contains(id) {
				tracing::warn!(component = %id, "session model for unknown component");
				continue;
			}
			let node = tree.node(id);
			let default = ctx
				.model(id)
				.is_some_and(|model| model.is_default_of(&node.shared()));
			if default {
				ctx.remove_model(id);
				removed += 1;
			}
		}
		if removed > 0 {
			tracing::debug!(removed, "compacted session models");
		}
		removed
	}

	/// Drops the session models and cached values of `id` and its subtree.
	pub fn reset(&mut self, id: ComponentId) {
		let subtree = self.subtree(id);
		let Some(ctx) = self.context_mut() else {
			return;
		};
		for current in subtree {
			ctx.remove_model(current);
			ctx.clear_scratch_for(current);
		}
		tracing::debug!(component = %id, "reset session state");
	}

	/// Returns the focused component.
	pub fn focus(&self) -> Option<Focus> {
		self.context()?.focus().cloned()
	}

	/// Focuses `id`, recording its current rendered id.
	pub fn set_focus(&mut self, id: ComponentId) -> Result<()> {
		let rendered_id = self.id(id);
		let ctx = self
			.context_mut()
			.ok_or(ComponentError::NoActiveContext { component: id })?;
		ctx.set_focus(Some(Focus {
			component: id,
			rendered_id,
		}));
		Ok(())
	}

	/// Queues `action` to run after the top-level request traversal.
	///
	/// Actions queued inside a row run inside that row again, or are dropped
	/// with a warning if the row has been purged by then.
	pub fn invoke_later(
		&mut self,
		id: ComponentId,
		action: impl FnOnce(&mut Scope<'_>) -> Result<Outcome> + Send + 'static,
	) -> Result<()> {
		let ctx = self
			.context_mut()
			.ok_or(ComponentError::NoActiveContext { component: id })?;
		ctx.invoke_later(Box::new(action));
		Ok(())
	}
}

fn session_model<'c>(
	ctx: &'c mut dyn UiContext,
	node: &Node,
	id: ComponentId,
) -> &'c mut ComponentModel {
	let model = ctx.model_or_insert_with(id, &mut || {
		let mut model = ComponentModel::overlay(id, &node.shared());
		node.behavior().model_created(&mut model);
		tracing::trace!(component = %id, "created session model");
		model
	});
	repair_link(model, id);
	model
}

fn repair_link(model: &mut ComponentModel, id: ComponentId) {
	if model.shared.is_none() {
		tracing::trace!(component = %id, "restored shared model link");
		model.shared = Some(id);
	}
}
