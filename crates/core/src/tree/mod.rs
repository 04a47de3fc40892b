//! The shared component tree.
//!
//! Components live in an append-only arena and are addressed by
//! [`ComponentId`]. Each node owns its behaviour, its shared model and its
//! lock flag. The tree is `Send + Sync` so one definition can serve many
//! sessions at once; per-session state never lives here.
//!
//! # Locking
//!
//! While a component is unlocked, writes go straight to its shared model.
//! [`ComponentTree::lock`] marks a component and every current descendant as
//! locked; from then on writes under a session land in that session's model.

mod component;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use trellis_config::Config;
use trellis_primitives::{CapabilitySet, ComponentId};

pub use component::Component;

use crate::model::ComponentModel;
use crate::property::{JsonProperties, PropertyAccess};
use crate::render::Renderer;

#[cfg(test)]
mod tests;

/// One arena slot.
pub(crate) struct Node {
	behavior: Box<dyn Component>,
	shared: RwLock<ComponentModel>,
	locked: AtomicBool,
}

impl Node {
	pub(crate) fn behavior(&self) -> &dyn Component {
		self.behavior.as_ref()
	}

	pub(crate) fn shared(&self) -> RwLockReadGuard<'_, ComponentModel> {
		self.shared.read()
	}

	pub(crate) fn shared_mut(&self) -> RwLockWriteGuard<'_, ComponentModel> {
		self.shared.write()
	}

	pub(crate) fn is_locked(&self) -> bool {
		self.locked.load(Ordering::Acquire)
	}
}

/// Arena of components shared by every session.
pub struct ComponentTree {
	nodes: RwLock<Vec<Arc<Node>>>,
	config: Config,
	renderers: FxHashMap<&'static str, Box<dyn Renderer>>,
	properties: Box<dyn PropertyAccess>,
}

impl Default for ComponentTree {
	fn default() -> Self {
		Self::new(Config::default())
	}
}

impl ComponentTree {
	/// Creates an empty tree.
	pub fn new(config: Config) -> Self {
		Self {
			nodes: RwLock::new(Vec::new()),
			config,
			renderers: FxHashMap::default(),
			properties: Box::new(JsonProperties),
		}
	}

	/// Replaces the property-access collaborator used for row keys and bean
	/// binding.
	pub fn with_property_access(mut self, access: impl PropertyAccess + 'static) -> Self {
		self.properties = Box::new(access);
		self
	}

	/// Registers the renderer used to paint components of `kind`.
	pub fn register_renderer(&mut self, kind: &'static str, renderer: impl Renderer + 'static) {
		self.renderers.insert(kind, Box::new(renderer));
	}

	/// Returns the renderer registered for `kind`.
	pub fn renderer(&self, kind: &str) -> Option<&dyn Renderer> {
		self.renderers.get(kind).map(|r| r.as_ref())
	}

	/// Returns the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns the property-access collaborator.
	pub fn properties(&self) -> &dyn PropertyAccess {
		self.properties.as_ref()
	}

	/// Adds a component to the arena. It starts unlocked and parentless.
	///
	/// # Panics
	///
	/// Panics if the arena already holds `u32::MAX` components.
	pub fn create(&self, component: impl Component) -> ComponentId {
		let mut model = ComponentModel::new();
		component.init_model(&mut model);
		let node = Arc::new(Node {
			behavior: Box::new(component),
			shared: RwLock::new(model),
			locked: AtomicBool::new(false),
		});

		let mut nodes = self.nodes.write();
		let id = ComponentId(
			u32::try_from(nodes.len()).expect("component arena exceeds u32::MAX entries"),
		);
		nodes.push(node);
		id
	}

	/// Number of components in the arena.
	pub fn len(&self) -> usize {
		self.nodes.read().len()
	}

	/// Returns true if no component has been created.
	pub fn is_empty(&self) -> bool {
		self.nodes.read().is_empty()
	}

	/// Returns true if `id` belongs to this tree.
	pub fn contains(&self, id: ComponentId) -> bool {
		id.index() < self.len()
	}

	/// # Panics
	///
	/// Panics if `id` was not created by this tree.
	pub(crate) fn node(&self, id: ComponentId) -> Arc<Node> {
		self.nodes
			.read()
			.get(id.index())
			.cloned()
			.unwrap_or_else(|| panic!("component {id} does not belong to this tree"))
	}

	/// Kind name of a component.
	pub fn kind(&self, id: ComponentId) -> &'static str {
		self.node(id).behavior().kind()
	}

	/// Capabilities of a component.
	pub fn capabilities(&self, id: ComponentId) -> CapabilitySet {
		self.node(id).behavior().capabilities()
	}

	/// Returns true if the component repeats its subtree per data row.
	pub fn is_repeater(&self, id: ComponentId) -> bool {
		self.node(id).behavior().as_repeater().is_some()
	}

	/// Parent recorded in the shared model.
	pub fn shared_parent(&self, id: ComponentId) -> Option<ComponentId> {
		self.node(id).shared().parent
	}

	/// Children recorded in the shared model.
	pub fn shared_children(&self, id: ComponentId) -> Vec<ComponentId> {
		self.node(id).shared().children.clone()
	}

	/// Reads the shared model.
	pub fn shared_model<R>(&self, id: ComponentId, f: impl FnOnce(&ComponentModel) -> R) -> R {
		f(&self.node(id).shared())
	}

	/// Returns true if the component is locked.
	pub fn is_locked(&self, id: ComponentId) -> bool {
		self.node(id).is_locked()
	}

	/// Locks a component and every current descendant.
	///
	/// Locking cannot be undone. Descendants added later are locked by a
	/// later call.
	pub fn lock(&self, id: ComponentId) {
		let mut stack = vec![id];
		let mut count = 0usize;
		while let Some(current) = stack.pop() {
			let node = self.node(current);
			if !node.locked.swap(true, Ordering::AcqRel) {
				count += 1;
			}
			stack.extend(node.shared().children.iter().copied());
		}
		tracing::debug!(root = %id, newly_locked = count, "locked component subtree");
	}
}
