use pretty_assertions::assert_eq;
use trellis_primitives::ComponentId;

use super::*;
use crate::render::RenderContext;
use crate::scope::Scope;
use crate::widgets::{Container, Text};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn tree_is_shareable_across_threads() {
	assert_send_sync::<ComponentTree>();
}

#[test]
fn ids_are_assigned_in_creation_order() {
	let tree = ComponentTree::default();
	assert!(tree.is_empty());
	let a = tree.create(Container);
	let b = tree.create(Text);
	assert_eq!((a, b), (ComponentId(0), ComponentId(1)));
	assert_eq!(tree.len(), 2);
	assert_eq!(tree.kind(b), "text");
	assert!(tree.contains(b));
	assert!(!tree.contains(ComponentId(2)));
}

#[test]
#[should_panic(expected = "does not belong to this tree")]
fn foreign_id_panics() {
	let tree = ComponentTree::default();
	tree.kind(ComponentId(7));
}

#[test]
fn lock_covers_current_descendants_only() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let mid = tree.create(Container);
	let leaf = tree.create(Text);
	let late = tree.create(Text);
	let mut setup = Scope::detached(&tree);
	setup.add(root, mid).unwrap();
	setup.add(mid, leaf).unwrap();

	tree.lock(root);
	assert!(tree.is_locked(root));
	assert!(tree.is_locked(mid));
	assert!(tree.is_locked(leaf));
	assert!(!tree.is_locked(late));

	assert_eq!(tree.shared_parent(leaf), Some(mid));
	assert_eq!(tree.shared_children(root), vec![mid]);
}

#[test]
fn renderers_are_looked_up_by_kind() {
	struct Stars;
	impl Renderer for Stars {
		fn render(
			&self,
			_scope: &mut Scope<'_>,
			_id: ComponentId,
			out: &mut dyn RenderContext,
		) -> crate::error::Result<()> {
			out.write("**");
			Ok(())
		}
	}

	let mut tree = ComponentTree::default();
	tree.register_renderer("container", Stars);
	assert!(tree.renderer("container").is_some());
	assert!(tree.renderer("text").is_none());
}
