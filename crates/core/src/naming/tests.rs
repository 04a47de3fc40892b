use pretty_assertions::assert_eq;
use rstest::rstest;
use trellis_config::Config;
use trellis_primitives::ComponentId;

use crate::context::SessionContext;
use crate::error::ComponentError;
use crate::scope::Scope;
use crate::tree::ComponentTree;
use crate::widgets::{Container, Text};

/// Builds a chain of containers, each the `index`-th child of the previous
/// one, padding with unnamed siblings. Returns the chain, root first.
fn chain(tree: &ComponentTree, indices: &[usize]) -> Vec<ComponentId> {
	let mut scope = Scope::detached(tree);
	let root = tree.create(Container);
	let mut out = vec![root];
	let mut parent = root;
	for &index in indices {
		for _ in 0..index {
			let pad = tree.create(Text);
			scope.add(parent, pad).unwrap();
		}
		let child = tree.create(Container);
		scope.add(parent, child).unwrap();
		out.push(child);
		parent = child;
	}
	out
}

#[rstest]
#[case(&[], "0", "id")]
#[case(&[2], "0c", "id_2")]
#[case(&[1, 2], "0b2", "id_1c")]
#[case(&[12], "0bc", "id_12")]
#[case(&[0, 0, 0], "0a0a", "id_0a0")]
fn positional_ids(#[case] indices: &[usize], #[case] internal: &str, #[case] rendered: &str) {
	let tree = ComponentTree::default();
	let chain = chain(&tree, indices);
	let last = *chain.last().unwrap();
	let mut scope = Scope::detached(&tree);
	assert_eq!(scope.internal_id(last), internal);
	assert_eq!(scope.id(last), rendered);
}

#[test]
fn digit_suffixes_do_not_collide() {
	let tree = ComponentTree::default();
	let one_two = chain(&tree, &[1, 2]);
	let twelve = chain(&tree, &[12]);
	let mut scope = Scope::detached(&tree);
	assert_ne!(
		scope.internal_id(*one_two.last().unwrap()),
		scope.internal_id(*twelve.last().unwrap())
	);
	assert_ne!(scope.id(*one_two.last().unwrap()), scope.id(*twelve.last().unwrap()));
}

#[test]
fn id_name_in_naming_context() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let panel = tree.create(Container);
	let field = tree.create(Text);
	let loose = tree.create(Text);
	let mut scope = Scope::detached(&tree);
	scope.add(root, panel).unwrap();
	scope.add(panel, field).unwrap();
	scope.add(panel, loose).unwrap();
	scope.set_id_name(panel, Some("panel")).unwrap();
	scope.set_naming_context(panel, true).unwrap();
	scope.set_id_name(field, Some("field")).unwrap();

	assert_eq!(scope.id(panel), "panel");
	assert_eq!(scope.id(field), "panel/field");
	assert_eq!(scope.id(loose), "panel_1");
}

#[test]
fn id_name_without_naming_context_is_verbatim() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let field = tree.create(Text);
	let mut scope = Scope::detached(&tree);
	scope.add(root, field).unwrap();
	scope.set_id_name(field, Some("email")).unwrap();
	assert_eq!(scope.id(field), "email");
	assert_eq!(scope.naming_prefix(field), None);
}

#[test]
fn naming_context_without_id_name_is_inactive() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let group = tree.create(Container);
	let field = tree.create(Text);
	let mut scope = Scope::detached(&tree);
	scope.add(root, group).unwrap();
	scope.add(group, field).unwrap();
	scope.set_naming_context(group, true).unwrap();
	scope.set_id_name(field, Some("field")).unwrap();
	assert!(!scope.is_active_naming_context(group));
	assert_eq!(scope.id(field), "field");
}

#[test]
fn separators_follow_config() {
	let mut config = Config::default();
	config.ids.context_separator = ':';
	config.ids.framework_separator = '-';
	config.ids.root_prefix = "page".to_string();
	let tree = ComponentTree::new(config);
	let root = tree.create(Container);
	let child = tree.create(Text);
	let mut scope = Scope::detached(&tree);
	scope.add(root, child).unwrap();
	assert_eq!(scope.id(child), "page-0");

	scope.set_id_name(root, Some("form")).unwrap();
	scope.set_naming_context(root, true).unwrap();
	scope.set_id_name(child, Some("name")).unwrap();
	assert_eq!(scope.id(child), "form:name");
}

#[test]
fn ids_are_cached_and_invalidated_on_shape_change() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let a = tree.create(Text);
	let b = tree.create(Text);
	let mut setup = Scope::detached(&tree);
	setup.add(root, a).unwrap();
	setup.add(root, b).unwrap();
	tree.lock(root);

	let mut session = SessionContext::new();
	let mut scope = Scope::new(&tree, &mut session);
	assert_eq!(scope.id(b), "id_1");
	assert_eq!(scope.scratch(b, "id").as_deref(), Some("id_1"));
	assert_eq!(scope.id(b), "id_1");

	scope.remove(root, a);
	assert_eq!(scope.scratch(b, "id"), None);
	assert_eq!(scope.id(b), "id_0");
	assert_eq!(scope.internal_id(b), "0a");
}

fn named_pair(tree: &ComponentTree) -> (ComponentId, ComponentId, ComponentId) {
	let panel = tree.create(Container);
	let a = tree.create(Text);
	let b = tree.create(Text);
	let mut scope = Scope::detached(tree);
	scope.add(panel, a).unwrap();
	scope.add(panel, b).unwrap();
	scope.set_id_name(panel, Some("panel")).unwrap();
	scope.set_naming_context(panel, true).unwrap();
	scope.set_id_name(a, Some("field")).unwrap();
	scope.set_id_name(b, Some("field")).unwrap();
	tree.lock(panel);
	(panel, a, b)
}

#[test]
fn duplicate_id_names_are_fatal() {
	let tree = ComponentTree::default();
	let (panel, a, b) = named_pair(&tree);
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&tree, &mut session);

	scope.register_id_name(panel).unwrap();
	scope.register_id_name(a).unwrap();
	scope.register_id_name(a).unwrap();
	let err = scope.register_id_name(b).unwrap_err();
	match err {
		ComponentError::DuplicateIdName {
			name,
			context,
			existing,
			duplicate,
		} => {
			assert_eq!(name, "field");
			assert_eq!(context, "panel");
			assert_eq!((existing, duplicate), (a, b));
		}
		other => panic!("unexpected error: {other}"),
	}

	// A fresh paint starts from an empty registry.
	scope.clear_naming_registry(panel).unwrap();
	scope.register_id_name(b).unwrap();
}

#[test]
fn duplicate_checks_can_be_disabled() {
	let mut config = Config::default();
	config.ids.check_duplicates = false;
	let tree = ComponentTree::new(config);
	let (_, a, b) = named_pair(&tree);
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&tree, &mut session);
	scope.register_id_name(a).unwrap();
	scope.register_id_name(b).unwrap();
}

#[test]
fn top_level_naming_context_registers_with_itself() {
	let tree = ComponentTree::default();
	let (panel, _, _) = named_pair(&tree);
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&tree, &mut session);
	scope.register_id_name(panel).unwrap();
	let registered = scope.model(panel, |m| {
		m.naming_registry().and_then(|r| r.get("panel").copied())
	});
	assert_eq!(registered, Some(panel));
}

mod properties {
	use proptest::prelude::*;

	use super::*;

	proptest! {
		#[test]
		fn ids_are_stable_across_calls(indices in proptest::collection::vec(0usize..14, 0..5)) {
			let tree = ComponentTree::default();
			let last = *chain(&tree, &indices).last().unwrap();
			tree.lock(ComponentId(0));
			let mut session = SessionContext::new();
			let mut scope = Scope::new(&tree, &mut session);
			let first = (scope.internal_id(last), scope.id(last));
			let second = (scope.internal_id(last), scope.id(last));
			prop_assert_eq!(&first, &second);
			prop_assert_eq!(first, (Scope::detached(&tree).internal_id(last), Scope::detached(&tree).id(last)));
		}

		#[test]
		fn distinct_paths_get_distinct_internal_ids(
			left in proptest::collection::vec(0usize..14, 1..4),
			right in proptest::collection::vec(0usize..14, 1..4),
		) {
			prop_assume!(left != right);
			let tree = ComponentTree::default();
			let a = *chain(&tree, &left).last().unwrap();
			let b = *chain(&tree, &right).last().unwrap();
			let mut scope = Scope::detached(&tree);
			prop_assert_ne!(scope.internal_id(a), scope.internal_id(b));
		}
	}
}
