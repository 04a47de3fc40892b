//! End-to-end behaviour of shared trees driven by several sessions.

use pretty_assertions::assert_eq;
use serde_json::json;
use trellis_core::repeater::{self, RowKey};
use trellis_core::traversal::{self, Outcome};
use trellis_core::widgets::{Button, Container, Text, TextField};
use trellis_core::{ComponentTree, FormRequest, Repeater, Scope, SessionContext};
use trellis_primitives::{ComponentId, ModelFlags};

fn init_tracing() -> tracing::subscriber::DefaultGuard {
	tracing::subscriber::set_default(
		tracing_subscriber::fmt()
			.with_max_level(tracing::Level::TRACE)
			.with_test_writer()
			.finish(),
	)
}

struct Form {
	tree: ComponentTree,
	root: ComponentId,
	panel: ComponentId,
	field: ComponentId,
}

/// `root -> panel (naming context "panel") -> field ("field")`, locked.
fn form() -> Form {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let panel = tree.create(Container);
	let field = tree.create(TextField::new());
	let mut setup = Scope::detached(&tree);
	setup.add(root, panel).unwrap();
	setup.add(panel, field).unwrap();
	setup.set_id_name(panel, Some("panel")).unwrap();
	setup.set_naming_context(panel, true).unwrap();
	setup.set_id_name(field, Some("field")).unwrap();
	tree.lock(root);
	Form {
		tree,
		root,
		panel,
		field,
	}
}

#[test]
fn session_changes_stay_in_their_session() {
	let _guard = init_tracing();
	let f = form();
	let mut a = SessionContext::new();
	let mut b = SessionContext::new();

	let mut scope = Scope::new(&f.tree, &mut a);
	assert_eq!(scope.id(f.field), "panel/field");
	scope.set_tooltip(f.field, Some("hi".into()));
	assert_eq!(scope.tooltip(f.field).map(|m| m.format().into_owned()), Some("hi".to_string()));

	assert_eq!(Scope::new(&f.tree, &mut b).tooltip(f.field), None);
	assert_eq!(Scope::detached(&f.tree).tooltip(f.field), None);
	assert_eq!(b.model_count(), 0);
}

#[test]
fn sessions_share_a_tree_across_threads() {
	let f = form();
	let values: Vec<String> = std::thread::scope(|s| {
		let handles: Vec<_> = (0..4)
			.map(|i| {
				let tree = &f.tree;
				let (root, field) = (f.root, f.field);
				s.spawn(move || {
					let mut session = SessionContext::new();
					let mut scope = Scope::new(tree, &mut session);
					let request = FormRequest::post().with("panel/field", format!("user {i}"));
					traversal::service_request(&mut scope, root, &request).unwrap();
					TextField::value(&scope, field)
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});
	assert_eq!(values, ["user 0", "user 1", "user 2", "user 3"]);
	assert_eq!(TextField::value(&Scope::detached(&f.tree), f.field), "");
}

#[test]
fn full_cycle_paints_submitted_values() {
	let _guard = init_tracing();
	let f = form();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);

	let request = FormRequest::post().with("panel/field", "a < b");
	assert_eq!(
		traversal::service_request(&mut scope, f.root, &request).unwrap(),
		Outcome::Continue
	);
	traversal::prepare_paint(&mut scope, f.root, &request).unwrap();
	let mut out = String::new();
	traversal::paint(&mut scope, f.root, &mut out).unwrap();
	assert_eq!(
		out,
		r#"<input type="text" id="panel/field" name="panel/field" value="a &lt; b"/>"#
	);

	scope.set_visible(f.panel, false);
	let mut out = String::new();
	traversal::paint(&mut scope, f.root, &mut out).unwrap();
	assert_eq!(out, "");
}

#[test]
fn session_state_survives_serialization() {
	let f = form();
	let mut session = SessionContext::new();
	{
		let mut scope = Scope::new(&f.tree, &mut session);
		scope.set_flag(f.field, ModelFlags::MANDATORY, true);
		TextField::set_value(&mut scope, f.field, "kept");
	}
	let saved = serde_json::to_string(&session).unwrap();
	let mut restored: SessionContext = serde_json::from_str(&saved).unwrap();
	let scope = Scope::new(&f.tree, &mut restored);
	assert!(scope.flag(f.field, ModelFlags::MANDATORY));
	assert_eq!(TextField::value(&scope, f.field), "kept");
}

struct Table {
	tree: ComponentTree,
	root: ComponentId,
	list: ComponentId,
	label: ComponentId,
}

/// `root -> list ("items") -> row -> [label, button]`, locked. The button
/// sets the label of its own row.
fn table() -> Table {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let list = tree.create(Repeater::new().with_key_property("id"));
	let row = tree.create(Container);
	let label = tree.create(Text);
	let button = tree.create(Button::new(move |scope, _| {
		Text::set_text(scope, label, "pressed");
		Ok(Outcome::Continue)
	}));
	let mut setup = Scope::detached(&tree);
	setup.add(root, list).unwrap();
	setup.add(list, row).unwrap();
	setup.add(row, label).unwrap();
	setup.add(row, button).unwrap();
	setup.set_id_name(list, Some("items")).unwrap();
	tree.lock(root);
	Table {
		tree,
		root,
		list,
		label,
	}
}

fn label_of(scope: &mut Scope<'_>, t: &Table, key: &str) -> String {
	repeater::with_row(scope, t.list, &RowKey::new(&json!(key)), |row| {
		Ok(Text::text(row, t.label))
	})
	.unwrap()
}

#[test]
fn deferred_actions_run_in_their_row() {
	let _guard = init_tracing();
	let t = table();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&t.tree, &mut session);
	repeater::set_data(&mut scope, t.list, vec![json!({ "id": "a" }), json!({ "id": "b" })])
		.unwrap();
	traversal::prepare_paint(&mut scope, t.root, &FormRequest::get()).unwrap();

	let press = FormRequest::post().with("items/1_1", "");
	traversal::service_request(&mut scope, t.root, &press).unwrap();
	assert_eq!(label_of(&mut scope, &t, "a"), "");
	assert_eq!(label_of(&mut scope, &t, "b"), "pressed");
	assert_eq!(Text::text(&scope, t.label), "");
}

#[test]
fn stale_rows_are_purged_before_painting() {
	let t = table();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&t.tree, &mut session);
	repeater::set_data(&mut scope, t.list, vec![json!({ "id": "a" }), json!({ "id": "b" })])
		.unwrap();
	traversal::prepare_paint(&mut scope, t.root, &FormRequest::get()).unwrap();

	repeater::set_data(&mut scope, t.list, vec![json!({ "id": "b" })]).unwrap();
	traversal::prepare_paint(&mut scope, t.root, &FormRequest::get()).unwrap();
	assert!(!repeater::has_row(&scope, t.list, &RowKey::new(&json!("a"))));

	// "b" keeps its sequence number, so its ids do not move.
	let mut out = String::new();
	traversal::paint(&mut scope, t.root, &mut out).unwrap();
	assert_eq!(out, r#"<button type="submit" id="items/1_1" name="items/1_1"></button>"#);
}

#[test]
fn forward_from_a_row_action_stops_the_cycle() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let list = tree.create(Repeater::new());
	let row = tree.create(Container);
	let button = tree.create(Button::new(|_, _| Ok(Outcome::Forward("/next".to_string()))));
	let mut setup = Scope::detached(&tree);
	setup.add(root, list).unwrap();
	setup.add(list, row).unwrap();
	setup.add(row, button).unwrap();
	setup.set_id_name(list, Some("rows")).unwrap();
	tree.lock(root);

	let mut session = SessionContext::new();
	let mut scope = Scope::new(&tree, &mut session);
	repeater::set_data(&mut scope, list, vec![json!(1)]).unwrap();
	let press = FormRequest::post().with("rows/0_0", "");
	let outcome = traversal::service_request(&mut scope, root, &press).unwrap();
	assert_eq!(outcome, Outcome::Forward("/next".to_string()));
}
