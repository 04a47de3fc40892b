use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use trellis_primitives::{CapabilitySet, ComponentId, ModelFlags};

use super::*;
use crate::context::SessionContext;
use crate::repeater::Repeater;
use crate::request::FormRequest;
use crate::tree::{Component, ComponentTree};
use crate::widgets::{Container, TextField};

type Log = Arc<Mutex<Vec<String>>>;

/// Records every hook call as `hook:name`.
struct Recorder {
	name: &'static str,
	log: Log,
	outcome: Outcome,
	capabilities: CapabilitySet,
}

impl Recorder {
	fn new(name: &'static str, log: &Log) -> Self {
		Self {
			name,
			log: Arc::clone(log),
			outcome: Outcome::Continue,
			capabilities: CapabilitySet::NAMING_CONTEXT,
		}
	}

	fn record(&self, hook: &str) {
		self.log.lock().push(format!("{hook}:{}", self.name));
	}
}

impl Component for Recorder {
	fn kind(&self) -> &'static str {
		"recorder"
	}

	fn capabilities(&self) -> CapabilitySet {
		self.capabilities
	}

	fn handle_request(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_request: &dyn Request,
	) -> Result<Outcome> {
		self.record("request");
		Ok(self.outcome.clone())
	}

	fn prepare_paint(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_request: &dyn Request,
	) -> Result<()> {
		self.record("prepare");
		Ok(())
	}

	fn before_paint(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		self.record("before");
		out.write(&format!("<{}>", self.name));
		Ok(())
	}

	fn after_paint(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		self.record("after");
		out.write(&format!("</{}>", self.name));
		Ok(())
	}

	fn validate_component(
		&self,
		_scope: &mut Scope<'_>,
		_id: ComponentId,
		_diagnostics: &mut Vec<Diagnostic>,
	) {
		self.record("validate");
	}
}

struct Fixture {
	tree: ComponentTree,
	log: Log,
	root: ComponentId,
	left: ComponentId,
	left_leaf: ComponentId,
	right: ComponentId,
}

/// `root -> [left -> left_leaf, right]`, locked.
fn fixture() -> Fixture {
	fixture_with(|_, recorder| recorder)
}

fn fixture_with(tweak: impl Fn(&str, Recorder) -> Recorder) -> Fixture {
	let log = Log::default();
	let tree = ComponentTree::default();
	let root = tree.create(tweak("root", Recorder::new("root", &log)));
	let left = tree.create(tweak("left", Recorder::new("left", &log)));
	let left_leaf = tree.create(tweak("left_leaf", Recorder::new("left_leaf", &log)));
	let right = tree.create(tweak("right", Recorder::new("right", &log)));
	let mut setup = Scope::detached(&tree);
	setup.add(root, left).unwrap();
	setup.add(left, left_leaf).unwrap();
	setup.add(root, right).unwrap();
	tree.lock(root);
	Fixture {
		tree,
		log,
		root,
		left,
		left_leaf,
		right,
	}
}

fn take(log: &Log) -> Vec<String> {
	std::mem::take(&mut *log.lock())
}

#[test]
fn request_handles_children_before_their_container() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	let outcome = service_request(&mut scope, f.root, &FormRequest::get()).unwrap();
	assert_eq!(outcome, Outcome::Continue);
	assert_eq!(
		take(&f.log),
		["request:left_leaf", "request:left", "request:right", "request:root"]
	);
}

#[test]
fn invisible_branches_are_pruned_everywhere() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	scope.set_visible(f.left, false);

	service_request(&mut scope, f.root, &FormRequest::get()).unwrap();
	prepare_paint(&mut scope, f.root, &FormRequest::get()).unwrap();
	let mut out = String::new();
	paint(&mut scope, f.root, &mut out).unwrap();
	let mut diagnostics = Vec::new();
	validate(&mut scope, f.root, &mut diagnostics).unwrap();
	assert!(take(&f.log).iter().all(|entry| !entry.contains("left")));
	assert_eq!(out, "<root><right></right></root>");

	scope.set_visible(f.left, true);
	service_request(&mut scope, f.root, &FormRequest::get()).unwrap();
	assert!(take(&f.log).contains(&"request:left_leaf".to_string()));

	// Another session never saw the change.
	let mut other = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut other);
	let mut out = String::new();
	paint(&mut scope, f.root, &mut out).unwrap();
	assert_eq!(out, "<root><left><left_leaf></left_leaf></left><right></right></root>");
}

#[test]
fn prepare_paint_is_pre_order() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	prepare_paint(&mut scope, f.root, &FormRequest::get()).unwrap();
	assert_eq!(
		take(&f.log),
		["prepare:root", "prepare:left", "prepare:left_leaf", "prepare:right"]
	);
}

#[test]
fn paint_runs_hooks_in_order() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	let mut out = String::new();
	paint(&mut scope, f.left, &mut out).unwrap();
	assert_eq!(out, "<left><left_leaf></left_leaf></left>");
	assert_eq!(
		take(&f.log),
		["before:left", "before:left_leaf", "after:left_leaf", "after:left"]
	);
}

#[test]
fn registered_renderer_replaces_child_painting() {
	struct Flat;
	impl crate::render::Renderer for Flat {
		fn render(
			&self,
			scope: &mut Scope<'_>,
			id: ComponentId,
			out: &mut dyn RenderContext,
		) -> Result<()> {
			out.write(&format!("[{}]", scope.id(id)));
			Ok(())
		}
	}

	let mut f = fixture();
	f.tree.register_renderer("recorder", Flat);
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	let mut out = String::new();
	paint(&mut scope, f.root, &mut out).unwrap();
	assert_eq!(out, "<root>[id]</root>");
}

#[test]
fn forward_stops_traversal_and_drops_deferred_actions() {
	let f = fixture_with(|name, mut recorder| {
		if name == "left" {
			recorder.outcome = Outcome::Forward("/elsewhere".to_string());
		}
		recorder
	});
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	scope
		.invoke_later(f.root, |_| panic!("deferred action must not run"))
		.unwrap();

	let outcome = service_request(&mut scope, f.root, &FormRequest::post()).unwrap();
	assert_eq!(outcome, Outcome::Forward("/elsewhere".to_string()));
	assert_eq!(take(&f.log), ["request:left_leaf", "request:left"]);
	drop(scope);
	assert_eq!(session.pending_actions(), 0);
}

#[test]
fn deferred_actions_run_in_enqueue_order() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	for i in 0..3 {
		let log = Arc::clone(&f.log);
		scope
			.invoke_later(f.root, move |scope| {
				log.lock().push(format!("deferred:{i}"));
				if i == 0 {
					let log = Arc::clone(&log);
					scope.invoke_later(ComponentId(0), move |_| {
						log.lock().push("deferred:nested".to_string());
						Ok(Outcome::Continue)
					})?;
				}
				Ok(Outcome::Continue)
			})
			.unwrap();
	}
	service_request(&mut scope, f.root, &FormRequest::post()).unwrap();
	let log = take(&f.log);
	let deferred: Vec<_> = log.iter().filter(|e| e.starts_with("deferred")).collect();
	assert_eq!(
		deferred,
		["deferred:0", "deferred:1", "deferred:2", "deferred:nested"]
	);
}

#[test]
fn subtree_requests_leave_deferred_actions_queued() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	scope.invoke_later(f.left, |_| Ok(Outcome::Continue)).unwrap();
	service_request(&mut scope, f.left, &FormRequest::post()).unwrap();
	assert_eq!(take(&f.log), ["request:left_leaf", "request:left"]);
	drop(scope);
	assert_eq!(session.pending_actions(), 1);
}

#[test]
fn validation_skips_disabled_and_read_only_branches() {
	let f = fixture_with(|name, mut recorder| {
		recorder.capabilities = match name {
			"left" => CapabilitySet::DISABLEABLE,
			"right" => CapabilitySet::INPUT,
			_ => CapabilitySet::empty(),
		};
		recorder
	});
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	scope.set_flag(f.left, ModelFlags::DISABLED, true);
	scope.set_flag(f.right, ModelFlags::READ_ONLY, true);
	let mut diagnostics = Vec::new();
	validate(&mut scope, f.root, &mut diagnostics).unwrap();
	assert_eq!(take(&f.log), ["validate:root"]);

	scope.set_flag(f.left, ModelFlags::DISABLED, false);
	scope.set_flag(f.root, ModelFlags::VALIDATE, false);
	validate(&mut scope, f.root, &mut diagnostics).unwrap();
	assert!(take(&f.log).is_empty());
	scope.set_flag(f.root, ModelFlags::VALIDATE, true);
	validate(&mut scope, f.left_leaf, &mut diagnostics).unwrap();
	assert_eq!(take(&f.log), ["validate:left_leaf"]);
}

#[test]
fn duplicate_id_names_abort_the_paint() {
	let f = fixture();
	let mut session = SessionContext::new();
	let mut scope = Scope::new(&f.tree, &mut session);
	scope.set_id_name(f.root, Some("form")).unwrap();
	scope.set_naming_context(f.root, true).unwrap();
	scope.set_id_name(f.left_leaf, Some("name")).unwrap();
	scope.set_id_name(f.right, Some("name")).unwrap();

	let mut out = String::new();
	let err = paint(&mut scope, f.root, &mut out).unwrap_err();
	assert!(matches!(err, crate::error::ComponentError::DuplicateIdName { .. }));

	// Renaming fixes the next paint; stale registrations are discarded.
	scope.set_id_name(f.right, Some("other")).unwrap();
	let mut out = String::new();
	paint(&mut scope, f.root, &mut out).unwrap();
	paint(&mut scope, f.root, &mut out).unwrap();
}

#[test]
fn repeater_rows_are_visited_in_row_scopes() {
	let tree = ComponentTree::default();
	let root = tree.create(Container);
	let list = tree.create(Repeater::new().with_key_property("id"));
	let row = tree.create(Container);
	let field = tree.create(TextField::bound_to("name"));
	let mut setup = Scope::detached(&tree);
	setup.add(root, list).unwrap();
	setup.add(list, row).unwrap();
	setup.add(row, field).unwrap();
	setup.set_id_name(list, Some("people")).unwrap();
	tree.lock(root);

	let mut session = SessionContext::new();
	let mut scope = Scope::new(&tree, &mut session);
	repeater::set_data(
		&mut scope,
		list,
		vec![json!({ "id": 1, "name": "ada" }), json!({ "id": 2, "name": "bob" })],
	)
	.unwrap();

	prepare_paint(&mut scope, root, &FormRequest::get()).unwrap();
	let mut out = String::new();
	paint(&mut scope, root, &mut out).unwrap();
	assert_eq!(
		out,
		concat!(
			r#"<input type="text" id="people/0_0" name="people/0_0" value="ada"/>"#,
			r#"<input type="text" id="people/1_0" name="people/1_0" value="bob"/>"#,
		)
	);

	let request = FormRequest::post().with("people/1_0", "bea");
	service_request(&mut scope, root, &request).unwrap();
	assert_eq!(
		repeater::beans(&scope, list),
		vec![json!({ "id": 1, "name": "ada" }), json!({ "id": 2, "name": "bea" })]
	);
}
