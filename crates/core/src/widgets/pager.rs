use serde_json::Value;
use trellis_primitives::ComponentId;

use crate::error::Result;
use crate::render::RenderContext;
use crate::request::Request;
use crate::scope::Scope;
use crate::traversal::Outcome;
use crate::tree::Component;

const PAGE: &str = "page";
const PAGE_COUNT: &str = "page_count";

/// Page selector.
///
/// Reads the requested page index from the parameter named by its rendered
/// id. Unparseable or out-of-range pages are logged and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager;

impl Pager {
	/// Current page index.
	pub fn page(scope: &Scope<'_>, id: ComponentId) -> usize {
		read_index(scope, id, PAGE).unwrap_or(0)
	}

	/// Number of pages.
	pub fn page_count(scope: &Scope<'_>, id: ComponentId) -> usize {
		read_index(scope, id, PAGE_COUNT).unwrap_or(1)
	}

	/// Sets the number of pages, moving to the last page if the current one
	/// no longer exists.
	pub fn set_page_count(scope: &mut Scope<'_>, id: ComponentId, count: usize) {
		let count = count.max(1);
		scope.set_attribute(id, PAGE_COUNT, Value::from(count));
		if Self::page(scope, id) >= count {
			scope.set_attribute(id, PAGE, Value::from(count - 1));
		}
	}
}

fn read_index(scope: &Scope<'_>, id: ComponentId, name: &str) -> Option<usize> {
	scope
		.attribute(id, name)
		.and_then(|v| v.as_u64())
		.and_then(|n| usize::try_from(n).ok())
}

impl Component for Pager {
	fn kind(&self) -> &'static str {
		"pager"
	}

	fn handle_request(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		request: &dyn Request,
	) -> Result<Outcome> {
		let name = scope.id(id);
		let Some(raw) = request.parameter(&name) else {
			return Ok(Outcome::Continue);
		};
		let page = match raw.trim().parse::<usize>() {
			Ok(page) => page,
			Err(err) => {
				tracing::warn!(component = %id, value = raw, error = %err, "ignoring unparseable page");
				return Ok(Outcome::Continue);
			}
		};
		let count = Self::page_count(scope, id);
		if page >= count {
			tracing::warn!(component = %id, page, count, "ignoring out-of-range page");
			return Ok(Outcome::Continue);
		}
		if page != Self::page(scope, id) {
			scope.set_attribute(id, PAGE, Value::from(page));
		}
		Ok(Outcome::Continue)
	}

	fn paint_body(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		let name = scope.id(id);
		let page = Self::page(scope, id);
		let count = Self::page_count(scope, id);
		out.write(&format!(
			"<nav id=\"{name}\">{} / {count}</nav>",
			page + 1
		));
		Ok(())
	}
}
