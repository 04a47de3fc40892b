//! Output sinks and per-kind renderers.

use trellis_primitives::ComponentId;

use crate::error::Result;
use crate::scope::Scope;

/// Destination of painted output. The format is up to the renderers.
pub trait RenderContext {
	/// Appends text to the output.
	fn write(&mut self, text: &str);
}

impl RenderContext for String {
	fn write(&mut self, text: &str) {
		self.push_str(text);
	}
}

/// Paints the body of components of one kind.
pub trait Renderer: Send + Sync {
	/// Paints `id`. Renderers decide themselves whether to paint children,
	/// usually through [`crate::traversal::paint_children`].
	fn render(&self, scope: &mut Scope<'_>, id: ComponentId, out: &mut dyn RenderContext)
	-> Result<()>;
}

impl<F> Renderer for F
where
	F: Fn(&mut Scope<'_>, ComponentId, &mut dyn RenderContext) -> Result<()> + Send + Sync,
{
	fn render(
		&self,
		scope: &mut Scope<'_>,
		id: ComponentId,
		out: &mut dyn RenderContext,
	) -> Result<()> {
		self(scope, id, out)
	}
}
