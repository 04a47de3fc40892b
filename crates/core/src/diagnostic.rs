//! Validation diagnostics.

use std::fmt;

use trellis_primitives::ComponentId;

use crate::model::Message;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
	/// Informational; the input is accepted.
	Info,
	/// Suspicious input that is still accepted.
	Warning,
	/// Invalid input.
	Error,
}

/// One validation finding about a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// The component the finding is about.
	pub component: ComponentId,
	/// Its rendered id when validated, so repeated rows can be told apart.
	pub rendered_id: String,
	/// Severity.
	pub severity: Severity,
	/// Human-readable message.
	pub message: Message,
}

impl Diagnostic {
	/// Creates an error diagnostic.
	pub fn error(component: ComponentId, rendered_id: String, message: impl Into<Message>) -> Self {
		Self {
			component,
			rendered_id,
			severity: Severity::Error,
			message: message.into(),
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?} {}: {}", self.severity, self.rendered_id, self.message)
	}
}
