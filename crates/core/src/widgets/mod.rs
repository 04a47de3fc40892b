//! Reference widgets.
//!
//! Enough components to build and exercise real trees: a naming-context
//! [`Container`], static [`Text`], a bean-bound [`TextField`], a [`Button`]
//! that runs its action after the request pass, and a [`Pager`].

mod button;
mod container;
mod pager;
mod text;
mod text_field;

use std::borrow::Cow;

pub use button::Button;
pub use container::Container;
pub use pager::Pager;
pub use text::Text;
pub use text_field::TextField;

/// Attribute holding a widget's text or value.
pub const TEXT_ATTRIBUTE: &str = "text";

/// Escapes text for markup output.
pub fn escape(text: &str) -> Cow<'_, str> {
	if !text.contains(['&', '<', '>', '"']) {
		return Cow::Borrowed(text);
	}
	let mut out = String::with_capacity(text.len() + 8);
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			other => out.push(other),
		}
	}
	Cow::Owned(out)
}
