//! Property access on row data.
//!
//! Paths are dot-separated: `owner.address.city`. Array elements are
//! addressed by index: `lines.0.amount`.

use serde_json::Value;

/// Reads and writes properties of row data by path.
///
/// Failures are logged and reported as "no value"; they never abort a
/// traversal.
pub trait PropertyAccess: Send + Sync {
	/// Returns the value at `path`, or `None` if it cannot be read.
	fn get(&self, object: &Value, path: &str) -> Option<Value>;

	/// Writes `value` at `path`. Returns false if it cannot be written.
	fn set(&self, object: &mut Value, path: &str, value: Value) -> bool;
}

/// [`PropertyAccess`] over JSON objects and arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProperties;

fn step<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
	match value {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	}
}

fn step_mut<'v>(value: &'v mut Value, segment: &str) -> Option<&'v mut Value> {
	match value {
		Value::Object(map) => map.get_mut(segment),
		Value::Array(items) => segment
			.parse::<usize>()
			.ok()
			.and_then(|i| items.get_mut(i)),
		_ => None,
	}
}

impl PropertyAccess for JsonProperties {
	fn get(&self, object: &Value, path: &str) -> Option<Value> {
		let found = path
			.split('.')
			.try_fold(object, |value, segment| step(value, segment))
			.cloned();
		if found.is_none() {
			tracing::error!(path, "cannot read property");
		}
		found
	}

	fn set(&self, object: &mut Value, path: &str, value: Value) -> bool {
		let (parent_path, last) = match path.rsplit_once('.') {
			Some((parent, last)) => (Some(parent), last),
			None => (None, path),
		};
		let parent = match parent_path {
			Some(parent_path) => parent_path
				.split('.')
				.try_fold(object, |value, segment| step_mut(value, segment)),
			None => Some(object),
		};
		let written = match parent {
			Some(Value::Object(map)) => {
				map.insert(last.to_owned(), value);
				true
			}
			Some(Value::Array(items)) => match last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
				Some(slot) => {
					*slot = value;
					true
				}
				None => false,
			},
			_ => false,
		};
		if !written {
			tracing::error!(path, "cannot write property");
		}
		written
	}
}
