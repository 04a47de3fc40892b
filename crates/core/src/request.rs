//! Submitted request data.

use std::collections::BTreeMap;

/// Read-only view of a submitted request.
pub trait Request {
	/// Returns the first value of a parameter.
	fn parameter(&self, name: &str) -> Option<&str> {
		self.parameters(name).first().copied()
	}

	/// Returns every value of a parameter, in submission order.
	fn parameters(&self, name: &str) -> Vec<&str>;

	/// HTTP method, upper case.
	fn method(&self) -> &str;

	/// Returns true if the method is the one conventionally used to change
	/// state. Actions that mutate state only run on such requests.
	fn is_mutating(&self) -> bool {
		self.method().eq_ignore_ascii_case("POST")
	}
}

/// A request held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
	method: String,
	params: BTreeMap<String, Vec<String>>,
}

impl FormRequest {
	/// Creates a request with `method` and no parameters.
	pub fn new(method: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			params: BTreeMap::new(),
		}
	}

	/// Creates an empty `GET` request.
	pub fn get() -> Self {
		Self::new("GET")
	}

	/// Creates an empty `POST` request.
	pub fn post() -> Self {
		Self::new("POST")
	}

	/// Appends a parameter value.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.entry(name.into()).or_default().push(value.into());
		self
	}
}

impl Request for FormRequest {
	fn parameters(&self, name: &str) -> Vec<&str> {
		self.params
			.get(name)
			.map(|values| values.iter().map(String::as_str).collect())
			.unwrap_or_default()
	}

	fn method(&self) -> &str {
		&self.method
	}
}
