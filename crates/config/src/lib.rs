//! Configuration for the trellis component model.
//!
//! Configuration is written in TOML. Every key is optional; missing keys take
//! the defaults documented on each field.
//!
//! ```toml
//! [ids]
//! check-duplicates = true
//! context-separator = "/"
//! framework-separator = "_"
//! root-prefix = "id"
//!
//! [session]
//! compact-default-models = true
//! ```

mod error;

use std::path::Path;

use serde::{Deserialize, Serialize};
use trellis_primitives::IdName;

pub use error::{ConfigError, Result};


/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Component id generation and checking.
	pub ids: IdConfig,
	/// Per-session state handling.
	pub session: SessionConfig,
}

/// Settings for id generation and duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IdConfig {
	/// Fail the paint when two components share an id-name in one naming context.
	pub check_duplicates: bool,
	/// Joins a naming context's id and a child's id-name. Defaults to `/`.
	pub context_separator: char,
	/// Joins a named or root prefix and a generated index. Defaults to `_`.
	pub framework_separator: char,
	/// Positional id of a component without a parent. Defaults to `id`.
	pub root_prefix: String,
}

impl Default for IdConfig {
	fn default() -> Self {
		Self {
			check_duplicates: true,
			context_separator: '/',
			framework_separator: '_',
			root_prefix: "id".to_string(),
		}
	}
}

/// Settings for session model handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SessionConfig {
	/// Drop session models that match their shared model after each request.
	pub compact_default_models: bool,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			compact_default_models: true,
		}
	}
}

impl Config {
	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Checks that generated ids stay unambiguous under these settings.
	pub fn validate(&self) -> Result<()> {
		let ids = &self.ids;
		// '_' may follow a generated index but never splits a naming context.
		let context = ids.context_separator;
		if context.is_ascii_alphanumeric() || context == '_' {
			return Err(ConfigError::InvalidSeparator {
				name: "context",
				value: context,
			});
		}
		let framework = ids.framework_separator;
		if framework.is_ascii_alphanumeric() {
			return Err(ConfigError::InvalidSeparator {
				name: "framework",
				value: framework,
			});
		}
		if ids.context_separator == ids.framework_separator {
			return Err(ConfigError::SeparatorClash(ids.context_separator));
		}
		IdName::parse(ids.root_prefix.as_str())?;
		Ok(())
	}
}
