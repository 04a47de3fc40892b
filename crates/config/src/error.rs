//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or structure.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A separator could appear inside a generated or developer id.
	#[error("invalid {name} separator {value:?}: it may appear inside an id-name")]
	InvalidSeparator {
		/// Which separator was rejected.
		name: &'static str,
		/// The rejected character.
		value: char,
	},

	/// Context and framework separators must differ.
	#[error("context and framework separators are both {0:?}")]
	SeparatorClash(char),

	/// The root prefix is not a valid id-name.
	#[error("invalid root prefix: {0}")]
	InvalidRootPrefix(#[from] trellis_primitives::IdNameError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
