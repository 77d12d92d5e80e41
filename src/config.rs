//! Configuration for the server and client binaries
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (`ServerConfig::default()`)
//! 2. Config file (`--config`, `.toml` or `.json`/`.json5`)
//! 3. Environment variables (`FTSERVER_*` prefix)
//! 4. CLI flags (highest priority, applied by `main`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::protocol::framing::{Framing, FramingMode};
use crate::protocol::types::{CHUNK_SIZE, MAX_ENTRIES};
use crate::validation::{self, ValidationError, Validator};

/// Environment variable prefix for server settings
pub const ENV_PREFIX: &str = "FTSERVER_";

// ============================================================================
// SERVER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
	/// Address the control listener binds to; the port comes from the CLI
	pub bind_address: String,

	/// Directory whose entries are listed and served
	pub root: PathBuf,

	/// Maximum number of entries in a listing
	pub max_entries: usize,

	/// Read size when streaming a file
	pub chunk_size: usize,

	/// Delay after every message in paced framing (microseconds)
	pub pacing_micros: u64,

	/// Wire framing for both channels
	pub framing: FramingMode,

	/// Re-scan the directory for every request instead of once at startup
	pub rescan_each_request: bool,

	/// Requests served at the same time (1 = strictly one after another)
	pub max_clients: usize,

	/// Timeout for each data-channel connect attempt (milliseconds)
	pub connect_timeout_ms: u64,

	/// Default tracing filter when RUST_LOG is not set
	pub log_level: String,
}

impl Default for ServerConfig {
	fn default() -> Self {
		ServerConfig {
			bind_address: "0.0.0.0".to_string(),
			root: PathBuf::from("."),
			max_entries: MAX_ENTRIES,
			chunk_size: CHUNK_SIZE,
			pacing_micros: 100,
			framing: FramingMode::Paced,
			rescan_each_request: true,
			max_clients: 1,
			connect_timeout_ms: 5000,
			log_level: "info".to_string(),
		}
	}
}

impl ServerConfig {
	/// Load defaults, then the optional file, then `FTSERVER_*` variables
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut config = match path {
			Some(p) => Self::from_file(p)?,
			None => Self::default(),
		};
		config.apply_env(|var| std::env::var(var).ok())?;
		Ok(config)
	}

	/// Parse a `.toml`, `.json` or `.json5` file; missing keys keep defaults
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)
			.map_err(|e| ConfigError::ReadFailed { path: path.to_path_buf(), source: e })?;
		let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
		let parse_err =
			|message: String| ConfigError::ParseFailed { path: path.to_path_buf(), message };

		match ext.as_deref() {
			Some("toml") => toml::from_str(&text).map_err(|e| parse_err(e.to_string())),
			Some("json") | Some("json5") => json5::from_str(&text).map_err(|e| parse_err(e.to_string())),
			_ => Err(ConfigError::UnsupportedFormat { path: path.to_path_buf() }),
		}
	}

	/// Override fields from environment variables
	///
	/// `lookup` maps a variable name to its value, so tests can supply their
	/// own environment.
	pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| {
			let var = format!("{}{}", ENV_PREFIX, key);
			lookup(&var).map(|value| (var, value))
		};

		if let Some((_, value)) = get("ROOT") {
			self.root = PathBuf::from(value);
		}
		if let Some((_, value)) = get("BIND_ADDRESS") {
			self.bind_address = value;
		}
		if let Some((var, value)) = get("FRAMING") {
			self.framing = value.parse().map_err(|_| ConfigError::BadEnv { var, value })?;
		}
		if let Some((var, value)) = get("MAX_CLIENTS") {
			self.max_clients = value.trim().parse().map_err(|_| ConfigError::BadEnv { var, value })?;
		}
		if let Some((var, value)) = get("PACING_MICROS") {
			self.pacing_micros =
				value.trim().parse().map_err(|_| ConfigError::BadEnv { var, value })?;
		}
		if let Some((_, value)) = get("LOG_LEVEL") {
			self.log_level = value;
		}
		Ok(())
	}

	pub fn framing(&self) -> Framing {
		match self.framing {
			FramingMode::Paced => Framing::paced(Duration::from_micros(self.pacing_micros)),
			FramingMode::LengthPrefixed => Framing::length_prefixed(),
		}
	}

	pub fn connect_timeout(&self) -> Duration {
		Duration::from_millis(self.connect_timeout_ms)
	}
}

impl Validator for ServerConfig {
	fn validate(&self) -> Result<(), ValidationError> {
		validation::validate_chunk_size(self.chunk_size)?;
		validation::validate_max_entries(self.max_entries)?;
		validation::validate_pacing_micros(self.pacing_micros)?;
		validation::validate_max_clients(self.max_clients)?;
		validation::validate_connect_timeout_ms(self.connect_timeout_ms)?;
		Ok(())
	}
}

// ============================================================================
// CLIENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
	/// Wire framing; must match the server
	pub framing: FramingMode,

	/// Delay between the three request messages (milliseconds)
	pub request_pacing_ms: u64,

	/// Refuse to overwrite an existing local file on `-g`
	pub refuse_overwrite: bool,
}

impl Default for ClientConfig {
	fn default() -> Self {
		ClientConfig { framing: FramingMode::Paced, request_pacing_ms: 50, refuse_overwrite: true }
	}
}

impl ClientConfig {
	pub fn framing(&self) -> Framing {
		match self.framing {
			FramingMode::Paced => Framing::paced(Duration::from_millis(self.request_pacing_ms)),
			FramingMode::LengthPrefixed => Framing::length_prefixed(),
		}
	}
}


// vim: ts=4
