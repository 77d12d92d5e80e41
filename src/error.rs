//! Error types for ftserver operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::protocol::ProtocolError;
use crate::validation::ValidationError;

/// Top-level server error
///
/// Only startup conditions (bind, config, initial directory scan) reach
/// `main` as a `ServerError`; per-request failures are logged and dropped.
#[derive(Debug)]
pub enum ServerError {
	/// Cannot create or bind the control socket
	BindFailed { address: String, source: io::Error },

	/// Configuration could not be loaded or is invalid
	Config(ConfigError),

	/// Directory inventory failure
	Inventory(InventoryError),

	/// Data channel failure (nested)
	Connection(ConnectionError),

	/// Wire protocol failure (nested)
	Protocol(ProtocolError),

	/// I/O error
	Io(io::Error),
}

impl fmt::Display for ServerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ServerError::BindFailed { address, source } => {
				write!(f, "Cannot bind {}: {}. Try another port number.", address, source)
			}
			ServerError::Config(e) => write!(f, "Configuration error: {}", e),
			ServerError::Inventory(e) => write!(f, "Directory error: {}", e),
			ServerError::Connection(e) => write!(f, "Data connection error: {}", e),
			ServerError::Protocol(e) => write!(f, "Protocol error: {}", e),
			ServerError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for ServerError {}

impl From<io::Error> for ServerError {
	fn from(e: io::Error) -> Self {
		ServerError::Io(e)
	}
}

impl From<ConfigError> for ServerError {
	fn from(e: ConfigError) -> Self {
		ServerError::Config(e)
	}
}

impl From<InventoryError> for ServerError {
	fn from(e: InventoryError) -> Self {
		ServerError::Inventory(e)
	}
}

impl From<ConnectionError> for ServerError {
	fn from(e: ConnectionError) -> Self {
		ServerError::Connection(e)
	}
}

impl From<ProtocolError> for ServerError {
	fn from(e: ProtocolError) -> Self {
		ServerError::Protocol(e)
	}
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
	/// Config file could not be read
	ReadFailed { path: PathBuf, source: io::Error },

	/// Config file could not be parsed
	ParseFailed { path: PathBuf, message: String },

	/// Config file extension is not one of toml/json/json5
	UnsupportedFormat { path: PathBuf },

	/// Environment variable holds an unusable value
	BadEnv { var: String, value: String },

	/// Values are out of range
	Invalid(ValidationError),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::ReadFailed { path, source } => {
				write!(f, "Cannot read {}: {}", path.display(), source)
			}
			ConfigError::ParseFailed { path, message } => {
				write!(f, "Cannot parse {}: {}", path.display(), message)
			}
			ConfigError::UnsupportedFormat { path } => {
				write!(f, "Unsupported config format: {} (use .toml, .json or .json5)", path.display())
			}
			ConfigError::BadEnv { var, value } => write!(f, "Invalid value {:?} for {}", value, var),
			ConfigError::Invalid(e) => write!(f, "{}", e),
		}
	}
}

impl Error for ConfigError {}

impl From<ValidationError> for ConfigError {
	fn from(e: ValidationError) -> Self {
		ConfigError::Invalid(e)
	}
}

/// Directory inventory errors
#[derive(Debug)]
pub enum InventoryError {
	/// The directory cannot be opened or read
	Unreadable { path: PathBuf, source: io::Error },

	/// More entries than the listing bound allows
	TooManyEntries { max: usize },

	/// An entry name exceeds the per-name bound
	NameTooLong { name: String, max: usize },
}

impl fmt::Display for InventoryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			InventoryError::Unreadable { path, source } => {
				write!(f, "Cannot open directory {}: {}", path.display(), source)
			}
			InventoryError::TooManyEntries { max } => {
				write!(f, "Directory holds more than {} entries", max)
			}
			InventoryError::NameTooLong { name, max } => {
				write!(f, "Entry name longer than {} bytes: {}", max, name)
			}
		}
	}
}

impl Error for InventoryError {}

/// Data channel errors
#[derive(Debug)]
pub enum ConnectionError {
	/// Hostname lookup failed
	ResolveFailed { host: String, port: u16, source: io::Error },

	/// The resolver returned no addresses
	NoAddresses { host: String, port: u16 },

	/// Every candidate address failed
	AllCandidatesFailed { endpoint: String, attempts: usize, last: Option<io::Error> },
}

impl fmt::Display for ConnectionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnectionError::ResolveFailed { host, port, source } => {
				write!(f, "Cannot resolve {}:{}: {}", host, port, source)
			}
			ConnectionError::NoAddresses { host, port } => {
				write!(f, "No addresses found for {}:{}", host, port)
			}
			ConnectionError::AllCandidatesFailed { endpoint, attempts, last } => {
				write!(f, "Failed to connect to {} ({} address(es) tried)", endpoint, attempts)?;
				if let Some(e) = last {
					write!(f, ": {}", e)?;
				}
				Ok(())
			}
		}
	}
}

impl Error for ConnectionError {}

/// Client-side errors
#[derive(Debug)]
pub enum ClientError {
	/// Control connection to the server failed
	ConnectFailed { address: String, source: io::Error },

	/// Could not listen on the data port
	ListenFailed { port: u16, source: io::Error },

	/// Refusing to overwrite a local file
	DuplicateFile { path: PathBuf },

	/// Name received from the server cannot be used as a local file name
	UnsafeName { name: String },

	/// Wire protocol failure (nested)
	Protocol(ProtocolError),

	/// I/O error
	Io(io::Error),
}

impl fmt::Display for ClientError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ClientError::ConnectFailed { address, source } => {
				write!(f, "Cannot connect to {}: {}", address, source)
			}
			ClientError::ListenFailed { port, source } => {
				write!(f, "Cannot listen on data port {}: {}", port, source)
			}
			ClientError::DuplicateFile { path } => {
				write!(f, "Duplicate file name: {}", path.display())
			}
			ClientError::UnsafeName { name } => write!(f, "Refusing to save {:?}", name),
			ClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
			ClientError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for ClientError {}

impl From<io::Error> for ClientError {
	fn from(e: io::Error) -> Self {
		ClientError::Io(e)
	}
}

impl From<ProtocolError> for ClientError {
	fn from(e: ProtocolError) -> Self {
		ClientError::Protocol(e)
	}
}


// vim: ts=4
