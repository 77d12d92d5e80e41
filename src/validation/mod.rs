//! Centralized validation for request fields and configuration
//!
//! Fixed-capacity fields are checked here and oversized or malformed values
//! are rejected rather than truncated:
//! - Request validation (hostname, data port, command line, entry names)
//! - Configuration validation (chunk size, entry bound, pacing, workers)

use std::error::Error;
use std::fmt;

pub mod config;
pub mod request;

pub use config::*;
pub use request::*;

/// Generic validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// A field exceeds its maximum size
	TooLong { field: &'static str, len: usize, max: usize },
	/// A required field is empty
	Empty { field: &'static str },
	/// A field has the wrong shape (e.g. non-digit port)
	Malformed { field: &'static str, message: String },
	/// Invalid configuration
	ConfigError(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::TooLong { field, len, max } => {
				write!(f, "{} is {} bytes, maximum is {}", field, len, max)
			}
			ValidationError::Empty { field } => write!(f, "{} is empty", field),
			ValidationError::Malformed { field, message } => {
				write!(f, "Malformed {}: {}", field, message)
			}
			ValidationError::ConfigError(msg) => write!(f, "Config validation error: {}", msg),
		}
	}
}

impl Error for ValidationError {}

/// Trait for validatable types
pub trait Validator {
	/// Returns Ok(()) if valid, Err(ValidationError) if invalid
	fn validate(&self) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validation_error_display() {
		let err = ValidationError::TooLong { field: "hostname", len: 60, max: 50 };
		assert_eq!(err.to_string(), "hostname is 60 bytes, maximum is 50");

		let err = ValidationError::ConfigError("test error".to_string());
		assert!(err.to_string().contains("Config validation error"));
	}

	#[test]
	fn test_validation_error_equality() {
		let err1 = ValidationError::Empty { field: "command" };
		let err2 = ValidationError::Empty { field: "command" };
		assert_eq!(err1, err2);
	}
}

// vim: ts=4
