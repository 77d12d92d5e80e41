//! Protocol error types
//!
//! Errors raised while reading or writing either channel. None of these are
//! ever sent to the peer.

use std::fmt;
use std::io;

use crate::validation::ValidationError;

/// Protocol error type
#[derive(Debug)]
pub enum ProtocolError {
	/// I/O error from async operations
	Io(io::Error),
	/// Peer closed the connection before a message arrived
	UnexpectedEof { field: &'static str },
	/// A length-prefixed frame announced more bytes than the field allows
	FrameTooLarge { field: &'static str, len: usize, max: usize },
	/// Message bytes are not valid UTF-8
	NotUtf8 { field: &'static str },
	/// A field failed validation
	Invalid(ValidationError),
	/// Protocol violation (unexpected format or state)
	ProtocolViolation(String),
	/// Generic error message
	Other(String),
}

impl fmt::Display for ProtocolError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProtocolError::Io(e) => write!(f, "I/O error: {}", e),
			ProtocolError::UnexpectedEof { field } => {
				write!(f, "Connection closed while waiting for {}", field)
			}
			ProtocolError::FrameTooLarge { field, len, max } => {
				write!(f, "Frame for {} is {} bytes, maximum is {}", field, len, max)
			}
			ProtocolError::NotUtf8 { field } => write!(f, "{} is not valid UTF-8", field),
			ProtocolError::Invalid(e) => write!(f, "{}", e),
			ProtocolError::ProtocolViolation(msg) => write!(f, "Protocol violation: {}", msg),
			ProtocolError::Other(msg) => write!(f, "{}", msg),
		}
	}
}

impl std::error::Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
	fn from(e: io::Error) -> Self {
		ProtocolError::Io(e)
	}
}

impl From<ValidationError> for ProtocolError {
	fn from(e: ValidationError) -> Self {
		ProtocolError::Invalid(e)
	}
}

// vim: ts=4
