//! Request field validation functions

use super::ValidationError;
use crate::protocol::types::{HOSTNAME_LEN, MAX_FILENAME, PORT_LEN};

fn validate_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::Empty { field });
	}
	if value.len() > max {
		return Err(ValidationError::TooLong { field, len: value.len(), max });
	}
	Ok(())
}

/// Validate the peer hostname advertised on the control channel
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
	validate_len("hostname", hostname, HOSTNAME_LEN)?;
	if hostname.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(ValidationError::Malformed {
			field: "hostname",
			message: format!("{:?} contains whitespace or control characters", hostname),
		});
	}
	Ok(())
}

/// Validate and parse the data port field
///
/// The field must be 1 to `PORT_LEN` decimal digits naming a non-zero port.
pub fn parse_data_port(port: &str) -> Result<u16, ValidationError> {
	validate_len("data port", port, PORT_LEN)?;
	if !port.bytes().all(|b| b.is_ascii_digit()) {
		return Err(ValidationError::Malformed {
			field: "data port",
			message: format!("{:?} is not a decimal number", port),
		});
	}
	match port.parse::<u16>() {
		Ok(0) | Err(_) => Err(ValidationError::Malformed {
			field: "data port",
			message: format!("{} is not a valid TCP port", port),
		}),
		Ok(p) => Ok(p),
	}
}

/// Validate the command line
///
/// Only the length is checked. Blank lines pass so the dispatcher can treat
/// them like any other unknown command.
pub fn validate_command_line(line: &str) -> Result<(), ValidationError> {
	if line.len() > MAX_FILENAME {
		return Err(ValidationError::TooLong { field: "command", len: line.len(), max: MAX_FILENAME });
	}
	Ok(())
}

/// Validate a directory entry name
pub fn validate_entry_name(name: &str) -> Result<(), ValidationError> {
	validate_len("entry name", name, MAX_FILENAME)
}


// vim: ts=4
