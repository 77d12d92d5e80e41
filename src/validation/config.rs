//! Configuration validation functions

use super::ValidationError;

/// Largest accepted file chunk (1 MiB)
pub const MAX_CHUNK_SIZE: usize = 1 << 20;

/// Largest accepted pacing delay (one second)
pub const MAX_PACING_MICROS: u64 = 1_000_000;

/// Validate the file streaming chunk size
pub fn validate_chunk_size(chunk_size: usize) -> Result<(), ValidationError> {
	if chunk_size == 0 {
		return Err(ValidationError::ConfigError("chunk size must be greater than 0".to_string()));
	}
	if chunk_size > MAX_CHUNK_SIZE {
		return Err(ValidationError::ConfigError(format!(
			"chunk size must be at most {}, got {}",
			MAX_CHUNK_SIZE, chunk_size
		)));
	}
	Ok(())
}

/// Validate the directory listing bound
pub fn validate_max_entries(max_entries: usize) -> Result<(), ValidationError> {
	if max_entries == 0 {
		return Err(ValidationError::ConfigError("max entries must be greater than 0".to_string()));
	}
	Ok(())
}

/// Validate the paced-framing delay
pub fn validate_pacing_micros(pacing: u64) -> Result<(), ValidationError> {
	if pacing > MAX_PACING_MICROS {
		return Err(ValidationError::ConfigError(format!(
			"pacing too large: {} microseconds (max {})",
			pacing, MAX_PACING_MICROS
		)));
	}
	Ok(())
}

/// Validate the number of requests served at once
pub fn validate_max_clients(count: usize) -> Result<(), ValidationError> {
	if count == 0 {
		return Err(ValidationError::ConfigError("max clients must be at least 1".to_string()));
	}
	if count > 1024 {
		return Err(ValidationError::ConfigError(format!("max clients too high: {}", count)));
	}
	Ok(())
}

/// Validate the data-channel connect timeout
pub fn validate_connect_timeout_ms(timeout_ms: u64) -> Result<(), ValidationError> {
	if timeout_ms == 0 {
		return Err(ValidationError::ConfigError("connect timeout must be greater than 0".to_string()));
	}
	Ok(())
}


// vim: ts=4
