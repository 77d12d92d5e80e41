//! Logging prelude module for convenient access to tracing macros.
//!
//! Every diagnostic the server prints goes through `tracing`. Peers never see
//! these messages; the wire protocol has no error frame.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Waiting for a connection...");
//! warn!("Invalid file: {}", name);
//! ```

pub use tracing::{debug, error, info, info_span, warn, Instrument};

/// Initialize the tracing subscriber with environment filter support.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used:
///
/// ```bash
/// RUST_LOG=debug ftserver 30021
/// RUST_LOG=ftserver::protocol=trace ftserver 30021
/// ```
pub fn init_tracing(default_level: &str) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

	// A second init (e.g. from tests) is harmless, so ignore the error.
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

// vim: ts=4
