//! Seams between the dispatcher and the network
//!
//! The data channel is opened by the server toward the address the client
//! advertised. The connection loop receives that capability as a
//! `DataConnector` instead of owning a second listener, so tests can swap in
//! their own connector.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use super::error::ProtocolError;
use crate::error::ConnectionError;

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Outbound connection capability used for the data channel
#[async_trait]
pub trait DataConnector: Send + Sync {
	/// Stream type produced by a successful connect
	type Stream: AsyncWrite + Unpin + Send;

	/// Open a new connection to `host:port`
	async fn connect(&self, host: &str, port: u16) -> Result<Self::Stream, ConnectionError>;
}

// vim: ts=4
