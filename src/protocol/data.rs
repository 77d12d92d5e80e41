//! Data channel factory
//!
//! The server acts as a TCP client here: it resolves the host the peer
//! advertised and tries each address in resolver order until one accepts.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;

use super::traits::DataConnector;
use crate::error::ConnectionError;
use crate::logging::*;

/// Connects the data channel over TCP, IPv4 or IPv6
#[derive(Debug, Clone)]
pub struct TcpConnector {
	connect_timeout: Duration,
}

impl TcpConnector {
	pub fn new(connect_timeout: Duration) -> Self {
		Self { connect_timeout }
	}
}

impl Default for TcpConnector {
	fn default() -> Self {
		Self::new(Duration::from_secs(5))
	}
}

#[async_trait]
impl DataConnector for TcpConnector {
	type Stream = TcpStream;

	async fn connect(&self, host: &str, port: u16) -> Result<TcpStream, ConnectionError> {
		let candidates: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
			.await
			.map_err(|e| ConnectionError::ResolveFailed { host: host.to_string(), port, source: e })?
			.collect();

		if candidates.is_empty() {
			return Err(ConnectionError::NoAddresses { host: host.to_string(), port });
		}

		connect_any(candidates, &format!("{}:{}", host, port), self.connect_timeout).await
	}
}

/// Try each address in order and return the first stream that connects
///
/// Sockets of failed attempts are dropped before the next attempt starts.
pub async fn connect_any<I>(
	candidates: I,
	endpoint: &str,
	connect_timeout: Duration,
) -> Result<TcpStream, ConnectionError>
where
	I: IntoIterator<Item = SocketAddr>,
{
	let mut attempts = 0;
	let mut last = None;

	for addr in candidates {
		attempts += 1;
		debug!("Data connect attempt {} to {} ({})", attempts, endpoint, addr);
		match tokio::time::timeout(connect_timeout, TcpStream::connect(addr)).await {
			Ok(Ok(stream)) => {
				let _ = stream.set_nodelay(true);
				debug!("Data connection established with {}", addr);
				return Ok(stream);
			}
			Ok(Err(e)) => {
				debug!("Data connect to {} failed: {}", addr, e);
				last = Some(e);
			}
			Err(_) => {
				debug!("Data connect to {} timed out after {:?}", addr, connect_timeout);
				last = Some(std::io::Error::new(
					std::io::ErrorKind::TimedOut,
					format!("connect timeout ({} ms)", connect_timeout.as_millis()),
				));
			}
		}
	}

	Err(ConnectionError::AllCandidatesFailed { endpoint: endpoint.to_string(), attempts, last })
}


// vim: ts=4
