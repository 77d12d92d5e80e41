//! Control channel
//!
//! A request is three messages read in strict order: peer hostname, data
//! port, command line. With paced framing each field is exactly one
//! fixed-capacity read; partial reads are not reassembled.

use std::net::SocketAddr;
use tokio::io::AsyncRead;
use tokio::net::{TcpListener, TcpStream};

use super::framing::Framing;
use super::traits::ProtocolResult;
use super::types::{ClientRequest, HOSTNAME_LEN, MAX_FILENAME, PORT_LEN};
use crate::logging::*;
use crate::validation;

/// Accept a single control connection
pub async fn accept_one(listener: &TcpListener) -> std::io::Result<(TcpStream, SocketAddr)> {
	let (stream, peer) = listener.accept().await?;
	info!("Connection established with {}", peer.ip());
	Ok((stream, peer))
}

/// Read hostname, data port and command line from the control connection
pub async fn read_request<R>(reader: &mut R, framing: &Framing) -> ProtocolResult<ClientRequest>
where
	R: AsyncRead + Unpin,
{
	let hostname = framing.read_text(reader, HOSTNAME_LEN, "hostname").await?;
	let hostname = hostname.trim().to_string();
	validation::validate_hostname(&hostname)?;
	debug!("Client hostname: {}", hostname);

	let port = framing.read_text(reader, PORT_LEN, "data port").await?;
	let data_port = validation::parse_data_port(port.trim())?;
	debug!("Client data port: {}", data_port);

	let command_line = framing.read_text(reader, MAX_FILENAME, "command").await?;
	validation::validate_command_line(&command_line)?;
	debug!("Client command: {}", command_line.trim());

	Ok(ClientRequest { peer_hostname: hostname, data_port, command_line })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protocol::ProtocolError;
	use std::time::Duration;

	async fn framed(fields: &[&[u8]]) -> Vec<u8> {
		let framing = Framing::length_prefixed();
		let mut wire = Vec::new();
		for f in fields {
			framing.write_message(&mut wire, f).await.unwrap();
		}
		wire
	}

	#[tokio::test]
	async fn test_reads_three_fields_in_order() {
		let wire = framed(&[b"flip1", b"30020", b"-g notes.txt"]).await;
		let request = read_request(&mut &wire[..], &Framing::length_prefixed()).await.unwrap();
		assert_eq!(
			request,
			ClientRequest {
				peer_hostname: "flip1".to_string(),
				data_port: 30020,
				command_line: "-g notes.txt".to_string(),
			}
		);
	}

	#[tokio::test]
	async fn test_paced_fields_arrive_as_separate_reads() {
		let (mut client, mut server) = tokio::io::duplex(1024);
		let writer = tokio::spawn(async move {
			let framing = Framing::paced(Duration::from_millis(20));
			let fields: [&[u8]; 3] = [b"localhost", b"40001", b"-l"];
			for f in fields {
				framing.write_message(&mut client, f).await.unwrap();
			}
			client
		});

		let request = read_request(&mut server, &Framing::paced(Duration::ZERO)).await.unwrap();
		assert_eq!(request.peer_hostname, "localhost");
		assert_eq!(request.data_port, 40001);
		assert_eq!(request.command_line, "-l");
		drop(writer.await.unwrap());
	}

	#[tokio::test]
	async fn test_rejects_oversized_hostname_frame() {
		let long = vec![b'h'; HOSTNAME_LEN + 1];
		let wire = framed(&[&long, b"30020", b"-l"]).await;
		let err = read_request(&mut &wire[..], &Framing::length_prefixed()).await.unwrap_err();
		assert!(matches!(err, ProtocolError::FrameTooLarge { field: "hostname", .. }));
	}

	#[tokio::test]
	async fn test_rejects_bad_port() {
		let wire = framed(&[b"flip1", b"port", b"-l"]).await;
		let err = read_request(&mut &wire[..], &Framing::length_prefixed()).await.unwrap_err();
		assert!(matches!(err, ProtocolError::Invalid(_)));
	}

	#[tokio::test]
	async fn test_blank_command_is_passed_through() {
		for blank in [&b"   "[..], &b""[..]] {
			let wire = framed(&[b"flip1", b"30020", blank]).await;
			let request = read_request(&mut &wire[..], &Framing::length_prefixed()).await.unwrap();
			assert_eq!(request.command_line.as_bytes(), blank);
			assert_eq!(request.data_port, 30020);
		}
	}

	#[tokio::test]
	async fn test_eof_before_command() {
		let wire = framed(&[b"flip1", b"30020"]).await;
		let err = read_request(&mut &wire[..], &Framing::length_prefixed()).await.unwrap_err();
		assert!(matches!(err, ProtocolError::UnexpectedEof { field: "command" }));
	}
}

// vim: ts=4
