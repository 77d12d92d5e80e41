//! Client side of the control/data protocol
//!
//! The client listens on its data port, connects to the server's control
//! port, sends hostname, data port and command, then accepts the connection
//! the server opens back and reads the reply from it.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::logging::*;
use crate::protocol::framing::Framing;
use crate::protocol::types::{Command, TransferStatus, MAX_FILENAME};
use crate::protocol::{ProtocolError, ProtocolResult};

/// Capacity of the count / byte-count messages
const NUMBER_LEN: usize = 20;

/// Capacity of the status token message
const STATUS_LEN: usize = 10;

/// Answer to a `-g` request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileReply {
	Invalid,
	Valid(Vec<u8>),
}

/// Answer to any request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
	Listing(Vec<String>),
	File(FileReply),
}

/// Send the three request messages
///
/// Only the gaps between messages are paced; the command goes out last and
/// the caller can start accepting the data connection right away.
pub async fn send_request<W>(
	writer: &mut W,
	framing: &Framing,
	hostname: &str,
	data_port: u16,
	command: &Command,
) -> ProtocolResult<()>
where
	W: AsyncWrite + Unpin,
{
	framing.write_message(writer, hostname.as_bytes()).await?;
	framing.write_message(writer, data_port.to_string().as_bytes()).await?;
	framing.write_final(writer, command.to_line().as_bytes()).await?;
	Ok(())
}

async fn read_number<R>(reader: &mut R, framing: &Framing, field: &'static str) -> ProtocolResult<u64>
where
	R: AsyncRead + Unpin,
{
	let text = framing.read_text(reader, NUMBER_LEN, field).await?;
	text.trim()
		.parse()
		.map_err(|_| ProtocolError::ProtocolViolation(format!("{} is not a number: {:?}", field, text)))
}

/// Read a listing: entry count, then that many names
pub async fn receive_listing<R>(reader: &mut R, framing: &Framing) -> ProtocolResult<Vec<String>>
where
	R: AsyncRead + Unpin,
{
	let count = read_number(reader, framing, "entry count").await?;
	let mut names = Vec::new();
	for _ in 0..count {
		names.push(framing.read_text(reader, MAX_FILENAME, "entry name").await?);
	}
	Ok(names)
}

/// Read a file reply: status, and for `VALID` the byte count and bytes
pub async fn receive_file<R>(reader: &mut R, framing: &Framing) -> ProtocolResult<FileReply>
where
	R: AsyncRead + Unpin,
{
	let token = framing.read_text(reader, STATUS_LEN, "status").await?;
	match TransferStatus::parse(&token) {
		Some(TransferStatus::Invalid) => return Ok(FileReply::Invalid),
		Some(TransferStatus::Valid) => {}
		None => {
			return Err(ProtocolError::ProtocolViolation(format!("unknown status token {:?}", token)))
		}
	}

	let size = read_number(reader, framing, "file size").await?;
	let mut content = Vec::new();
	reader.take(size).read_to_end(&mut content).await?;
	if (content.len() as u64) < size {
		return Err(ProtocolError::UnexpectedEof { field: "file content" });
	}
	Ok(FileReply::Valid(content))
}

/// Write a received file as `dir/name`
pub fn save_file(dir: &Path, name: &str, content: &[u8], refuse_overwrite: bool) -> Result<PathBuf, ClientError> {
	let mut components = Path::new(name).components();
	let single = matches!(
		(components.next(), components.next()),
		(Some(std::path::Component::Normal(_)), None)
	);
	if !single {
		return Err(ClientError::UnsafeName { name: name.to_string() });
	}

	let path = dir.join(name);
	if refuse_overwrite && path.exists() {
		return Err(ClientError::DuplicateFile { path });
	}
	std::fs::write(&path, content)?;
	Ok(path)
}

/// Run one request against `server:server_port`
///
/// `data_port` 0 picks an ephemeral port. The advertised hostname defaults
/// to the local address of the control connection.
pub async fn request(
	server: &str,
	server_port: u16,
	data_port: u16,
	advertise: Option<&str>,
	command: &Command,
	config: &ClientConfig,
) -> Result<Reply, ClientError> {
	let framing = config.framing();
	let address = format!("{}:{}", server, server_port);

	let mut control = TcpStream::connect((server, server_port))
		.await
		.map_err(|e| ClientError::ConnectFailed { address: address.clone(), source: e })?;
	let local_ip = control.local_addr()?.ip();

	let unspecified: IpAddr = match local_ip {
		IpAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
		IpAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
	};
	let data_listener = TcpListener::bind(SocketAddr::new(unspecified, data_port))
		.await
		.map_err(|e| ClientError::ListenFailed { port: data_port, source: e })?;
	let data_port = data_listener.local_addr()?.port();

	let hostname = advertise.map(str::to_string).unwrap_or_else(|| local_ip.to_string());
	debug!("Requesting {:?} from {}, data channel {}:{}", command, address, hostname, data_port);
	send_request(&mut control, &framing, &hostname, data_port, command).await?;

	let (mut data, peer) = data_listener.accept().await?;
	debug!("Data connection from {}", peer);

	let reply = match command {
		Command::ListDirectory => Reply::Listing(receive_listing(&mut data, &framing).await?),
		Command::GetFile { .. } => Reply::File(receive_file(&mut data, &framing).await?),
	};
	Ok(reply)
}


// vim: ts=4
