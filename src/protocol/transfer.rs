//! Transfer engine
//!
//! Writes listings and file contents onto an already-open data connection.
//! Listing: count message, then one message per entry name.
//! File: byte-count message, then exactly that many raw bytes in chunks.

use std::io;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::ProtocolError;
use super::framing::Framing;
use super::traits::ProtocolResult;
use super::types::TransferStatus;
use crate::inventory::DirectoryListing;
use crate::logging::*;

#[derive(Debug, Clone, Copy)]
pub struct TransferEngine {
	framing: Framing,
	chunk_size: usize,
}

impl TransferEngine {
	pub fn new(framing: Framing, chunk_size: usize) -> Self {
		Self { framing, chunk_size: chunk_size.max(1) }
	}

	pub fn framing(&self) -> &Framing {
		&self.framing
	}

	/// Send the entry count followed by every entry name in listing order
	pub async fn send_listing<W>(&self, writer: &mut W, listing: &DirectoryListing) -> ProtocolResult<usize>
	where
		W: AsyncWrite + Unpin,
	{
		info!("Sending directory list ({} entries)", listing.len());
		self.framing.write_message(writer, listing.len().to_string().as_bytes()).await?;
		for name in listing.entries() {
			self.framing.write_message(writer, name.as_bytes()).await?;
		}
		info!("Directory list sent");
		Ok(listing.len())
	}

	/// Send a VALID/INVALID token
	pub async fn send_status<W>(&self, writer: &mut W, status: TransferStatus) -> ProtocolResult<()>
	where
		W: AsyncWrite + Unpin,
	{
		self.framing.write_message(writer, status.as_str().as_bytes()).await
	}

	/// Send the byte count and contents of `path`
	///
	/// The header carries the true file length. If the file shrinks while it
	/// is being sent or a read fails, the transfer stops and the error is
	/// returned; nothing is reported to the peer.
	pub async fn send_file<W>(&self, writer: &mut W, path: &Path) -> ProtocolResult<u64>
	where
		W: AsyncWrite + Unpin,
	{
		info!("Sending file {}", path.display());
		let mut file = tokio::fs::File::open(path).await?;
		let metadata = file.metadata().await?;
		if !metadata.is_file() {
			error!("{} is not a regular file", path.display());
			return Err(ProtocolError::Other(format!("{} is not a regular file", path.display())));
		}
		let size = metadata.len();
		self.framing.write_message(writer, size.to_string().as_bytes()).await?;

		let mut buf = vec![0u8; self.chunk_size];
		let mut remaining = size;
		while remaining > 0 {
			let want = remaining.min(buf.len() as u64) as usize;
			let n = match file.read(&mut buf[..want]).await {
				Ok(0) => {
					error!(
						"File {} ended {} bytes short of its announced size",
						path.display(),
						remaining
					);
					return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "file shrank during transfer")
						.into());
				}
				Ok(n) => n,
				Err(e) => {
					error!("Error reading from file {}: {}", path.display(), e);
					return Err(e.into());
				}
			};
			// write_all retries partial writes until the chunk is flushed
			writer.write_all(&buf[..n]).await?;
			remaining -= n as u64;
		}
		writer.flush().await?;

		info!("File sent ({} bytes)", size);
		Ok(size)
	}
}


// vim: ts=4
