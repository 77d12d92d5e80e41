//! Message framing for both channels
//!
//! The legacy wire format has no framing at all: every message is one bare
//! send, and the receiver takes whatever one receive call returns. Writers
//! space messages with a short delay so the peer can tell them apart.
//! `LengthPrefixed` replaces the timing trick with a 4-byte big-endian
//! length in front of each message. A connection uses exactly one mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::ProtocolError;
use super::traits::ProtocolResult;

/// Framing selector as it appears in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FramingMode {
	/// Unframed messages separated by a pacing delay (reference client)
	#[default]
	Paced,
	/// u32 big-endian length + payload
	LengthPrefixed,
}

impl FromStr for FramingMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"paced" => Ok(FramingMode::Paced),
			"length-prefixed" | "framed" => Ok(FramingMode::LengthPrefixed),
			other => Err(format!("unknown framing {:?} (expected paced or length-prefixed)", other)),
		}
	}
}

impl fmt::Display for FramingMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FramingMode::Paced => f.write_str("paced"),
			FramingMode::LengthPrefixed => f.write_str("length-prefixed"),
		}
	}
}

/// Framing mode plus the pacing delay used by `Paced`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
	pub mode: FramingMode,
	pub pacing: Duration,
}

impl Framing {
	pub fn paced(pacing: Duration) -> Self {
		Framing { mode: FramingMode::Paced, pacing }
	}

	pub fn length_prefixed() -> Self {
		Framing { mode: FramingMode::LengthPrefixed, pacing: Duration::ZERO }
	}

	/// Write one message and flush it
	///
	/// In paced mode the call returns only after the pacing delay, so the
	/// next message cannot merge with this one.
	pub async fn write_message<W>(&self, writer: &mut W, payload: &[u8]) -> ProtocolResult<()>
	where
		W: AsyncWrite + Unpin,
	{
		self.write_final(writer, payload).await?;
		if self.mode == FramingMode::Paced && !self.pacing.is_zero() {
			tokio::time::sleep(self.pacing).await;
		}
		Ok(())
	}

	/// Write the last message of a sequence, without the pacing delay
	pub async fn write_final<W>(&self, writer: &mut W, payload: &[u8]) -> ProtocolResult<()>
	where
		W: AsyncWrite + Unpin,
	{
		match self.mode {
			FramingMode::Paced => {
				writer.write_all(payload).await?;
				writer.flush().await?;
			}
			FramingMode::LengthPrefixed => {
				let len = u32::try_from(payload.len()).map_err(|_| {
					ProtocolError::ProtocolViolation(format!(
						"message of {} bytes does not fit a frame",
						payload.len()
					))
				})?;
				writer.write_all(&len.to_be_bytes()).await?;
				writer.write_all(payload).await?;
				writer.flush().await?;
			}
		}
		Ok(())
	}

	/// Read one message of at most `max` bytes
	///
	/// `Paced` performs a single read of up to `max` bytes and keeps whatever
	/// arrived; it never waits for more. `LengthPrefixed` reads exactly one
	/// frame and rejects frames larger than `max`.
	pub async fn read_message<R>(
		&self,
		reader: &mut R,
		max: usize,
		field: &'static str,
	) -> ProtocolResult<Vec<u8>>
	where
		R: AsyncRead + Unpin,
	{
		match self.mode {
			FramingMode::Paced => {
				let mut buf = vec![0u8; max];
				let n = reader.read(&mut buf).await?;
				if n == 0 {
					return Err(ProtocolError::UnexpectedEof { field });
				}
				buf.truncate(n);
				Ok(buf)
			}
			FramingMode::LengthPrefixed => {
				let mut hdr = [0u8; 4];
				read_exact_or_eof(reader, &mut hdr, field).await?;
				let len = u32::from_be_bytes(hdr) as usize;
				if len > max {
					return Err(ProtocolError::FrameTooLarge { field, len, max });
				}
				let mut buf = vec![0u8; len];
				read_exact_or_eof(reader, &mut buf, field).await?;
				Ok(buf)
			}
		}
	}

	/// Read one message and decode it as UTF-8 text
	pub async fn read_text<R>(
		&self,
		reader: &mut R,
		max: usize,
		field: &'static str,
	) -> ProtocolResult<String>
	where
		R: AsyncRead + Unpin,
	{
		let bytes = self.read_message(reader, max, field).await?;
		decode_text(bytes, field)
	}
}

/// Decode message bytes, dropping the NUL padding C peers may leave behind
pub fn decode_text(mut bytes: Vec<u8>, field: &'static str) -> ProtocolResult<String> {
	if let Some(end) = bytes.iter().position(|&b| b == 0) {
		bytes.truncate(end);
	}
	String::from_utf8(bytes).map_err(|_| ProtocolError::NotUtf8 { field })
}

async fn read_exact_or_eof<R>(reader: &mut R, buf: &mut [u8], field: &'static str) -> ProtocolResult<()>
where
	R: AsyncRead + Unpin,
{
	match reader.read_exact(buf).await {
		Ok(_) => Ok(()),
		Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
			Err(ProtocolError::UnexpectedEof { field })
		}
		Err(e) => Err(e.into()),
	}
}


// vim: ts=4
