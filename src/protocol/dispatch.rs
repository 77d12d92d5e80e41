//! Command dispatcher
//!
//! Parses the command line, validates `-g` targets against the listing taken
//! for this request and drives the transfer engine. Unknown verbs are only
//! logged: the peer gets no bytes and sees the data connection close.

use std::path::PathBuf;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::traits::{DataConnector, ProtocolResult};
use super::transfer::TransferEngine;
use super::types::{ClientRequest, Command, CommandError, TransferStatus};
use crate::error::ServerError;
use crate::inventory::DirectoryListing;
use crate::logging::*;

/// What a dispatched request did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
	/// Listing sent with this many entries
	Listed { entries: usize },
	/// `VALID` followed by the whole file
	FileSent { name: String, bytes: u64 },
	/// `INVALID` sent, nothing else
	FileMissing { name: String },
	/// Command not understood; nothing sent
	Rejected(CommandError),
}

pub struct CommandDispatcher<C> {
	connector: C,
	engine: TransferEngine,
	root: PathBuf,
}

impl<C: DataConnector> CommandDispatcher<C> {
	/// `root` is the directory the listing was taken from
	pub fn new(connector: C, engine: TransferEngine, root: impl Into<PathBuf>) -> Self {
		Self { connector, engine, root: root.into() }
	}

	/// Open the data connection back to the peer and dispatch on it
	///
	/// The data connection is opened for every request, including ones whose
	/// command turns out to be invalid, and is closed before returning.
	pub async fn handle(
		&self,
		request: &ClientRequest,
		listing: &DirectoryListing,
	) -> Result<DispatchOutcome, ServerError> {
		let mut data = self.connector.connect(&request.peer_hostname, request.data_port).await?;
		let outcome = self.dispatch(&request.command_line, &mut data, listing).await;
		let _ = data.shutdown().await;
		Ok(outcome?)
	}

	/// Connect to the peer's data port and close again without sending
	pub async fn refuse(&self, request: &ClientRequest) {
		match self.connector.connect(&request.peer_hostname, request.data_port).await {
			Ok(mut data) => {
				let _ = data.shutdown().await;
			}
			Err(e) => warn!("{}", e),
		}
	}

	/// Run one command line against an open data connection
	pub async fn dispatch<W>(
		&self,
		command_line: &str,
		data: &mut W,
		listing: &DirectoryListing,
	) -> ProtocolResult<DispatchOutcome>
	where
		W: AsyncWrite + Unpin,
	{
		let command = match Command::parse(command_line) {
			Ok(command) => command,
			Err(e) => {
				warn!("{}", e);
				return Ok(DispatchOutcome::Rejected(e));
			}
		};

		match command {
			Command::ListDirectory => {
				let entries = self.engine.send_listing(data, listing).await?;
				Ok(DispatchOutcome::Listed { entries })
			}
			Command::GetFile { name } => {
				if !listing.contains(&name) {
					warn!("Invalid file: {} does not exist", name);
					self.engine.send_status(data, TransferStatus::Invalid).await?;
					return Ok(DispatchOutcome::FileMissing { name });
				}
				self.engine.send_status(data, TransferStatus::Valid).await?;
				let bytes = self.engine.send_file(data, &self.root.join(&name)).await?;
				Ok(DispatchOutcome::FileSent { name, bytes })
			}
		}
	}
}


// vim: ts=4
