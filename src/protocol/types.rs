//! Protocol data types shared by server and client

use std::fmt;

/// Maximum bytes of the hostname field on the control channel
pub const HOSTNAME_LEN: usize = 50;

/// Maximum bytes of the data-port field on the control channel
pub const PORT_LEN: usize = 6;

/// Maximum bytes of the command line and of a single entry name
pub const MAX_FILENAME: usize = 256;

/// Default bound on the number of directory entries
pub const MAX_ENTRIES: usize = 100;

/// Default file chunk size for the transfer engine
pub const CHUNK_SIZE: usize = 4096;

/// Operation code requesting a directory listing
pub const LIST_VERB: &str = "-l";

/// Operation code requesting a file
pub const GET_VERB: &str = "-g";

/// The three control-channel fields, in wire order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientRequest {
	pub peer_hostname: String,
	pub data_port: u16,
	pub command_line: String,
}

/// Parsed command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	ListDirectory,
	GetFile { name: String },
}

impl Command {
	/// Parse a command line. Tokens are separated by whitespace; trailing
	/// tokens after `-l` and after the `-g` filename are ignored.
	pub fn parse(line: &str) -> Result<Command, CommandError> {
		let mut tokens = line.split_whitespace();
		match tokens.next() {
			Some(LIST_VERB) => Ok(Command::ListDirectory),
			Some(GET_VERB) => match tokens.next() {
				Some(name) => Ok(Command::GetFile { name: name.to_string() }),
				None => Err(CommandError::MissingFilename),
			},
			Some(other) => Err(CommandError::UnknownVerb(other.to_string())),
			None => Err(CommandError::Empty),
		}
	}

	/// Render the command line the way the client sends it
	pub fn to_line(&self) -> String {
		match self {
			Command::ListDirectory => LIST_VERB.to_string(),
			Command::GetFile { name } => format!("{} {}", GET_VERB, name),
		}
	}
}

/// Why a command line was not dispatched
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
	Empty,
	UnknownVerb(String),
	MissingFilename,
}

impl fmt::Display for CommandError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CommandError::Empty => write!(f, "empty command"),
			CommandError::UnknownVerb(verb) => write!(f, "Invalid command {}", verb),
			CommandError::MissingFilename => write!(f, "{} requires a file name", GET_VERB),
		}
	}
}

impl std::error::Error for CommandError {}

/// Status token sent before a file transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
	Valid,
	Invalid,
}

impl TransferStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			TransferStatus::Valid => "VALID",
			TransferStatus::Invalid => "INVALID",
		}
	}

	pub fn parse(token: &str) -> Option<TransferStatus> {
		match token.trim() {
			"VALID" => Some(TransferStatus::Valid),
			"INVALID" => Some(TransferStatus::Invalid),
			_ => None,
		}
	}
}

impl fmt::Display for TransferStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}


// vim: ts=4
