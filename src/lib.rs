//! # ftserver - Two-Socket File Access Server
//!
//! A client connects to the control port and sends its hostname, a data port
//! and a command (`-l` or `-g <file>`). The server connects back to the
//! client's data port and answers over that second connection: a directory
//! listing, or a status token followed by the file's size and bytes.
//!
//! ## Serving a directory
//!
//! ```rust,ignore
//! use ftserver::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig { root: "/srv/files".into(), ..ServerConfig::default() };
//!     Server::bind(30021, config).await?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Fetching a file
//!
//! ```rust,ignore
//! use ftserver::client::{self, FileReply, Reply};
//! use ftserver::protocol::Command;
//!
//! let command = Command::GetFile { name: "notes.txt".to_string() };
//! let reply = client::request("flip1", 30021, 30020, None, &command, &Default::default()).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod protocol;
pub mod serve;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, ServerConfig};
pub use error::{ClientError, ConfigError, ConnectionError, InventoryError, ServerError};
pub use inventory::DirectoryListing;
pub use serve::Server;

// vim: ts=4
