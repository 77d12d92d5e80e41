//! Two-socket control/data protocol
//!
//! A client opens the control connection and sends three messages: its
//! hostname, a data port and a command line. The server then connects back
//! to `hostname:dataport` and streams the answer over that second socket.
//!
//! # Example Usage
//!
//! ```ignore
//! use ftserver::protocol::{control, CommandDispatcher, Framing, TcpConnector, TransferEngine};
//!
//! let request = control::read_request(&mut control_stream, &framing).await?;
//! let dispatcher = CommandDispatcher::new(TcpConnector::default(), engine, ".");
//! let outcome = dispatcher.handle(&request, &listing).await?;
//! ```

pub mod control;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod framing;
pub mod traits;
pub mod transfer;
pub mod types;

// Re-export public API
pub use data::TcpConnector;
pub use dispatch::{CommandDispatcher, DispatchOutcome};
pub use error::ProtocolError;
pub use framing::{Framing, FramingMode};
pub use traits::{DataConnector, ProtocolResult};
pub use transfer::TransferEngine;
pub use types::{ClientRequest, Command, CommandError, TransferStatus};

// vim: ts=4
