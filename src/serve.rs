//! Connection loop
//!
//! wait for control connection -> read request -> open data connection ->
//! dispatch -> close both -> repeat.
//!
//! A semaphore permit is taken before each `accept`, so with the default of
//! one permit a client is fully served before the next one is accepted.
//! Errors after startup only end the current request.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::inventory::{self, DirectoryListing};
use crate::logging::*;
use crate::protocol::{control, CommandDispatcher, DataConnector, DispatchOutcome, Framing};
use crate::protocol::{TcpConnector, TransferEngine};

/// Pause before calling `accept` again after it failed
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// State shared by every request
struct Shared<C> {
	config: ServerConfig,
	framing: Framing,
	dispatcher: CommandDispatcher<C>,
	/// Listing taken at startup, used when per-request rescans are off
	snapshot: DirectoryListing,
}

pub struct Server<C> {
	listener: TcpListener,
	shared: Arc<Shared<C>>,
}

impl Server<TcpConnector> {
	/// Bind the control port and take the startup directory snapshot
	///
	/// Both failures are fatal: the caller is expected to exit.
	pub async fn bind(port: u16, config: ServerConfig) -> Result<Self, ServerError> {
		let address = format!("{}:{}", config.bind_address, port);
		let listener = TcpListener::bind(&address)
			.await
			.map_err(|e| ServerError::BindFailed { address: address.clone(), source: e })?;
		let connector = TcpConnector::new(config.connect_timeout());
		Server::with_connector(listener, config, connector)
	}
}

impl<C: DataConnector + 'static> Server<C> {
	/// Build a server on an existing listener with a custom data connector
	pub fn with_connector(
		listener: TcpListener,
		config: ServerConfig,
		connector: C,
	) -> Result<Self, ServerError> {
		let snapshot = inventory::scan(&config.root, config.max_entries)?;
		info!("Serving {} ({} entries)", config.root.display(), snapshot.len());

		let framing = config.framing();
		let engine = TransferEngine::new(framing, config.chunk_size);
		let dispatcher = CommandDispatcher::new(connector, engine, config.root.clone());
		Ok(Server { listener, shared: Arc::new(Shared { config, framing, dispatcher, snapshot }) })
	}

	pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
		self.listener.local_addr()
	}

	/// Accept and serve clients until the process is killed
	pub async fn run(self) -> Result<(), ServerError> {
		let local = self.listener.local_addr()?;
		let max_clients = self.shared.config.max_clients.max(1);
		info!(
			"Listening on {} (framing: {}, max clients: {})",
			local, self.shared.config.framing, max_clients
		);

		let permits = Arc::new(Semaphore::new(max_clients));
		let mut next_id: u64 = 0;

		loop {
			let permit = permits.clone().acquire_owned().await.map_err(|e| {
				ServerError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
			})?;

			info!("Waiting for a connection...");
			let listener = &self.listener;
			let (stream, peer) =
				accept_retrying(move || control::accept_one(listener), ACCEPT_RETRY_DELAY).await;

			next_id += 1;
			let span = info_span!("request", id = next_id, peer = %peer);
			let shared = self.shared.clone();
			tokio::spawn(
				async move {
					match shared.serve_connection(stream).await {
						Ok(outcome) => info!("Request complete: {:?}", outcome),
						Err(e) => error!("Request failed: {}", e),
					}
					// control and data sockets are closed by now
					drop(permit);
				}
				.instrument(span),
			);
		}
	}
}

/// Accept the next connection, pausing after each failure
///
/// Accept errors such as running out of file descriptors tend to repeat
/// until some connection closes.
async fn accept_retrying<F, Fut, T>(mut accept: F, retry_delay: Duration) -> T
where
	F: FnMut() -> Fut,
	Fut: Future<Output = std::io::Result<T>>,
{
	loop {
		match accept().await {
			Ok(accepted) => return accepted,
			Err(e) => {
				warn!("Accept failed: {}, retrying in {:?}", e, retry_delay);
				tokio::time::sleep(retry_delay).await;
			}
		}
	}
}

impl<C: DataConnector> Shared<C> {
	fn listing(&self) -> Result<DirectoryListing, ServerError> {
		if self.config.rescan_each_request {
			Ok(inventory::scan(&self.config.root, self.config.max_entries)?)
		} else {
			Ok(self.snapshot.clone())
		}
	}

	async fn serve_connection(&self, mut control_stream: TcpStream) -> Result<DispatchOutcome, ServerError> {
		let request = control::read_request(&mut control_stream, &self.framing).await?;

		let listing = match self.listing() {
			Ok(listing) => listing,
			Err(e) => {
				// Unblock the peer's data listener before giving up
				self.dispatcher.refuse(&request).await;
				return Err(e);
			}
		};

		self.dispatcher.handle(&request, &listing).await
	}
}


// vim: ts=4
