//! Control/data round trip tests
//!
//! Runs a real server on an ephemeral port and talks to it through the
//! client library and through raw sockets.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

use ftserver::client::{self, FileReply, Reply};
use ftserver::protocol::{Command, Framing, FramingMode};
use ftserver::{ClientConfig, Server, ServerConfig};

/// Result type for test operations
type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

/// A server serving its own scratch directory
struct TestServer {
	dir: TempDir,
	addr: SocketAddr,
	framing: FramingMode,
}

impl TestServer {
	async fn start(framing: FramingMode, files: &[(&str, &str)]) -> TestResult<Self> {
		Self::start_with(framing, files, |_| {}).await
	}

	async fn start_with<F>(framing: FramingMode, files: &[(&str, &str)], tweak: F) -> TestResult<Self>
	where
		F: FnOnce(&mut ServerConfig),
	{
		let dir = TempDir::new()?;
		for (name, content) in files {
			std::fs::write(dir.path().join(name), content)?;
		}

		let mut config = ServerConfig {
			bind_address: "127.0.0.1".to_string(),
			root: dir.path().to_path_buf(),
			framing,
			..ServerConfig::default()
		};
		tweak(&mut config);

		let server = Server::bind(0, config).await?;
		let addr = server.local_addr()?;
		tokio::spawn(server.run());
		Ok(TestServer { dir, addr, framing })
	}

	fn path(&self) -> &Path {
		self.dir.path()
	}

	fn client_config(&self) -> ClientConfig {
		ClientConfig { framing: self.framing, ..ClientConfig::default() }
	}

	async fn request(&self, command: &Command) -> TestResult<Reply> {
		let reply =
			client::request("127.0.0.1", self.addr.port(), 0, None, command, &self.client_config()).await?;
		Ok(reply)
	}

	/// Send a raw command line and return every byte that arrives on the data connection
	async fn raw(&self, command_line: &str) -> TestResult<Vec<u8>> {
		let data_listener = TcpListener::bind("127.0.0.1:0").await?;
		let data_port = data_listener.local_addr()?.port();
		let mut control = TcpStream::connect(self.addr).await?;

		let framing = self.client_config().framing();
		let port = data_port.to_string();
		for field in ["127.0.0.1", port.as_str(), command_line] {
			framing.write_message(&mut control, field.as_bytes()).await?;
		}

		let (mut data, _) = tokio::time::timeout(Duration::from_secs(10), data_listener.accept()).await??;
		let mut received = Vec::new();
		data.read_to_end(&mut received).await?;
		Ok(received)
	}
}

fn get(name: &str) -> Command {
	Command::GetFile { name: name.to_string() }
}

#[tokio::test]
async fn test_list_returns_every_entry() -> TestResult<()> {
	let server =
		TestServer::start(FramingMode::LengthPrefixed, &[("a.txt", "a"), ("b.txt", "bb")]).await?;
	std::fs::create_dir(server.path().join("subdir"))?;

	match server.request(&Command::ListDirectory).await? {
		Reply::Listing(mut names) => {
			names.sort();
			assert_eq!(names, vec!["a.txt", "b.txt", "subdir"]);
		}
		other => panic!("expected a listing, got {:?}", other),
	}
	Ok(())
}

#[tokio::test]
async fn test_list_empty_directory() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[]).await?;
	assert_eq!(server.request(&Command::ListDirectory).await?, Reply::Listing(vec![]));
	Ok(())
}

#[tokio::test]
async fn test_get_existing_file() -> TestResult<()> {
	let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
	let server = TestServer::start(FramingMode::LengthPrefixed, &[]).await?;
	std::fs::write(server.path().join("blob.bin"), &content)?;

	assert_eq!(server.request(&get("blob.bin")).await?, Reply::File(FileReply::Valid(content)));
	Ok(())
}

#[tokio::test]
async fn test_get_empty_file() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[("empty", "")]).await?;
	assert_eq!(server.request(&get("empty")).await?, Reply::File(FileReply::Valid(vec![])));
	Ok(())
}

#[tokio::test]
async fn test_get_missing_file_is_invalid() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[("present.txt", "x")]).await?;
	assert_eq!(server.request(&get("absent.txt")).await?, Reply::File(FileReply::Invalid));
	Ok(())
}

#[tokio::test]
async fn test_rescan_sees_files_added_after_startup() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[]).await?;
	std::fs::write(server.path().join("late.txt"), b"late")?;
	assert_eq!(server.request(&get("late.txt")).await?, Reply::File(FileReply::Valid(b"late".to_vec())));
	Ok(())
}

#[tokio::test]
async fn test_startup_snapshot_when_rescan_disabled() -> TestResult<()> {
	let server = TestServer::start_with(FramingMode::LengthPrefixed, &[], |c| {
		c.rescan_each_request = false
	})
	.await?;
	std::fs::write(server.path().join("late.txt"), b"late")?;
	assert_eq!(server.request(&get("late.txt")).await?, Reply::File(FileReply::Invalid));
	assert_eq!(server.request(&Command::ListDirectory).await?, Reply::Listing(vec![]));
	Ok(())
}

#[tokio::test]
async fn test_unknown_verb_closes_data_connection_silently() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[("a.txt", "a")]).await?;
	assert!(server.raw("-x a.txt").await?.is_empty());

	// The server keeps serving afterwards
	assert_eq!(server.request(&get("a.txt")).await?, Reply::File(FileReply::Valid(b"a".to_vec())));
	Ok(())
}

#[tokio::test]
async fn test_paced_framing_wire_bytes() -> TestResult<()> {
	let server = TestServer::start(FramingMode::Paced, &[("hello.txt", "hello world")]).await?;
	assert_eq!(server.raw("-g hello.txt").await?, b"VALID11hello world");
	assert_eq!(server.raw("-g nope").await?, b"INVALID");
	assert_eq!(server.raw("-l").await?, b"1hello.txt");
	Ok(())
}

#[tokio::test]
async fn test_blank_command_closes_data_connection_silently() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[("a.txt", "a")]).await?;
	assert!(server.raw("   ").await?.is_empty());
	assert!(server.raw("").await?.is_empty());
	Ok(())
}

#[tokio::test]
async fn test_default_configuration_round_trip() -> TestResult<()> {
	let dir = TempDir::new()?;
	let mut expected = Vec::new();
	for i in 0..12 {
		let name = format!("f{}.txt", i);
		std::fs::write(dir.path().join(&name), format!("contents of file {}\n", i))?;
		expected.push(name);
	}
	expected.sort();

	let config = ServerConfig {
		bind_address: "127.0.0.1".to_string(),
		root: dir.path().to_path_buf(),
		..ServerConfig::default()
	};
	assert_eq!(config.framing, FramingMode::Paced);
	let server = Server::bind(0, config).await?;
	let port = server.local_addr()?.port();
	tokio::spawn(server.run());

	let client_config = ClientConfig::default();
	let fetch = get("f7.txt");
	for _ in 0..5 {
		match client::request("127.0.0.1", port, 0, None, &Command::ListDirectory, &client_config).await? {
			Reply::Listing(mut names) => {
				names.sort();
				assert_eq!(names, expected);
			}
			other => panic!("expected a listing, got {:?}", other),
		}

		let reply = client::request("127.0.0.1", port, 0, None, &fetch, &client_config).await?;
		assert_eq!(reply, Reply::File(FileReply::Valid(b"contents of file 7\n".to_vec())));
	}
	Ok(())
}

#[tokio::test]
async fn test_paced_client_round_trip() -> TestResult<()> {
	let server = TestServer::start(FramingMode::Paced, &[("one", "1"), ("two", "22")]).await?;

	match server.request(&Command::ListDirectory).await? {
		Reply::Listing(mut names) => {
			names.sort();
			assert_eq!(names, vec!["one", "two"]);
		}
		other => panic!("expected a listing, got {:?}", other),
	}
	assert_eq!(server.request(&get("two")).await?, Reply::File(FileReply::Valid(b"22".to_vec())));
	Ok(())
}

#[tokio::test]
async fn test_unreachable_data_port_does_not_stop_the_server() -> TestResult<()> {
	let server = TestServer::start(FramingMode::LengthPrefixed, &[("a.txt", "a")]).await?;

	// Reserve a port, then close it so the connect-back is refused
	let closed_port = TcpListener::bind("127.0.0.1:0").await?.local_addr()?.port();
	let mut control = TcpStream::connect(server.addr).await?;
	let framing = Framing::length_prefixed();
	let port = closed_port.to_string();
	for field in ["127.0.0.1", port.as_str(), "-l"] {
		framing.write_message(&mut control, field.as_bytes()).await?;
	}
	let mut rest = Vec::new();
	control.read_to_end(&mut rest).await?;
	assert!(rest.is_empty());

	assert_eq!(server.request(&get("a.txt")).await?, Reply::File(FileReply::Valid(b"a".to_vec())));
	Ok(())
}

#[tokio::test]
async fn test_concurrent_clients_with_several_permits() -> TestResult<()> {
	let server = TestServer::start_with(
		FramingMode::LengthPrefixed,
		&[("a", "alpha"), ("b", "beta")],
		|c| c.max_clients = 4,
	)
	.await?;

	let (get_a, get_b) = (get("a"), get("b"));
	let (a, b) = tokio::join!(server.request(&get_a), server.request(&get_b));
	assert_eq!(a?, Reply::File(FileReply::Valid(b"alpha".to_vec())));
	assert_eq!(b?, Reply::File(FileReply::Valid(b"beta".to_vec())));
	Ok(())
}
