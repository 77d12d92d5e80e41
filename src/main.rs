use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::path::PathBuf;

use ftserver::logging::{self, *};
use ftserver::protocol::FramingMode;
use ftserver::validation::{self as validate, Validator};
use ftserver::{ConfigError, Server, ServerConfig};

/// Load the config file and environment, then apply command line flags
fn build_config(matches: &clap::ArgMatches) -> Result<ServerConfig, ConfigError> {
	let config_path = matches.get_one::<String>("config").map(PathBuf::from);
	let mut config = ServerConfig::load(config_path.as_deref())?;

	if let Some(root) = matches.get_one::<String>("root") {
		config.root = PathBuf::from(root);
	}
	if let Some(framing) = matches.get_one::<FramingMode>("framing") {
		config.framing = *framing;
	}
	if let Some(bind) = matches.get_one::<String>("bind") {
		config.bind_address = bind.clone();
	}
	if let Some(max_clients) = matches.get_one::<usize>("max-clients") {
		config.max_clients = *max_clients;
	}

	config.validate()?;
	Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = Command::new("ftserver")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Serve directory listings and files over a control/data socket pair")
		.arg(
			Arg::new("port")
				.required(true)
				.value_name("PORT")
				.value_parser(|s: &str| validate::parse_data_port(s).map_err(|e| e.to_string()))
				.help("Control port to listen on"),
		)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.help("Configuration file (.toml, .json or .json5)"),
		)
		.arg(Arg::new("root").short('r').long("root").value_name("DIR").help("Directory to serve"))
		.arg(
			Arg::new("framing")
				.long("framing")
				.value_name("MODE")
				.value_parser(|s: &str| s.parse::<FramingMode>())
				.help("Wire framing: paced or length-prefixed"),
		)
		.arg(Arg::new("bind").long("bind").value_name("ADDR").help("Address to bind"))
		.arg(
			Arg::new("max-clients")
				.long("max-clients")
				.value_name("N")
				.value_parser(clap::value_parser!(usize))
				.help("Requests served at the same time"),
		)
		.arg(
			Arg::new("dump-config")
				.long("dump-config")
				.action(ArgAction::SetTrue)
				.help("Print the effective configuration as JSON and exit"),
		)
		.get_matches();

	let port = *matches.get_one::<u16>("port").ok_or("port argument required")?;

	let config = match build_config(&matches) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("{}", e);
			std::process::exit(1);
		}
	};

	if matches.get_flag("dump-config") {
		println!("{}", serde_json::to_string_pretty(&config)?);
		return Ok(());
	}

	logging::init_tracing(&config.log_level);

	let server = match Server::bind(port, config).await {
		Ok(server) => server,
		Err(e) => {
			error!("{}", e);
			std::process::exit(1);
		}
	};

	if let Err(e) = server.run().await {
		error!("{}", e);
		std::process::exit(1);
	}
	Ok(())
}

// vim: ts=4
