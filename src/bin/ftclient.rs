use clap::{Arg, ArgAction, ArgGroup, Command as ClapCommand};
use std::error::Error;

use ftserver::client::{self, FileReply, Reply};
use ftserver::logging;
use ftserver::protocol::{Command, FramingMode};
use ftserver::validation as validate;
use ftserver::ClientConfig;

fn port_arg(name: &'static str, help: &'static str) -> Arg {
	Arg::new(name)
		.required(true)
		.value_parser(|s: &str| validate::parse_data_port(s).map_err(|e| e.to_string()))
		.help(help)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = ClapCommand::new("ftclient")
		.version(env!("CARGO_PKG_VERSION"))
		.about("List or fetch files from an ftserver")
		.arg(Arg::new("server").required(true).value_name("SERVER_HOST").help("Server hostname"))
		.arg(port_arg("server-port", "Server control port"))
		.arg(Arg::new("list").short('l').action(ArgAction::SetTrue).help("List the server directory"))
		.arg(Arg::new("get").short('g').value_name("FILE").help("Fetch FILE"))
		.group(ArgGroup::new("command").args(["list", "get"]).required(true))
		.arg(port_arg("data-port", "Local port the server connects back to"))
		.arg(
			Arg::new("framing")
				.long("framing")
				.value_name("MODE")
				.value_parser(|s: &str| s.parse::<FramingMode>())
				.help("Wire framing: paced or length-prefixed"),
		)
		.arg(
			Arg::new("advertise")
				.long("advertise")
				.value_name("HOST")
				.help("Hostname sent to the server for the data connection"),
		)
		.arg(
			Arg::new("overwrite")
				.long("overwrite")
				.action(ArgAction::SetTrue)
				.help("Replace an existing local file"),
		)
		.get_matches();

	logging::init_tracing("warn");

	let server = matches.get_one::<String>("server").ok_or("server host required")?;
	let server_port = *matches.get_one::<u16>("server-port").ok_or("server port required")?;
	let data_port = *matches.get_one::<u16>("data-port").ok_or("data port required")?;

	let mut config = ClientConfig::default();
	if let Some(framing) = matches.get_one::<FramingMode>("framing") {
		config.framing = *framing;
	}
	if matches.get_flag("overwrite") {
		config.refuse_overwrite = false;
	}

	let command = match matches.get_one::<String>("get") {
		Some(name) => Command::GetFile { name: name.clone() },
		None => Command::ListDirectory,
	};

	let advertise = matches.get_one::<String>("advertise").map(String::as_str);
	let reply = match client::request(server, server_port, data_port, advertise, &command, &config).await {
		Ok(reply) => reply,
		Err(e) => {
			eprintln!("{}", e);
			std::process::exit(1);
		}
	};

	match (reply, &command) {
		(Reply::Listing(names), _) => {
			println!("Receiving directory structure from {}:{}", server, data_port);
			for name in names {
				println!("{}", name);
			}
		}
		(Reply::File(FileReply::Invalid), Command::GetFile { name }) => {
			eprintln!("{}:{} says FILE NOT FOUND: {}", server, data_port, name);
			std::process::exit(1);
		}
		(Reply::File(FileReply::Valid(content)), Command::GetFile { name }) => {
			println!("Receiving \"{}\" from {}:{}", name, server, data_port);
			let dir = std::env::current_dir()?;
			match client::save_file(&dir, name, &content, config.refuse_overwrite) {
				Ok(path) => println!("File transfer complete: {}", path.display()),
				Err(e) => {
					eprintln!("{}", e);
					std::process::exit(1);
				}
			}
		}
		(Reply::File(_), Command::ListDirectory) => return Err("unexpected file reply".into()),
	}
	Ok(())
}

// vim: ts=4
