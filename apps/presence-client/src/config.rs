use clap::Parser;
use presence_wire::Record;
use std::net::IpAddr;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Presence and data protocol client", long_about = None)]
pub struct Cli {
	/// Server address
	#[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
	pub host: IpAddr,

	/// Server port (unprivileged range only)
	#[arg(long, env = "SERVER_PORT", default_value_t = 5555, value_parser = clap::value_parser!(u16).range(1024..))]
	pub port: u16,

	/// Surname for a one-shot data record; enables the send
	#[arg(long, requires = "phone")]
	pub surname: Option<String>,

	/// Phone number for the record
	#[arg(long, requires = "surname")]
	pub phone: Option<String>,

	/// Age for the record
	#[arg(long, default_value_t = 25, value_parser = clap::value_parser!(i64).range(18..=100))]
	pub age: i64,

	/// Specialization code (1 Networks, 2 Databases, 3 Cybersecurity, 4 Cloud Computing)
	#[arg(long, default_value_t = 1)]
	pub spec_code: i64,

	/// Free-text description, up to 255 characters
	#[arg(long, default_value = "")]
	pub description: String,

	/// Log level
	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	pub log_level: tracing::Level,
}

impl Cli {
	/// The one-shot record to submit, when the record flags were given.
	#[must_use]
	pub fn record(&self) -> Option<Record> {
		let surname = self.surname.clone()?;
		let phone = self.phone.clone()?;
		Some(Record {
			surname,
			phone,
			age: self.age,
			spec_code: self.spec_code,
			description: self.description.clone(),
		})
	}
}
