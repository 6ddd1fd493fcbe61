use clap::Parser;
use presence_session::LivenessConfig;
use std::net::IpAddr;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Presence and data protocol server", long_about = None)]
pub struct Cli {
	/// Bind address
	#[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
	pub host: IpAddr,

	/// Listening port (unprivileged range only)
	#[arg(long, env = "PORT", default_value_t = 5555, value_parser = clap::value_parser!(u16).range(1024..))]
	pub port: u16,

	/// Cap on concurrent connections; unbounded when omitted
	#[arg(long, env = "MAX_CONNECTIONS")]
	pub max_connections: Option<usize>,

	/// Log level
	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	pub log_level: tracing::Level,
}

impl Cli {
	#[must_use]
	pub fn server_config(&self) -> ServerConfig {
		ServerConfig {
			max_connections: self.max_connections,
			..ServerConfig::default()
		}
	}
}

/// Runtime configuration for [`crate::PresenceServer`].
///
/// The liveness constants are protocol-fixed; the CLI deliberately does
/// not expose them. The connection cap is an extension over the original
/// unbounded accept behavior and stays off by default.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub liveness: LivenessConfig,
	pub max_connections: Option<usize>,
}
