pub mod config;
pub mod server;

pub use config::{Cli, ServerConfig};
pub use server::{PresenceServer, ServerError};
