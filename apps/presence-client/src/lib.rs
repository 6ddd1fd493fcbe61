pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod heartbeat;

pub use client::{ClientState, PresenceClient};
pub use config::Cli;
pub use error::{ClientError, ValidationError};
pub use events::{ClientEvent, ClientEventReceiver, ClientEventSender};
pub use heartbeat::{HeartbeatConfig, HeartbeatHandle, HeartbeatScheduler};
