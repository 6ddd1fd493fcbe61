pub mod config;
pub mod events;
pub mod monitor;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod types;

pub use config::LivenessConfig;
pub use events::{EventReceiver, EventSender, SessionEvent};
pub use monitor::{LivenessMonitor, MonitorHandle};
pub use registry::SessionRegistry;
pub use session::{Liveness, Session};
pub use snapshot::{ClientStatus, Snapshot};
pub use types::SessionId;
