use presence_wire::Record;
use std::net::SocketAddr;
use tokio::sync::mpsc;

use crate::snapshot::Snapshot;

/// Events the protocol core surfaces to the logging/display collaborator.
#[derive(Debug, Clone)]
pub enum SessionEvent {
	/// A connection was accepted and registered.
	Connected { addr: SocketAddr },

	/// A session was torn down after peer close or a transport error.
	Disconnected { addr: SocketAddr },

	/// A client submitted a well-formed data record.
	RecordReceived { addr: SocketAddr, record: Record },

	/// A message failed to decode. The connection stays open.
	DecodeFailed { addr: SocketAddr, reason: String },

	/// Periodic liveness snapshot of every registered session.
	Snapshot(Snapshot),

	/// The server finished shutting down.
	ServerStopped,
}

/// Unbounded so no event is dropped between the core and its collaborator.
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Create the event channel connecting the core to its collaborator.
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
	mpsc::unbounded_channel()
}
