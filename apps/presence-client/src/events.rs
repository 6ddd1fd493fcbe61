use tokio::sync::mpsc;

/// Events the client core surfaces to its display collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
	/// The connection went up (true) or down (false).
	StatusChanged(bool),

	/// Free-form status text for the log pane.
	Log(String),
}

pub type ClientEventSender = mpsc::UnboundedSender<ClientEvent>;
pub type ClientEventReceiver = mpsc::UnboundedReceiver<ClientEvent>;

/// Create the event channel connecting the client to its collaborator.
#[must_use]
pub fn channel() -> (ClientEventSender, ClientEventReceiver) {
	mpsc::unbounded_channel()
}
