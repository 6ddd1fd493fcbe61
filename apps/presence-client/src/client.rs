use std::{
	fmt,
	net::SocketAddr,
	sync::{Arc, Mutex as StdMutex},
};
use tokio::{
	io::AsyncReadExt,
	net::{
		tcp::{OwnedReadHalf, OwnedWriteHalf},
		TcpStream,
	},
	sync::Mutex,
	task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use presence_wire::{Message, Record};

use crate::error::{validate, ClientError, Result};
use crate::events::{ClientEvent, ClientEventSender};
use crate::heartbeat::{write_message, HeartbeatConfig, HeartbeatHandle, HeartbeatScheduler};

/// Client connection lifecycle. Errors collapse straight back to
/// `Disconnected`; there is no separate error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
	Disconnected,
	Connecting,
	Connected,
}

impl fmt::Display for ClientState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Disconnected => write!(f, "Disconnected"),
			Self::Connecting => write!(f, "Connecting"),
			Self::Connected => write!(f, "Connected"),
		}
	}
}

struct Shared {
	state: StdMutex<ClientState>,
	events: ClientEventSender,
}

impl Shared {
	fn transition(&self, to: ClientState) {
		let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		if *state == to {
			return;
		}
		debug!(from = %state, %to, "client state change");
		let was_online = *state == ClientState::Connected;
		let is_online = to == ClientState::Connected;
		*state = to;
		// Status only reports online-ness; Connecting is not a status change.
		if was_online != is_online {
			let _ = self.events.send(ClientEvent::StatusChanged(is_online));
		}
	}

	fn log(&self, line: impl Into<String>) {
		let _ = self.events.send(ClientEvent::Log(line.into()));
	}
}

struct Connection {
	addr: SocketAddr,
	writer: Arc<Mutex<OwnedWriteHalf>>,
	token: CancellationToken,
	scheduler: HeartbeatHandle,
	reader: JoinHandle<()>,
}

/// The client half of the presence protocol: one connection, one
/// heartbeat scheduler, record submission with pre-flight validation.
pub struct PresenceClient {
	heartbeat: HeartbeatConfig,
	shared: Arc<Shared>,
	conn: Mutex<Option<Connection>>,
}

impl PresenceClient {
	#[must_use]
	pub fn new(heartbeat: HeartbeatConfig, events: ClientEventSender) -> Self {
		Self {
			heartbeat,
			shared: Arc::new(Shared {
				state: StdMutex::new(ClientState::Disconnected),
				events,
			}),
			conn: Mutex::new(None),
		}
	}

	/// Current lifecycle state.
	#[must_use]
	pub fn state(&self) -> ClientState {
		*self.shared.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
	}

	/// Establish a connection and start heartbeating.
	///
	/// Any previous connection is torn down first so only one heartbeat
	/// scheduler ever runs per session.
	///
	/// # Errors
	/// Returns [`ClientError::Connect`] when the transport cannot reach
	/// the server; the state is back to `Disconnected` and no retry is
	/// attempted.
	pub async fn connect(&self, addr: SocketAddr) -> Result<()> {
		let mut conn = self.conn.lock().await;
		if let Some(previous) = conn.take() {
			teardown(previous, &self.shared).await;
		}

		self.shared.transition(ClientState::Connecting);
		self.shared.log(format!("Connecting to server {addr}..."));

		let stream = match TcpStream::connect(addr).await {
			Ok(stream) => stream,
			Err(source) => {
				self.shared.transition(ClientState::Disconnected);
				self.shared.log(format!("Connection failed: {source}"));
				return Err(ClientError::Connect { addr, source });
			}
		};

		let (read_half, write_half) = stream.into_split();
		let writer = Arc::new(Mutex::new(write_half));
		let token = CancellationToken::new();

		self.shared.transition(ClientState::Connected);
		self.shared.log("Connection established");
		info!(%addr, "connected");

		let scheduler = HeartbeatScheduler::new(writer.clone(), &self.heartbeat, &token).start();
		let reader = tokio::spawn(watch_peer(read_half, token.clone(), self.shared.clone()));

		*conn = Some(Connection {
			addr,
			writer,
			token,
			scheduler,
			reader,
		});
		Ok(())
	}

	/// Validate and send one data record.
	///
	/// # Errors
	/// Returns [`ClientError::Validation`] before any I/O when a field
	/// rule is violated, [`ClientError::NotConnected`] outside the
	/// `Connected` state, and [`ClientError::Transport`] when the write
	/// fails mid-session (the connection is torn down).
	pub async fn send_record(&self, record: &Record) -> Result<()> {
		validate(record)?;

		let mut conn = self.conn.lock().await;
		let (writer, addr) = match conn.as_ref() {
			Some(active) if self.state() == ClientState::Connected => (active.writer.clone(), active.addr),
			_ => return Err(ClientError::NotConnected),
		};

		let payload = Message::Data(record.clone()).encode();
		if let Err(err) = write_message(&writer, &payload).await {
			// A failed write is a transport failure; the session ends here.
			if let Some(broken) = conn.take() {
				teardown(broken, &self.shared).await;
			}
			self.shared.log(format!("Send to {addr} failed: {err}"));
			return Err(ClientError::Transport(err));
		}

		self.shared.log(format!(
			"Data packet sent: surname={}, phone={}, age={}, specialization={} ({}), description={}",
			record.surname,
			record.phone,
			record.age,
			record.spec_code,
			record.specialization(),
			record.description
		));
		Ok(())
	}

	/// Stop heartbeating and close the connection. No-op when already
	/// disconnected.
	pub async fn disconnect(&self) {
		let mut conn = self.conn.lock().await;
		if let Some(active) = conn.take() {
			info!(addr = %active.addr, "disconnecting");
			teardown(active, &self.shared).await;
			self.shared.log("Disconnected from server");
		}
	}
}

async fn teardown(conn: Connection, shared: &Arc<Shared>) {
	conn.token.cancel();
	// After join returns no trailing heartbeat can fire.
	conn.scheduler.join().await;
	let _ = conn.reader.await;
	drop(conn.writer);
	shared.transition(ClientState::Disconnected);
}

/// Watches the read side for peer close or transport failure.
///
/// The server never sends application data, so any read beyond zero is
/// ignored; EOF and errors end the session.
async fn watch_peer(mut read_half: OwnedReadHalf, token: CancellationToken, shared: Arc<Shared>) {
	let mut buf = [0_u8; 1024];

	loop {
		tokio::select! {
			// Deliberate local disconnect; the teardown path handles state.
			() = token.cancelled() => return,
			read = read_half.read(&mut buf) => match read {
				Ok(0) => {
					debug!("server closed the connection");
					break;
				}
				Ok(_) => {}
				Err(err) => {
					debug!(%err, "transport error");
					break;
				}
			}
		}
	}

	// Peer-side close: stop the heartbeat scheduler (no trailing fire)
	// and fall back to Disconnected.
	token.cancel();
	shared.transition(ClientState::Disconnected);
	shared.log("Connection lost");
}
