use std::{io, net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio::{
	io::AsyncReadExt,
	net::{TcpListener, TcpStream},
	sync::{Mutex, Semaphore},
	task::JoinHandle,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, info, warn};

use presence_session::{EventSender, LivenessMonitor, MonitorHandle, Session, SessionEvent, SessionRegistry};
use presence_wire::Message;

use crate::config::ServerConfig;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while bringing the server up
#[derive(Debug, Error)]
pub enum ServerError {
	/// The listening socket could not be opened
	#[error("failed to bind {addr}: {source}")]
	Bind { addr: SocketAddr, source: io::Error },
}

struct Running {
	accept_task: JoinHandle<()>,
	monitor: MonitorHandle,
	connections: TaskTracker,
}

/// The central node: accepts connections, tracks per-connection
/// liveness and surfaces decoded records to the logging collaborator.
///
/// One task serves the accept loop, one task serves each accepted
/// connection and one timer task drives the liveness monitor. A slow or
/// failing peer degrades only its own session.
pub struct PresenceServer {
	registry: SessionRegistry,
	events: EventSender,
	config: ServerConfig,
	local_addr: SocketAddr,
	cancel: CancellationToken,
	running: Mutex<Option<Running>>,
}

impl PresenceServer {
	/// Bind the listening socket and spawn the accept loop and the
	/// liveness monitor.
	///
	/// # Errors
	/// Returns [`ServerError::Bind`] when the port cannot be opened; no
	/// automatic retry is attempted.
	pub async fn start(addr: SocketAddr, config: ServerConfig, events: EventSender) -> Result<Self> {
		let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind { addr, source })?;
		let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { addr, source })?;

		info!(%local_addr, "--- SERVER STARTED ---");

		let registry = SessionRegistry::new();
		let cancel = CancellationToken::new();
		let connections = TaskTracker::new();

		let monitor = LivenessMonitor::new(registry.clone(), events.clone(), config.liveness.clone(), &cancel).start();

		let admission = config.max_connections.map(|limit| Arc::new(Semaphore::new(limit)));
		let accept_task = tokio::spawn(accept_loop(
			listener,
			registry.clone(),
			events.clone(),
			admission,
			cancel.clone(),
			connections.clone(),
		));

		Ok(Self {
			registry,
			events,
			config,
			local_addr,
			cancel,
			running: Mutex::new(Some(Running { accept_task, monitor, connections })),
		})
	}

	/// Address the server actually bound (useful with port 0).
	#[must_use]
	pub fn local_addr(&self) -> SocketAddr {
		self.local_addr
	}

	/// The live session registry.
	#[must_use]
	pub fn registry(&self) -> &SessionRegistry {
		&self.registry
	}

	/// Take a liveness snapshot on demand, outside the monitor cadence.
	#[must_use]
	pub fn snapshot(&self) -> presence_session::Snapshot {
		self.registry.snapshot(self.config.liveness.stale_threshold)
	}

	/// Stop accepting, close every session's stream, clear the registry
	/// and stop the liveness monitor.
	///
	/// Complete when it returns: all tasks have exited and no timer will
	/// fire afterwards. Calling it again, or on a server that already
	/// stopped, is a no-op.
	pub async fn shutdown(&self) {
		let Some(running) = self.running.lock().await.take() else {
			debug!("shutdown requested but server is not running");
			return;
		};

		info!("server shutting down");
		self.cancel.cancel();

		let _ = running.accept_task.await;
		running.monitor.join().await;

		// Every read loop observes the cancelled token, drops its stream
		// and removes its session on the way out.
		running.connections.close();
		running.connections.wait().await;

		self.registry.clear();
		let _ = self.events.send(SessionEvent::ServerStopped);
		info!("--- SERVER STOPPED ---");
	}
}

async fn accept_loop(
	listener: TcpListener,
	registry: SessionRegistry,
	events: EventSender,
	admission: Option<Arc<Semaphore>>,
	cancel: CancellationToken,
	connections: TaskTracker,
) {
	loop {
		tokio::select! {
			() = cancel.cancelled() => break,
			accepted = listener.accept() => match accepted {
				Ok((stream, peer)) => {
					let permit = match &admission {
						Some(semaphore) => match semaphore.clone().try_acquire_owned() {
							Ok(permit) => Some(permit),
							Err(_) => {
								warn!(%peer, "connection limit reached, rejecting");
								drop(stream);
								continue;
							}
						},
						None => None,
					};

					let session = registry.insert(peer);
					info!(ip = %peer.ip(), port = peer.port(), "client connected");
					let _ = events.send(SessionEvent::Connected { addr: peer });

					let task = serve_connection(stream, session, registry.clone(), events.clone(), cancel.child_token());
					connections.spawn(async move {
						serve_and_release(task, permit).await;
					});
				}
				Err(err) => {
					// Transient accept failures must not take the loop down.
					warn!(%err, "accept failed");
				}
			}
		}
	}

	debug!("accept loop stopped");
}

async fn serve_and_release(task: impl std::future::Future<Output = ()>, permit: Option<tokio::sync::OwnedSemaphorePermit>) {
	task.await;
	drop(permit);
}

/// Per-connection read loop.
///
/// Each readable chunk carries one or more newline-separated messages.
/// Every successfully decoded message refreshes the session's activity
/// timestamp; decode errors are reported and the connection stays open.
/// EOF, a transport error or server shutdown tears the session down.
async fn serve_connection(stream: TcpStream, session: Session, registry: SessionRegistry, events: EventSender, cancel: CancellationToken) {
	let addr = session.addr;
	let mut stream = stream;
	let mut buf = vec![0_u8; 4096];

	loop {
		tokio::select! {
			() = cancel.cancelled() => break,
			read = stream.read(&mut buf) => match read {
				Ok(0) => {
					debug!(%addr, "peer closed connection");
					break;
				}
				Ok(n) => {
					for raw in buf[..n].split(|byte| *byte == b'\n') {
						if raw.iter().all(u8::is_ascii_whitespace) {
							// Framing residue between messages, not a payload.
							continue;
						}
						handle_message(raw, &session, &registry, &events);
					}
				}
				Err(err) => {
					// Treated like a clean disconnect: only this session degrades.
					debug!(%addr, %err, "transport error");
					break;
				}
			}
		}
	}

	if registry.remove(&session.id).is_some() {
		info!(ip = %addr.ip(), port = addr.port(), "client disconnected");
		let _ = events.send(SessionEvent::Disconnected { addr });
	}
}

fn handle_message(raw: &[u8], session: &Session, registry: &SessionRegistry, events: &EventSender) {
	let addr = session.addr;
	match Message::decode(raw) {
		Ok(Message::Heartbeat) => {
			// A heartbeat carries no payload; it only refreshes the timestamp.
			registry.touch(&session.id);
		}
		Ok(Message::Data(record)) => {
			registry.touch(&session.id);
			debug!(%addr, specialization = %record.specialization(), "record received");
			let _ = events.send(SessionEvent::RecordReceived { addr, record });
		}
		Err(err) => {
			warn!(%addr, %err, "discarding undecodable message");
			let _ = events.send(SessionEvent::DecodeFailed { addr, reason: err.to_string() });
		}
	}
}
