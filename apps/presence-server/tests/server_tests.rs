#[cfg(test)]
mod tests {
	use std::{net::SocketAddr, time::Duration};
	use presence_server::{PresenceServer, ServerConfig};
	use presence_session::{events, EventReceiver, LivenessConfig, Liveness, SessionEvent, Snapshot};
	use tokio::{
		io::{AsyncReadExt, AsyncWriteExt},
		net::TcpStream,
		time::timeout,
	};

	const WAIT: Duration = Duration::from_secs(3);

	fn fast_config() -> ServerConfig {
		ServerConfig {
			liveness: LivenessConfig {
				sweep_interval: Duration::from_millis(30),
				stale_threshold: Duration::from_millis(200),
			},
			max_connections: None,
		}
	}

	fn any_addr() -> SocketAddr {
		"127.0.0.1:0".parse().unwrap()
	}

	async fn start_server(config: ServerConfig) -> (PresenceServer, EventReceiver) {
		let (tx, rx) = events::channel();
		let server = PresenceServer::start(any_addr(), config, tx).await.expect("server should bind");
		(server, rx)
	}

	async fn send(stream: &mut TcpStream, payload: &[u8]) {
		stream.write_all(payload).await.expect("write should succeed");
		stream.write_all(b"\n").await.expect("write should succeed");
		stream.flush().await.expect("flush should succeed");
	}

	async fn wait_for<F, T>(rx: &mut EventReceiver, mut pick: F) -> T
	where
		F: FnMut(SessionEvent) -> Option<T>,
	{
		loop {
			let event = timeout(WAIT, rx.recv()).await.expect("timed out waiting for event").expect("event channel closed");
			if let Some(found) = pick(event) {
				return found;
			}
		}
	}

	#[tokio::test]
	async fn test_accept_registers_session_and_emits_connected() {
		let (server, mut rx) = start_server(fast_config()).await;

		let stream = TcpStream::connect(server.local_addr()).await.unwrap();
		let local = stream.local_addr().unwrap();

		let addr = wait_for(&mut rx, |event| match event {
			SessionEvent::Connected { addr } => Some(addr),
			_ => None,
		})
		.await;

		assert_eq!(addr, local);
		assert_eq!(server.registry().len(), 1);

		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_data_record_is_decoded_and_reported() {
		// Scenario: one client submits a record; the server resolves the
		// specialization display name and surfaces every field.
		let (server, mut rx) = start_server(fast_config()).await;

		let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
		send(&mut stream, b"DATA:Smith||555-1234||30||2||Likes databases").await;

		let record = wait_for(&mut rx, |event| match event {
			SessionEvent::RecordReceived { record, .. } => Some(record),
			_ => None,
		})
		.await;

		assert_eq!(record.surname, "Smith");
		assert_eq!(record.phone, "555-1234");
		assert_eq!(record.age, 30);
		assert_eq!(record.specialization().to_string(), "Databases");
		assert_eq!(record.description, "Likes databases");

		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_malformed_packet_keeps_connection_open() {
		// Scenario: a four-field packet is rejected, then a heartbeat on
		// the same connection still lands.
		let (server, mut rx) = start_server(fast_config()).await;

		let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
		send(&mut stream, b"DATA:||123||25||1").await;

		let reason = wait_for(&mut rx, |event| match event {
			SessionEvent::DecodeFailed { reason, .. } => Some(reason),
			_ => None,
		})
		.await;
		assert!(reason.contains("malformed"), "unexpected reason: {reason}");

		send(&mut stream, b"HEARTBEAT").await;
		tokio::time::sleep(Duration::from_millis(50)).await;

		assert_eq!(server.registry().len(), 1, "connection should survive a decode error");
		match server.snapshot() {
			Snapshot::Clients(clients) => assert_eq!(clients[0].liveness, Liveness::Online),
			Snapshot::NoClients => panic!("expected one registered client"),
		}

		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_unrecognized_message_is_reported_not_fatal() {
		let (server, mut rx) = start_server(fast_config()).await;

		let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
		send(&mut stream, b"BOGUS").await;

		let reason = wait_for(&mut rx, |event| match event {
			SessionEvent::DecodeFailed { reason, .. } => Some(reason),
			_ => None,
		})
		.await;
		assert!(reason.contains("unrecognized"), "unexpected reason: {reason}");
		assert_eq!(server.registry().len(), 1);

		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_peer_close_tears_down_exactly_that_session() {
		let (server, mut rx) = start_server(fast_config()).await;

		let first = TcpStream::connect(server.local_addr()).await.unwrap();
		let second = TcpStream::connect(server.local_addr()).await.unwrap();
		let first_addr = first.local_addr().unwrap();

		// Both registered before we drop one.
		for _ in 0..2 {
			wait_for(&mut rx, |event| match event {
				SessionEvent::Connected { addr } => Some(addr),
				_ => None,
			})
			.await;
		}

		drop(first);

		let gone = wait_for(&mut rx, |event| match event {
			SessionEvent::Disconnected { addr } => Some(addr),
			_ => None,
		})
		.await;

		assert_eq!(gone, first_addr);
		assert_eq!(server.registry().len(), 1);
		drop(second);

		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_silent_client_goes_offline_while_heartbeating_client_stays_online() {
		// Scenario: client 1 goes silent, client 2 keeps heartbeating;
		// a later snapshot classifies them offline and online respectively.
		let (server, mut rx) = start_server(fast_config()).await;

		let silent = TcpStream::connect(server.local_addr()).await.unwrap();
		let silent_addr = silent.local_addr().unwrap();
		let mut beating = TcpStream::connect(server.local_addr()).await.unwrap();
		let beating_addr = beating.local_addr().unwrap();

		let beat_task = tokio::spawn(async move {
			for _ in 0..20 {
				send(&mut beating, b"HEARTBEAT").await;
				tokio::time::sleep(Duration::from_millis(50)).await;
			}
			beating
		});

		let deadline = tokio::time::Instant::now() + WAIT;
		loop {
			let snapshot = wait_for(&mut rx, |event| match event {
				SessionEvent::Snapshot(snapshot) => Some(snapshot),
				_ => None,
			})
			.await;

			let clients = snapshot.clients().to_vec();
			if clients.len() == 2 {
				let silent_row = clients.iter().find(|client| client.addr == silent_addr).expect("silent client in snapshot");
				let beating_row = clients.iter().find(|client| client.addr == beating_addr).expect("beating client in snapshot");

				if silent_row.liveness == Liveness::Offline {
					assert_eq!(beating_row.liveness, Liveness::Online);
					break;
				}
			}
			assert!(tokio::time::Instant::now() < deadline, "silent client never classified offline");
		}

		drop(silent);
		let _ = beat_task.await;
		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_shutdown_clears_registry_and_reports_stopped() {
		// Scenario: stop with two clients connected; both sessions go and
		// the next snapshot is the distinguished empty state.
		let (server, mut rx) = start_server(fast_config()).await;

		let _first = TcpStream::connect(server.local_addr()).await.unwrap();
		let _second = TcpStream::connect(server.local_addr()).await.unwrap();

		for _ in 0..2 {
			wait_for(&mut rx, |event| match event {
				SessionEvent::Connected { addr } => Some(addr),
				_ => None,
			})
			.await;
		}

		server.shutdown().await;

		wait_for(&mut rx, |event| match event {
			SessionEvent::ServerStopped => Some(()),
			_ => None,
		})
		.await;

		assert!(server.registry().is_empty());
		assert_eq!(server.snapshot(), Snapshot::NoClients);
	}

	#[tokio::test]
	async fn test_shutdown_is_idempotent() {
		let (server, _rx) = start_server(fast_config()).await;

		server.shutdown().await;
		// A second shutdown on a stopped server is a no-op.
		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_bind_failure_is_reported() {
		let (server, _rx) = start_server(fast_config()).await;

		let (tx, _rx2) = events::channel();
		let clash = PresenceServer::start(server.local_addr(), fast_config(), tx).await;

		assert!(clash.is_err(), "binding an occupied port should fail");

		server.shutdown().await;
	}

	#[tokio::test]
	async fn test_connection_cap_rejects_excess_peers() {
		let config = ServerConfig {
			max_connections: Some(1),
			..fast_config()
		};
		let (server, mut rx) = start_server(config).await;

		let _kept = TcpStream::connect(server.local_addr()).await.unwrap();
		wait_for(&mut rx, |event| match event {
			SessionEvent::Connected { addr } => Some(addr),
			_ => None,
		})
		.await;

		let mut rejected = TcpStream::connect(server.local_addr()).await.unwrap();
		let mut buf = [0_u8; 8];
		let read = timeout(WAIT, rejected.read(&mut buf)).await.expect("rejected peer should see a prompt close");
		assert_eq!(read.unwrap(), 0, "server should close the excess connection");

		assert_eq!(server.registry().len(), 1);

		server.shutdown().await;
	}
}
