#[cfg(test)]
mod tests {
	use std::{sync::Arc, time::Duration};
	use presence_client::{HeartbeatConfig, HeartbeatScheduler};
	use tokio::{
		io::AsyncReadExt,
		net::{TcpListener, TcpStream},
		sync::Mutex,
		time::timeout,
	};
	use tokio_util::sync::CancellationToken;

	const WAIT: Duration = Duration::from_secs(3);

	async fn writer_and_peer() -> (Arc<Mutex<tokio::net::tcp::OwnedWriteHalf>>, TcpStream) {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let outbound = TcpStream::connect(addr).await.unwrap();
		let (peer, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
		let (_read_half, write_half) = outbound.into_split();
		(Arc::new(Mutex::new(write_half)), peer)
	}

	#[tokio::test]
	async fn test_first_beat_goes_out_immediately() {
		let (writer, mut peer) = writer_and_peer().await;
		let config = HeartbeatConfig {
			period: Duration::from_secs(60),
		};
		let token = CancellationToken::new();
		let handle = HeartbeatScheduler::new(writer, &config, &token).start();

		let mut buf = [0_u8; 16];
		let n = timeout(WAIT, peer.read(&mut buf)).await.expect("expected an immediate beat").unwrap();
		assert_eq!(&buf[..n], b"HEARTBEAT\n");

		handle.join().await;
	}

	#[tokio::test]
	async fn test_stop_is_idempotent() {
		let (writer, _peer) = writer_and_peer().await;
		let token = CancellationToken::new();
		let handle = HeartbeatScheduler::new(
			writer,
			&HeartbeatConfig {
				period: Duration::from_millis(30),
			},
			&token,
		)
		.start();

		handle.stop();
		assert!(handle.is_stopped());
		handle.stop();
		assert!(handle.is_stopped());

		handle.join().await;
	}

	#[tokio::test]
	async fn test_join_leaves_no_trailing_beat() {
		let (writer, mut peer) = writer_and_peer().await;
		let token = CancellationToken::new();
		let handle = HeartbeatScheduler::new(
			writer.clone(),
			&HeartbeatConfig {
				period: Duration::from_millis(30),
			},
			&token,
		)
		.start();

		tokio::time::sleep(Duration::from_millis(100)).await;
		handle.join().await;

		// Drain everything written before the stop, then confirm silence.
		let mut drained = Vec::new();
		let mut buf = [0_u8; 64];
		loop {
			match timeout(Duration::from_millis(120), peer.read(&mut buf)).await {
				Ok(Ok(0)) | Err(_) => break,
				Ok(Ok(n)) => drained.extend_from_slice(&buf[..n]),
				Ok(Err(err)) => panic!("unexpected read error: {err}"),
			}
		}
		assert!(!drained.is_empty(), "beats before the stop should have landed");
		assert!(drained.chunks(10).all(|chunk| chunk == b"HEARTBEAT\n"), "stream should contain only whole beats");
	}

	#[tokio::test]
	async fn test_parent_cancellation_stops_the_scheduler() {
		let (writer, _peer) = writer_and_peer().await;
		let token = CancellationToken::new();
		let handle = HeartbeatScheduler::new(
			writer,
			&HeartbeatConfig {
				period: Duration::from_millis(30),
			},
			&token,
		)
		.start();

		token.cancel();
		assert!(handle.is_stopped());
		handle.join().await;
	}
}
