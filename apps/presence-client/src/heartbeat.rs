use std::{sync::Arc, time::Duration};
use tokio::{
	io::AsyncWriteExt,
	net::tcp::OwnedWriteHalf,
	sync::Mutex,
	task::JoinHandle,
	time::interval,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use presence_wire::codec::HEARTBEAT;

/// Heartbeat timing constants. Protocol-fixed; tests shrink the period.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
	pub period: Duration,
}

impl Default for HeartbeatConfig {
	fn default() -> Self {
		Self {
			period: Duration::from_secs(5),
		}
	}
}

/// Sends `HEARTBEAT` on a fixed period for as long as the connection
/// lives.
///
/// At most one scheduler runs per client session; connecting again
/// stops the previous instance before a new one starts. The scheduler
/// is owned through its handle, never global.
pub struct HeartbeatScheduler {
	writer: Arc<Mutex<OwnedWriteHalf>>,
	period: Duration,
	cancel: CancellationToken,
}

impl HeartbeatScheduler {
	#[must_use]
	pub fn new(writer: Arc<Mutex<OwnedWriteHalf>>, config: &HeartbeatConfig, parent_token: &CancellationToken) -> Self {
		Self {
			writer,
			period: config.period,
			cancel: parent_token.child_token(),
		}
	}

	/// Spawn the beat loop. The first heartbeat goes out immediately.
	pub fn start(self) -> HeartbeatHandle {
		let cancel = self.cancel.clone();
		let task = tokio::spawn(self.run());
		HeartbeatHandle { cancel, task }
	}

	async fn run(self) {
		let mut ticker = interval(self.period);

		loop {
			tokio::select! {
				() = self.cancel.cancelled() => break,
				_ = ticker.tick() => {
					if let Err(err) = write_message(&self.writer, HEARTBEAT.as_bytes()).await {
						debug!(%err, "heartbeat write failed, stopping scheduler");
						break;
					}
				}
			}
		}

		debug!("heartbeat scheduler stopped");
	}
}

/// Handle for a running heartbeat scheduler.
#[derive(Debug)]
pub struct HeartbeatHandle {
	cancel: CancellationToken,
	task: JoinHandle<()>,
}

impl HeartbeatHandle {
	/// Request the scheduler to stop. Stopping an already-stopped
	/// scheduler is a no-op.
	pub fn stop(&self) {
		self.cancel.cancel();
	}

	#[must_use]
	pub fn is_stopped(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Stop the scheduler and wait for the beat loop to exit. After
	/// this returns no further heartbeat is written.
	pub async fn join(self) {
		self.cancel.cancel();
		let _ = self.task.await;
	}
}

/// Write one protocol message followed by the newline boundary.
pub(crate) async fn write_message(writer: &Arc<Mutex<OwnedWriteHalf>>, payload: &[u8]) -> std::io::Result<()> {
	let mut writer = writer.lock().await;
	writer.write_all(payload).await?;
	writer.write_all(b"\n").await?;
	writer.flush().await
}
