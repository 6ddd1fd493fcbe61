use tokio::{task::JoinHandle, time::interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::LivenessConfig;
use crate::events::{EventSender, SessionEvent};
use crate::registry::SessionRegistry;

/// Periodically re-classifies every registered session and publishes a
/// fresh snapshot to the event channel.
///
/// The monitor owns its timer task; there is no process-wide timer
/// state. It is cancelled through a child of the token passed at
/// construction, so cancelling the owner tears the monitor down too.
pub struct LivenessMonitor {
	registry: SessionRegistry,
	events: EventSender,
	config: LivenessConfig,
	cancel: CancellationToken,
}

impl LivenessMonitor {
	#[must_use]
	pub fn new(registry: SessionRegistry, events: EventSender, config: LivenessConfig, parent_token: &CancellationToken) -> Self {
		Self {
			registry,
			events,
			config,
			cancel: parent_token.child_token(),
		}
	}

	/// Spawn the sweep loop and return a handle for stopping it.
	pub fn start(self) -> MonitorHandle {
		let cancel = self.cancel.clone();
		info!(
			sweep_secs = self.config.sweep_interval.as_secs_f64(),
			threshold_secs = self.config.stale_threshold.as_secs_f64(),
			"liveness monitor starting"
		);
		let task = tokio::spawn(self.run());
		MonitorHandle { cancel, task }
	}

	async fn run(self) {
		let mut ticker = interval(self.config.sweep_interval);
		// The first interval tick completes immediately; consume it so
		// sweeps start one full period after the monitor comes up.
		ticker.tick().await;

		loop {
			tokio::select! {
				() = self.cancel.cancelled() => break,
				_ = ticker.tick() => {
					let snapshot = self.registry.snapshot(self.config.stale_threshold);
					debug!(clients = snapshot.client_count(), "liveness sweep");
					if self.events.send(SessionEvent::Snapshot(snapshot)).is_err() {
						// Collaborator went away; nothing left to report to.
						break;
					}
				}
			}
		}

		debug!("liveness monitor stopped");
	}
}

/// Handle for a running monitor.
pub struct MonitorHandle {
	cancel: CancellationToken,
	task: JoinHandle<()>,
}

impl MonitorHandle {
	/// Request the monitor to stop. Idempotent.
	pub fn stop(&self) {
		self.cancel.cancel();
	}

	#[must_use]
	pub fn is_stopped(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Stop the monitor and wait for the sweep loop to exit. After this
	/// returns no further snapshot is published.
	pub async fn join(self) {
		self.cancel.cancel();
		let _ = self.task.await;
	}
}
