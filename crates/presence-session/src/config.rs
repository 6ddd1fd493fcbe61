use std::time::Duration;

/// Liveness timing constants.
///
/// These are protocol-fixed in production; tests shrink them to keep
/// runtimes short.
#[derive(Debug, Clone)]
pub struct LivenessConfig {
	/// How often the monitor re-classifies every session.
	pub sweep_interval: Duration,
	/// A session is online while its idle time stays strictly below this.
	pub stale_threshold: Duration,
}

impl Default for LivenessConfig {
	fn default() -> Self {
		Self {
			sweep_interval: Duration::from_secs(3),
			stale_threshold: Duration::from_secs(15),
		}
	}
}
