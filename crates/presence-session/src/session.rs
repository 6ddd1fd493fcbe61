use crate::types::SessionId;
use std::{
	fmt,
	net::SocketAddr,
	time::{Duration, Instant},
};

/// Server-side state tracked for one accepted connection.
///
/// Liveness is never stored here; it is derived from `last_activity`
/// on demand so a stale classification can never be left behind.
#[derive(Debug, Clone)]
pub struct Session {
	pub id: SessionId,
	pub addr: SocketAddr,
	/// Position in connection order, assigned by the registry on insert.
	pub seq: u64,
	pub connected_at: Instant,
	pub last_activity: Instant,
}

impl Session {
	#[must_use]
	pub(crate) fn new(id: SessionId, addr: SocketAddr, seq: u64) -> Self {
		let now = Instant::now();
		Self {
			id,
			addr,
			seq,
			connected_at: now,
			last_activity: now,
		}
	}

	/// Record activity. The timestamp never moves backwards.
	pub fn touch(&mut self) {
		let now = Instant::now();
		if now > self.last_activity {
			self.last_activity = now;
		}
	}

	/// Time elapsed since the last decoded message.
	#[must_use]
	pub fn since_last_seen(&self) -> Duration {
		self.last_activity.elapsed()
	}

	/// Classify the session against the given staleness threshold.
	#[must_use]
	pub fn liveness(&self, threshold: Duration) -> Liveness {
		Liveness::classify(self.since_last_seen(), threshold)
	}
}

/// Derived online/offline classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
	Online,
	Offline,
}

impl Liveness {
	/// Online while elapsed stays strictly below the threshold.
	#[must_use]
	pub fn classify(elapsed: Duration, threshold: Duration) -> Self {
		if elapsed < threshold {
			Self::Online
		} else {
			Self::Offline
		}
	}

	#[must_use]
	pub fn is_online(self) -> bool {
		matches!(self, Self::Online)
	}
}

impl fmt::Display for Liveness {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Online => write!(f, "Online"),
			Self::Offline => write!(f, "Offline"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_classification_uses_strict_threshold() {
		let threshold = Duration::from_secs(15);

		assert_eq!(Liveness::classify(Duration::from_secs(14), threshold), Liveness::Online);
		assert_eq!(Liveness::classify(Duration::from_secs(15), threshold), Liveness::Offline);
		assert_eq!(Liveness::classify(Duration::from_secs(20), threshold), Liveness::Offline);
	}

	#[test]
	fn test_fresh_session_is_online() {
		let session = Session::new(SessionId::new(), "127.0.0.1:9000".parse().unwrap(), 0);
		assert_eq!(session.liveness(Duration::from_secs(15)), Liveness::Online);
	}

	#[test]
	fn test_touch_never_moves_backwards() {
		let mut session = Session::new(SessionId::new(), "127.0.0.1:9000".parse().unwrap(), 0);

		std::thread::sleep(Duration::from_millis(5));
		let before = session.last_activity;
		session.touch();
		assert!(session.last_activity >= before);

		let after_touch = session.last_activity;
		session.touch();
		assert!(session.last_activity >= after_touch);
	}

	#[test]
	fn test_stale_session_classifies_offline() {
		let mut session = Session::new(SessionId::new(), "127.0.0.1:9000".parse().unwrap(), 0);
		session.last_activity = Instant::now() - Duration::from_secs(20);

		assert_eq!(session.liveness(Duration::from_secs(15)), Liveness::Offline);
	}
}
