use dashmap::DashMap;
use std::{
	net::SocketAddr,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};

use crate::session::Session;
use crate::snapshot::{ClientStatus, Snapshot};
use crate::types::SessionId;

/// The server's live collection of sessions, keyed by session ID.
///
/// Cheap to clone; every clone shares the same underlying map, so the
/// accept path, each connection's read path, the liveness monitor and
/// shutdown all operate on one registry. A session is present here iff
/// its stream is currently open and accepted.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
	sessions: Arc<DashMap<SessionId, Session>>,
	next_seq: Arc<AtomicU64>,
}

impl SessionRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self {
			sessions: Arc::new(DashMap::new()),
			next_seq: Arc::new(AtomicU64::new(0)),
		}
	}

	/// Register a newly accepted connection and return its session.
	pub fn insert(&self, addr: SocketAddr) -> Session {
		let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
		let session = Session::new(SessionId::new(), addr, seq);
		self.sessions.insert(session.id, session.clone());
		session
	}

	/// Refresh a session's last-activity timestamp.
	///
	/// Returns false when the session is no longer registered (it raced
	/// with a disconnect).
	pub fn touch(&self, id: &SessionId) -> bool {
		match self.sessions.get_mut(id) {
			Some(mut session) => {
				session.touch();
				true
			}
			None => false,
		}
	}

	#[must_use]
	pub fn get(&self, id: &SessionId) -> Option<Session> {
		self.sessions.get(id).map(|entry| entry.value().clone())
	}

	pub fn remove(&self, id: &SessionId) -> Option<Session> {
		self.sessions.remove(id).map(|(_, session)| session)
	}

	pub fn clear(&self) {
		self.sessions.clear();
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}

	/// Take a full liveness snapshot in connection order.
	///
	/// Classification is recomputed fresh for every session; nothing
	/// here mutates the registry.
	#[must_use]
	pub fn snapshot(&self, stale_threshold: Duration) -> Snapshot {
		if self.sessions.is_empty() {
			return Snapshot::NoClients;
		}

		let mut rows: Vec<(u64, ClientStatus)> = self
			.sessions
			.iter()
			.map(|entry| {
				let session = entry.value();
				let since_last_seen = session.since_last_seen();
				let status = ClientStatus {
					addr: session.addr,
					liveness: session.liveness(stale_threshold),
					since_last_seen,
				};
				(session.seq, status)
			})
			.collect();

		// DashMap iteration order is arbitrary; the insert sequence
		// restores deterministic, connection-ordered listing.
		rows.sort_by_key(|(seq, _)| *seq);

		Snapshot::Clients(rows.into_iter().map(|(_, status)| status).collect())
	}
}

impl Default for SessionRegistry {
	fn default() -> Self {
		Self::new()
	}
}
