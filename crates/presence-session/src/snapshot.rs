use crate::session::Liveness;
use std::{fmt, net::SocketAddr, time::Duration};

/// One row of a liveness snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStatus {
	pub addr: SocketAddr,
	pub liveness: Liveness,
	pub since_last_seen: Duration,
}

/// A full registry snapshot, listed in connection order.
///
/// An empty registry is its own state so the display side renders a
/// distinguished "no connected clients" line rather than an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
	NoClients,
	Clients(Vec<ClientStatus>),
}

impl Snapshot {
	#[must_use]
	pub fn client_count(&self) -> usize {
		match self {
			Self::NoClients => 0,
			Self::Clients(clients) => clients.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::NoClients)
	}

	#[must_use]
	pub fn clients(&self) -> &[ClientStatus] {
		match self {
			Self::NoClients => &[],
			Self::Clients(clients) => clients,
		}
	}
}

impl fmt::Display for Snapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NoClients => write!(f, "No connected clients"),
			Self::Clients(clients) => {
				writeln!(f, "--- CONNECTED CLIENTS LIST ({}) ---", clients.len())?;
				for (index, client) in clients.iter().enumerate() {
					writeln!(f, "Client #{}:", index + 1)?;
					writeln!(f, "  IP Address: {}", client.addr.ip())?;
					writeln!(f, "  Port: {}", client.addr.port())?;
					writeln!(f, "  Status: {}", client.liveness)?;
					writeln!(f, "  Last seen: {} sec. ago", client.since_last_seen.as_secs())?;
				}
				Ok(())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_clients_is_distinguished_from_empty_list() {
		assert!(Snapshot::NoClients.is_empty());
		assert_eq!(Snapshot::NoClients.client_count(), 0);
		assert_ne!(Snapshot::NoClients, Snapshot::Clients(Vec::new()));
	}

	#[test]
	fn test_no_clients_renders_distinguished_line() {
		assert_eq!(Snapshot::NoClients.to_string(), "No connected clients");
	}

	#[test]
	fn test_client_list_renders_in_order() {
		let snapshot = Snapshot::Clients(vec![
			ClientStatus {
				addr: "10.0.0.1:4000".parse().unwrap(),
				liveness: Liveness::Online,
				since_last_seen: Duration::from_secs(2),
			},
			ClientStatus {
				addr: "10.0.0.2:4001".parse().unwrap(),
				liveness: Liveness::Offline,
				since_last_seen: Duration::from_secs(20),
			},
		]);

		let rendered = snapshot.to_string();
		assert!(rendered.starts_with("--- CONNECTED CLIENTS LIST (2) ---"));
		assert!(rendered.contains("Client #1:"));
		assert!(rendered.contains("10.0.0.1"));
		assert!(rendered.contains("Status: Online"));
		assert!(rendered.contains("Client #2:"));
		assert!(rendered.contains("Status: Offline"));
		assert!(rendered.contains("Last seen: 20 sec. ago"));
		assert!(rendered.find("Client #1:").unwrap() < rendered.find("Client #2:").unwrap());
	}
}
