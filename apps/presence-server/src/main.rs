use anyhow::Result;
use clap::Parser;
use presence_server::{Cli, PresenceServer};
use presence_session::{events, SessionEvent};
use std::net::SocketAddr;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

	let (tx, mut rx) = events::channel();
	let addr = SocketAddr::new(cli.host, cli.port);
	let server = PresenceServer::start(addr, cli.server_config(), tx).await?;

	// Render core events as the log/display collaborator.
	let renderer = tokio::spawn(async move {
		while let Some(event) = rx.recv().await {
			render_event(&event);
		}
	});

	tokio::signal::ctrl_c().await?;
	info!("shutdown signal received");

	server.shutdown().await;
	drop(server);
	renderer.await?;

	Ok(())
}

fn render_event(event: &SessionEvent) {
	match event {
		SessionEvent::Connected { addr } => {
			info!("New client connected: IP: {}, Port: {}, Status: Online", addr.ip(), addr.port());
		}
		SessionEvent::Disconnected { addr } => {
			info!("Client disconnected: IP: {}, Port: {}", addr.ip(), addr.port());
		}
		SessionEvent::RecordReceived { addr, record } => {
			info!("DATA PACKET RECEIVED");
			info!("From client: {}:{}", addr.ip(), addr.port());
			info!("Field 1 (Surname):        {}", record.surname);
			info!("Field 2 (Phone):          {}", record.phone);
			info!("Field 3 (Age):            {}", record.age);
			info!("Field 4 (Specialization): {} ({})", record.spec_code, record.specialization());
			info!("Field 5 (Description):    {}", record.description);
		}
		SessionEvent::DecodeFailed { addr, reason } => {
			warn!("Invalid packet from {}: {reason}", addr);
		}
		SessionEvent::Snapshot(snapshot) => {
			info!("{snapshot}");
		}
		SessionEvent::ServerStopped => {
			info!("server stopped");
		}
	}
}
