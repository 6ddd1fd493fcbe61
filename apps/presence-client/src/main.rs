use anyhow::Result;
use clap::Parser;
use presence_client::{events, Cli, ClientEvent, HeartbeatConfig, PresenceClient};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

	let (tx, mut rx) = events::channel();
	let client = PresenceClient::new(HeartbeatConfig::default(), tx);

	// Render core events as the log/status collaborator.
	let renderer = tokio::spawn(async move {
		while let Some(event) = rx.recv().await {
			match event {
				ClientEvent::StatusChanged(connected) => {
					info!("Status: {}", if connected { "Connected (Online)" } else { "Disconnected (Offline)" });
				}
				ClientEvent::Log(line) => info!("{line}"),
			}
		}
	});

	let addr = SocketAddr::new(cli.host, cli.port);
	client.connect(addr).await?;

	if let Some(record) = cli.record() {
		client.send_record(&record).await?;
	}

	tokio::signal::ctrl_c().await?;
	info!("shutdown signal received");

	client.disconnect().await;
	drop(client);
	renderer.await?;

	Ok(())
}
