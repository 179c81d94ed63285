use anyhow::{Context, Result};
use std::net::SocketAddr;

use kitis::config::Config;
use kitis::schedule::ScheduleService;
use kitis::server::ApiServer;

/// Start the schedule API server
pub async fn serve(mut config: Config, bind: Option<SocketAddr>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }

    println!("Starting KITIS Schedule Server");
    println!("==============================");
    println!("  Host: {}", config.links.base);
    println!("  Bind: {}", config.server.bind_address);
    println!(
        "  CORS: {}",
        if config.server.enable_cors { "enabled" } else { "disabled" }
    );
    println!();

    let service = ScheduleService::init(&config).await;
    let server = ApiServer::new(config.server.clone(), service);

    println!("API Endpoints:");
    println!("  GET  /api/health  - Health check");
    println!("  POST /kitis/api   - Get schedule ({{\"role\", \"entity\"}})");
    println!("  GET  /kitis/ping  - Ping the timetable host");
    println!();
    println!("Listening on http://{}", server.bind_address());
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await
        .context("Server failed")?;

    println!("Server stopped.");
    Ok(())
}
