use anyhow::Result;

use kitis::config::Config;
use kitis::crawler::ConnectionManager;

/// Ping the host once and print status and timing
pub async fn ping(config: Config, url: Option<String>) -> Result<()> {
    let url = url.unwrap_or_else(|| config.links.probe.clone());
    let manager = ConnectionManager::new(&config);

    let report = manager.ping(&url).await?;

    println!("Ping {url}");
    println!("  Status: {} ({})", report.code, report.status);
    println!("  Time: {:.3}s", report.time);
    Ok(())
}
