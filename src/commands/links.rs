use anyhow::{Context, Result};
use std::path::PathBuf;

use kitis::config::Config;
use kitis::crawler::{ConnectionManager, LinkDirectory};

/// Build the link directory and dump it
///
/// Writes to `output` when given, otherwise prints to stdout.
pub async fn links(config: Config, output: Option<PathBuf>) -> Result<()> {
    let manager = ConnectionManager::new(&config);

    if let Err(e) = manager.probe(&config.links.probe).await {
        tracing::warn!(error = %e, "Liveness probe failed");
    }

    let directory = LinkDirectory::build(&manager, &config.links).await;

    match output {
        Some(path) => {
            directory
                .write_snapshot(&path)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Link directory written to {}", path.display());
        }
        None => println!("{}", directory.to_snapshot()?),
    }

    let available: Vec<String> = directory.available().map(|s| s.key()).collect();
    println!("Available sources: {}", available.join(", "));
    Ok(())
}
