use anyhow::{Context, Result};

use kitis::config::Config;
use kitis::schedule::{ScheduleRequest, ScheduleService};

/// Fetch one entity's schedule and print it as JSON
pub async fn schedule(config: Config, role: String, entity: String) -> Result<()> {
    let service = ScheduleService::init(&config).await;
    let request = ScheduleRequest::new(role, entity);

    let projected = service
        .get_schedule(&request)
        .await
        .with_context(|| format!("Failed to get schedule for {} {}", request.role, request.entity))?;

    println!("{}", serde_json::to_string_pretty(&projected)?);
    Ok(())
}
