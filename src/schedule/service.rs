use serde::Deserialize;
use std::sync::Arc;

use super::projector::project;
use crate::config::{Config, LinksConfig};
use crate::crawler::{ConnectionManager, HttpTransport, LinkDirectory, PingReport, Transport};
use crate::error::Result;
use crate::models::{ProjectedSchedule, Role};
use crate::parser::parse_schedule;
use crate::utils::error::{FetchError, ValidationError};

/// Schedule request as sent by API clients
///
/// Older clients send `source_type`/`source` instead of `role`/`entity`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleRequest {
    #[serde(alias = "source_type")]
    pub role: String,

    #[serde(alias = "source")]
    pub entity: String,
}

impl ScheduleRequest {
    pub fn new(role: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            entity: entity.into(),
        }
    }

    /// Check the request shape and parse the role
    pub fn validate(&self) -> std::result::Result<Role, ValidationError> {
        let role = self.role.parse::<Role>()?;
        if self.entity.trim().is_empty() {
            return Err(ValidationError::MalformedRequest("entity must not be empty".to_string()));
        }
        Ok(role)
    }
}

/// Entry point of the engine: resolve, fetch, parse, project
///
/// Cheap to clone; clones share the connection manager (and so the identity)
/// and the directory.
pub struct ScheduleService<T: Transport = HttpTransport> {
    manager: Arc<ConnectionManager<T>>,
    directory: Arc<LinkDirectory>,
    probe_url: String,
}

impl<T: Transport> Clone for ScheduleService<T> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            directory: Arc::clone(&self.directory),
            probe_url: self.probe_url.clone(),
        }
    }
}

impl ScheduleService<HttpTransport> {
    /// Start the engine against the configured host
    pub async fn init(config: &Config) -> Self {
        Self::bootstrap(ConnectionManager::new(config), &config.links).await
    }
}

impl<T: Transport> ScheduleService<T> {
    /// Probe the host, build the directory, and write its snapshot
    ///
    /// A failed probe or snapshot is logged and startup continues; sources
    /// that cannot be indexed stay unavailable until restart.
    pub async fn bootstrap(manager: ConnectionManager<T>, links: &LinksConfig) -> Self {
        if let Err(e) = manager.probe(&links.probe).await {
            tracing::error!(url = %links.probe, error = %e, "Liveness probe failed, continuing degraded");
        }

        let directory = LinkDirectory::build(&manager, links).await;

        if let Some(path) = &links.snapshot_path {
            if let Err(e) = directory.write_snapshot(path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write link snapshot");
            }
        }

        Self::with_parts(Arc::new(manager), Arc::new(directory), links.probe.clone())
    }

    /// Assemble a service from already built parts
    pub fn with_parts(
        manager: Arc<ConnectionManager<T>>,
        directory: Arc<LinkDirectory>,
        probe_url: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            directory,
            probe_url: probe_url.into(),
        }
    }

    pub fn manager(&self) -> &ConnectionManager<T> {
        &self.manager
    }

    pub fn directory(&self) -> &LinkDirectory {
        &self.directory
    }

    /// Fetch and shape the schedule of one entity
    ///
    /// # Errors
    ///
    /// Validation errors for a bad role or an unlisted entity, fetch errors
    /// from the connection manager, and parse errors for an unexpected page.
    pub async fn get_schedule(&self, request: &ScheduleRequest) -> Result<ProjectedSchedule> {
        let role = request.validate()?;
        let entity = request.entity.as_str();

        let url = self.directory.resolve(role, entity)?;
        tracing::debug!(role = %role, entity, url, "Resolved entity");

        let html = self.manager.fetch(url).await?;
        let parsed = parse_schedule(&html)?;
        let projected = project(role, entity, &parsed)?;

        tracing::info!(role = %role, entity, days = projected.days.len(), "Served schedule");
        Ok(projected)
    }

    /// Ping the probe page
    pub async fn ping(&self) -> std::result::Result<PingReport, FetchError> {
        self.manager.ping(&self.probe_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_aliases() {
        let modern: ScheduleRequest =
            serde_json::from_str(r#"{"role": "group", "entity": "ИСс24-1"}"#).unwrap();
        let legacy: ScheduleRequest =
            serde_json::from_str(r#"{"source_type": "group", "source": "ИСс24-1"}"#).unwrap();
        assert_eq!(modern, legacy);
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(ScheduleRequest::new("room", "214").validate(), Ok(Role::Room));
        assert_eq!(
            ScheduleRequest::new("student", "x").validate(),
            Err(ValidationError::InvalidRole("student".to_string()))
        );
        assert!(matches!(
            ScheduleRequest::new("group", "  ").validate(),
            Err(ValidationError::MalformedRequest(_))
        ));
    }
}
