//! kitis - KITIS college timetable extraction engine
//!
//! Turns the college's human-oriented HTML timetable into structured,
//! role-specific schedules for groups, lecturers and rooms.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Connection manager, identity rotation and the link directory
//! - [`parser`] - Index and schedule page parsing
//! - [`schedule`] - Bell tables, role projection and the engine façade
//! - [`server`] - HTTP API over the engine
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use kitis::config::Config;
//! use kitis::schedule::{ScheduleRequest, ScheduleService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let service = ScheduleService::init(&config).await;
//!     let schedule = service
//!         .get_schedule(&ScheduleRequest::new("group", "ИСс24-1"))
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&schedule)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod schedule;
pub mod server;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{ConnectionManager, LinkDirectory, Transport};
    pub use crate::error::{Error, ErrorCategory, FailureSignal, Result};
    pub use crate::models::{ParsedSchedule, ProjectedSchedule, Role, Source};
    pub use crate::parser::parse_schedule;
    pub use crate::schedule::{project, ScheduleRequest, ScheduleService};
}

// Direct re-exports for convenience
pub use models::{ProjectedSchedule, Role};
