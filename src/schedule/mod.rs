//! Role-specific schedule views
//!
//! Turns a parsed page into what a group, lecturer or room asked for, and
//! wires the whole request path together in [`ScheduleService`].

pub mod bells;
pub mod projector;
pub mod service;

pub use projector::project;
pub use service::{ScheduleRequest, ScheduleService};
