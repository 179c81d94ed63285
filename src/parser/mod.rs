//! HTML parsing and data extraction
//!
//! This module turns the timetable generator's pages into structured data:
//! entity index pages into name/URL pairs and schedule pages into days of
//! raw lessons. All knowledge of the page markup stays inside this module.

pub mod index;
pub mod selectors;
pub mod table;

// Re-export main parsers and public types
pub use index::parse_index;
pub use table::{parse_schedule, RowKind, ROOM_NOT_SPECIFIED};
