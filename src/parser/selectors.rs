//! CSS selectors for the timetable generator's pages
//!
//! Every class name the upstream markup uses lives here, so a markup change
//! on the site touches only this file.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Class of the spacer cell that separates days
pub const SPACER_CLASS: &str = "hd0";

/// Link classes carrying the three lesson text fields, in field order
pub const LESSON_FIELD_CLASSES: [&str; 3] = ["z1", "z2", "z3"];

lazy_static! {
    /// Main data table on both index and schedule pages
    pub static ref DATA_TABLE: Selector = parse_selector!("table.inf");

    pub static ref ROW: Selector = parse_selector!("tr");

    pub static ref CELL: Selector = parse_selector!("td");

    pub static ref LINK: Selector = parse_selector!("a");

    /// Page heading naming the entity
    pub static ref HEADING: Selector = parse_selector!("h1");

    /// "Updated at" block
    pub static ref UPDATE_TIME: Selector = parse_selector!("div.ref");

    /// Index cells that belong to an entity row
    pub static ref ENTITY_CELL: Selector = parse_selector!("td.ur");

    /// Link to an entity's page inside an index row
    pub static ref ENTITY_LINK: Selector = parse_selector!("a.z0");
}
