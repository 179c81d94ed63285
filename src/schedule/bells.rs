//! Bell tables
//!
//! Monday has its own timetable because of the weekly assembly; every other
//! day uses the standard one.

use crate::models::Weekday;

/// Lesson number to time range, Monday
pub const MONDAY: [(&str, &str); 7] = [
    ("1", "8:30-9:00 / 15:20-15:50"),
    ("2", "9:10-10:30"),
    ("3", "10:40-12:00"),
    ("4", "12:20-13:40"),
    ("5", "13:50-15:10"),
    ("6", "16:00-17:20"),
    ("7", "17:30-18:50"),
];

/// Lesson number to time range, Tuesday to Sunday
pub const WEEKLY: [(&str, &str); 7] = [
    ("1", "8:30-10:00"),
    ("2", "10:10-11:40"),
    ("3", "12:10-13:40"),
    ("4", "13:50-15:20"),
    ("5", "15:30-17:00"),
    ("6", "17:10-18:40"),
    ("7", "18:50-20:20"),
];

/// Table that applies on the given weekday
pub fn table_for(weekday: Weekday) -> &'static [(&'static str, &'static str)] {
    match weekday {
        Weekday::Monday => &MONDAY,
        _ => &WEEKLY,
    }
}

/// Time range of a lesson, or `None` if the number is not in the table
pub fn lookup(weekday: Weekday, number: &str) -> Option<&'static str> {
    table_for(weekday)
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, time)| *time)
}
