// Core data structures for the kitis schedule engine

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{ParseError, ValidationError};

/// Schedule viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Group,
    Lecturer,
    Room,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Group, Role::Lecturer, Role::Room];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Lecturer => "lecturer",
            Self::Room => "room",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(Self::Group),
            "lecturer" => Ok(Self::Lecturer),
            "room" => Ok(Self::Room),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }
}

/// Whether an index page lists schedules or historical records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Schedule,
    Records,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Schedule, Category::Records];

    fn prefix(&self) -> &'static str {
        match self {
            Self::Schedule => "s",
            Self::Records => "r",
        }
    }
}

/// One (category, role) index on the upstream site, e.g. `s_group`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Source {
    pub category: Category,
    pub role: Role,
}

impl Source {
    pub fn new(category: Category, role: Role) -> Self {
        Self { category, role }
    }

    pub fn schedule(role: Role) -> Self {
        Self::new(Category::Schedule, role)
    }

    /// Every (category, role) pair, schedules first
    pub fn all() -> impl Iterator<Item = Source> {
        Category::ALL
            .into_iter()
            .flat_map(|category| Role::ALL.into_iter().map(move |role| Source::new(category, role)))
    }

    /// Snapshot key, `s_group` / `r_lecturer` / ...
    pub fn key(&self) -> String {
        format!("{}_{}", self.category.prefix(), self.role.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Sub-division of a class group sharing one lesson slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subgroup {
    /// Whole class
    Whole,
    First,
    Second,
}

impl Subgroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whole => "0",
            Self::First => "1",
            Self::Second => "2",
        }
    }
}

impl Serialize for Subgroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Day of the week as printed by the timetable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Expand the two-letter abbreviation used on the upstream pages
    pub fn from_abbrev(abbrev: &str) -> Result<Self, ParseError> {
        match abbrev {
            "Пн" => Ok(Self::Monday),
            "Вт" => Ok(Self::Tuesday),
            "Ср" => Ok(Self::Wednesday),
            "Чт" => Ok(Self::Thursday),
            "Пт" => Ok(Self::Friday),
            "Сб" => Ok(Self::Saturday),
            "Вс" => Ok(Self::Sunday),
            other => Err(ParseError::UnknownWeekday(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One scheduled slot before role interpretation
///
/// The meaning of `field1..field3` depends on whose page was parsed:
/// a group page carries subject/room/lecturer, a lecturer page
/// group/room/subject, a room page lecturer/group/subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLesson {
    pub number: String,
    pub field1: String,
    pub field2: String,
    pub field3: String,
    pub subgroup: Subgroup,
}

/// A calendar day of the parsed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    /// Date exactly as printed by the source
    pub date: String,
    pub weekday: Weekday,
    pub lessons: Vec<RawLesson>,
}

/// Intermediate result of parsing one schedule page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSchedule {
    pub header: String,
    pub update_time: String,
    /// Days in page order
    pub days: Vec<Day>,
}

impl ParsedSchedule {
    /// Look up a day by its printed date
    pub fn day(&self, date: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// Role-specific labels of a projected lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LessonDetails {
    Group {
        name: String,
        room: String,
        lecturer: String,
        subgroup: Subgroup,
    },
    Lecturer {
        group: String,
        room: String,
        name: String,
    },
    Room {
        lecturer: String,
        group: String,
        name: String,
    },
}

/// A lesson relabeled for the requesting role and annotated with its bell time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedLesson {
    pub number: String,
    pub bells: String,
    #[serde(flatten)]
    pub details: LessonDetails,
}

/// One day of the final output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedDay {
    pub date: String,
    pub weekday: Weekday,
    pub lessons: Vec<ProjectedLesson>,
}

/// Final role-shaped schedule returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedSchedule {
    pub head: String,
    pub update_time: String,
    #[serde(serialize_with = "serialize_days")]
    pub days: Vec<ProjectedDay>,
}

impl ProjectedSchedule {
    pub fn day(&self, date: &str) -> Option<&ProjectedDay> {
        self.days.iter().find(|d| d.date == date)
    }
}

#[derive(Serialize)]
struct DayBody<'a> {
    weekday: Weekday,
    lessons: &'a [ProjectedLesson],
}

/// Serialize days as a `{date: {weekday, lessons}}` object, keeping page order
fn serialize_days<S: Serializer>(days: &[ProjectedDay], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(days.len()))?;
    for day in days {
        map.serialize_entry(
            &day.date,
            &DayBody {
                weekday: day.weekday,
                lessons: &day.lessons,
            },
        )?;
    }
    map.end()
}
