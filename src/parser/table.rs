//! Schedule table normalization
//!
//! The schedule table mixes four row shapes. Rows that open a day carry the
//! date in their first cell; rows that continue a day omit it and rely on the
//! date opened earlier. [`RowKind`] names the shapes and [`parse_schedule`]
//! threads the current day through the rows explicitly.

use scraper::{CaseSensitivity, ElementRef, Html};

use super::selectors::{
    CELL, DATA_TABLE, HEADING, LESSON_FIELD_CLASSES, LINK, ROW, SPACER_CLASS, UPDATE_TIME,
};
use crate::models::{Day, ParsedSchedule, RawLesson, Subgroup, Weekday};
use crate::utils::error::ParseError;
use crate::utils::normalize_whitespace;

/// Placeholder for a lesson whose room field is empty
pub const ROOM_NOT_SPECIFIED: &str = "room not specified";

/// Header rows at the top of the table that carry no lessons
const HEADER_ROWS: usize = 2;

/// Shape of one table body row
#[derive(Debug, Clone, Copy)]
pub enum RowKind<'a> {
    /// Opens a day; the two subgroups have different lessons in this slot
    SplitDay {
        day: ElementRef<'a>,
        number: ElementRef<'a>,
        first: ElementRef<'a>,
        second: ElementRef<'a>,
    },
    /// Opens a day; one lesson for the whole class
    WholeDay {
        day: ElementRef<'a>,
        number: ElementRef<'a>,
        lesson: ElementRef<'a>,
    },
    /// Continues the current day; subgroups differ
    SplitContinuation {
        number: ElementRef<'a>,
        first: ElementRef<'a>,
        second: ElementRef<'a>,
    },
    /// Continues the current day; one lesson for the whole class
    WholeContinuation {
        number: ElementRef<'a>,
        lesson: ElementRef<'a>,
    },
    /// Empty separator row
    Spacer,
}

impl<'a> RowKind<'a> {
    /// Classify a row by cell count and whether the first cell holds a date
    ///
    /// `row` is the 1-based row position on the page, used in errors.
    pub fn classify(cells: &[ElementRef<'a>], row: usize) -> Result<Self, ParseError> {
        let Some(first_cell) = cells.first() else {
            return Ok(Self::Spacer);
        };
        if first_cell
            .value()
            .has_class(SPACER_CLASS, CaseSensitivity::CaseSensitive)
        {
            return Ok(Self::Spacer);
        }

        let has_date = cell_text(*first_cell).chars().count() > 1;

        match (cells, has_date) {
            (&[day, number, first, second], true) => Ok(Self::SplitDay {
                day,
                number,
                first,
                second,
            }),
            (&[day, number, lesson], true) => Ok(Self::WholeDay {
                day,
                number,
                lesson,
            }),
            (&[number, first, second], false) => Ok(Self::SplitContinuation {
                number,
                first,
                second,
            }),
            (&[number, lesson], false) => Ok(Self::WholeContinuation { number, lesson }),
            _ => Err(ParseError::UnexpectedRowShape {
                row,
                cells: cells.len(),
            }),
        }
    }
}

/// Parse one schedule page into days of raw lessons
///
/// # Errors
///
/// Returns a `ParseError` when a page landmark is missing, a row matches no
/// known shape, a continuation row precedes every day row, or a day cell
/// cannot be read. Nothing partial is returned.
///
/// # Examples
///
/// ```
/// use kitis::parser::parse_schedule;
///
/// let html = r#"
///     <h1>ИСс24-1</h1><div class="ref">01.09.2025 08:00</div>
///     <table class="inf">
///         <tr><th>Дата</th></tr><tr><th>Пара</th></tr>
///         <tr><td>01.09.2025 Пн</td><td>1</td><td><a class="z1">Математика</a></td></tr>
///     </table>"#;
/// let parsed = parse_schedule(html).unwrap();
/// assert_eq!(parsed.days[0].lessons[0].field1, "Математика");
/// ```
pub fn parse_schedule(html: &str) -> Result<ParsedSchedule, ParseError> {
    let document = Html::parse_document(html);

    let header = document
        .select(&HEADING)
        .next()
        .map(cell_text)
        .ok_or(ParseError::MissingLandmark("h1"))?;
    let update_time = document
        .select(&UPDATE_TIME)
        .next()
        .map(cell_text)
        .ok_or(ParseError::MissingLandmark("div.ref"))?;
    let table = document
        .select(&DATA_TABLE)
        .next()
        .ok_or(ParseError::MissingLandmark("table.inf"))?;

    let mut days: Vec<Day> = Vec::new();
    let mut current: Option<usize> = None;

    for (offset, row) in table.select(&ROW).enumerate().skip(HEADER_ROWS) {
        let row_no = offset + 1;
        let cells: Vec<ElementRef> = row.select(&CELL).collect();

        match RowKind::classify(&cells, row_no)? {
            RowKind::Spacer => {}
            RowKind::SplitDay {
                day,
                number,
                first,
                second,
            } => {
                let index = open_day(&mut days, day)?;
                current = Some(index);
                let number = cell_text(number);
                push_lesson(&mut days[index], first, &number, Subgroup::First);
                push_lesson(&mut days[index], second, &number, Subgroup::Second);
            }
            RowKind::WholeDay {
                day,
                number,
                lesson,
            } => {
                let index = open_day(&mut days, day)?;
                current = Some(index);
                push_lesson(&mut days[index], lesson, &cell_text(number), Subgroup::Whole);
            }
            RowKind::SplitContinuation {
                number,
                first,
                second,
            } => {
                let index = current.ok_or(ParseError::ContinuationBeforeDate { row: row_no })?;
                let number = cell_text(number);
                push_lesson(&mut days[index], first, &number, Subgroup::First);
                push_lesson(&mut days[index], second, &number, Subgroup::Second);
            }
            RowKind::WholeContinuation { number, lesson } => {
                let index = current.ok_or(ParseError::ContinuationBeforeDate { row: row_no })?;
                push_lesson(&mut days[index], lesson, &cell_text(number), Subgroup::Whole);
            }
        }
    }

    tracing::debug!(header = %header, days = days.len(), "Parsed schedule table");

    Ok(ParsedSchedule {
        header,
        update_time,
        days,
    })
}

/// Open the day named by a `"<date> <weekday>"` cell, returning its index
///
/// A date seen before is reset in place rather than duplicated.
fn open_day(days: &mut Vec<Day>, cell: ElementRef) -> Result<usize, ParseError> {
    let text = cell.text().collect::<Vec<_>>().join(" ");
    let mut parts = text.split_whitespace();
    let (Some(date), Some(abbrev), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::MalformedDayCell(normalize_whitespace(&text)));
    };
    let weekday = Weekday::from_abbrev(abbrev)?;

    let day = Day {
        date: date.to_string(),
        weekday,
        lessons: Vec::new(),
    };

    if let Some(index) = days.iter().position(|d| d.date == date) {
        days[index] = day;
        Ok(index)
    } else {
        days.push(day);
        Ok(days.len() - 1)
    }
}

fn push_lesson(day: &mut Day, cell: ElementRef, number: &str, subgroup: Subgroup) {
    if let Some(lesson) = extract_lesson(cell, number, subgroup) {
        day.lessons.push(lesson);
    }
}

/// Read one lesson cell; `None` means a free period
///
/// Links are sorted into the three fields by their style class and their
/// texts concatenated per field.
pub fn extract_lesson(cell: ElementRef, number: &str, subgroup: Subgroup) -> Option<RawLesson> {
    let mut fields: [Option<String>; 3] = [None, None, None];

    for link in cell.select(&LINK) {
        let Some(slot) = LESSON_FIELD_CLASSES
            .iter()
            .position(|class| link.value().has_class(class, CaseSensitivity::CaseSensitive))
        else {
            continue;
        };
        let field = fields[slot].get_or_insert_with(String::new);
        field.push_str(&link.text().collect::<String>());
        field.push(' ');
    }

    if fields.iter().all(Option::is_none) {
        return None;
    }

    let [field1, field2, field3] =
        fields.map(|f| f.map(|s| s.trim().to_string()).unwrap_or_default());
    let field2 = if field2.is_empty() {
        ROOM_NOT_SPECIFIED.to_string()
    } else {
        field2
    };

    Some(RawLesson {
        number: number.to_string(),
        field1,
        field2,
        field3,
        subgroup,
    })
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
