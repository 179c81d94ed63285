use crate::models::{
    LessonDetails, ParsedSchedule, ProjectedDay, ProjectedLesson, ProjectedSchedule, RawLesson,
    Role,
};
use crate::utils::error::ParseError;

use super::bells;

/// Shape a parsed page into the view of `role`
///
/// Every day of `parsed` appears in the output, in page order. A lesson whose
/// number has no bell time fails the whole projection.
///
/// # Errors
///
/// Returns `ParseError::UnknownLessonNumber` for a lesson number outside the
/// bell table of its weekday.
pub fn project(
    role: Role,
    entity: &str,
    parsed: &ParsedSchedule,
) -> Result<ProjectedSchedule, ParseError> {
    let days = parsed
        .days
        .iter()
        .map(|day| {
            let lessons = day
                .lessons
                .iter()
                .map(|lesson| {
                    let bells = bells::lookup(day.weekday, &lesson.number).ok_or_else(|| {
                        ParseError::UnknownLessonNumber {
                            date: day.date.clone(),
                            number: lesson.number.clone(),
                        }
                    })?;

                    Ok(ProjectedLesson {
                        number: lesson.number.clone(),
                        bells: bells.to_string(),
                        details: relabel(role, lesson),
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()?;

            Ok(ProjectedDay {
                date: day.date.clone(),
                weekday: day.weekday,
                lessons,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(ProjectedSchedule {
        head: entity.to_string(),
        update_time: parsed.update_time.clone(),
        days,
    })
}

/// Give the three raw fields their meaning for `role`
fn relabel(role: Role, lesson: &RawLesson) -> LessonDetails {
    let RawLesson {
        field1,
        field2,
        field3,
        subgroup,
        ..
    } = lesson.clone();

    match role {
        Role::Group => LessonDetails::Group {
            name: field1,
            room: field2,
            lecturer: field3,
            subgroup,
        },
        Role::Lecturer => LessonDetails::Lecturer {
            group: field1,
            room: field2,
            name: field3,
        },
        Role::Room => LessonDetails::Room {
            lecturer: field1,
            group: field2,
            name: field3,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Subgroup, Weekday};

    fn lesson(number: &str, subgroup: Subgroup) -> RawLesson {
        RawLesson {
            number: number.to_string(),
            field1: "f1".to_string(),
            field2: "f2".to_string(),
            field3: "f3".to_string(),
            subgroup,
        }
    }

    fn parsed(days: Vec<Day>) -> ParsedSchedule {
        ParsedSchedule {
            header: "Расписание".to_string(),
            update_time: "Обновлено: 01.09.2025 в 12:00".to_string(),
            days,
        }
    }

    #[test]
    fn test_monday_and_weekly_bells() {
        let schedule = parsed(vec![
            Day {
                date: "01.09.2025".to_string(),
                weekday: Weekday::Monday,
                lessons: vec![lesson("1", Subgroup::Whole)],
            },
            Day {
                date: "02.09.2025".to_string(),
                weekday: Weekday::Tuesday,
                lessons: vec![lesson("1", Subgroup::Whole)],
            },
        ]);

        let projected = project(Role::Group, "ИСс24-1", &schedule).unwrap();
        assert_eq!(projected.head, "ИСс24-1");
        assert_eq!(projected.update_time, schedule.update_time);
        assert_eq!(projected.days.len(), 2);
        assert_eq!(
            projected.day("01.09.2025").unwrap().lessons[0].bells,
            "8:30-9:00 / 15:20-15:50"
        );
        assert_eq!(projected.day("02.09.2025").unwrap().lessons[0].bells, "8:30-10:00");
    }

    #[test]
    fn test_relabel_per_role() {
        let raw = lesson("2", Subgroup::Second);

        assert_eq!(
            relabel(Role::Group, &raw),
            LessonDetails::Group {
                name: "f1".to_string(),
                room: "f2".to_string(),
                lecturer: "f3".to_string(),
                subgroup: Subgroup::Second,
            }
        );
        assert_eq!(
            relabel(Role::Lecturer, &raw),
            LessonDetails::Lecturer {
                group: "f1".to_string(),
                room: "f2".to_string(),
                name: "f3".to_string(),
            }
        );
        assert_eq!(
            relabel(Role::Room, &raw),
            LessonDetails::Room {
                lecturer: "f1".to_string(),
                group: "f2".to_string(),
                name: "f3".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_lesson_number_fails() {
        let schedule = parsed(vec![Day {
            date: "03.09.2025".to_string(),
            weekday: Weekday::Wednesday,
            lessons: vec![lesson("1", Subgroup::Whole), lesson("8", Subgroup::Whole)],
        }]);

        let err = project(Role::Lecturer, "Иванова И.И.", &schedule).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownLessonNumber {
                date: "03.09.2025".to_string(),
                number: "8".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_day_kept() {
        let schedule = parsed(vec![Day {
            date: "06.09.2025".to_string(),
            weekday: Weekday::Saturday,
            lessons: Vec::new(),
        }]);

        let projected = project(Role::Room, "214", &schedule).unwrap();
        assert_eq!(projected.days.len(), 1);
        assert!(projected.days[0].lessons.is_empty());
    }
}
