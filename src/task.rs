use std::fmt::Display;

use chrono::{Local, NaiveDate};
use inquire::error::InquireResult;
use inquire::validator::Validation;
use inquire::{CustomType, CustomUserError, Text};
use serde::{Deserialize, Serialize};

/// Textual form of the `date` column.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// One logged task. Field order matches the column order of the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskEntry {
    pub name: String,
    pub time: u32,
    pub notes: Option<String>,
    #[serde(with = "store_date")]
    pub date: NaiveDate,
}

impl Display for TaskEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Task name:  {}", self.name)?;
        writeln!(f, "  Time spent: {} minutes", self.time)?;
        writeln!(f, "  Date:       {}", self.date_text())?;
        write!(f, "  Notes:      {}", self.notes.as_deref().unwrap_or(""))
    }
}

impl TaskEntry {
    /// Collects a new entry from the user. The date is the local date at
    /// input time, not prompted for.
    pub fn prompt_new() -> InquireResult<Self> {
        let name = Text::new("Task name:").with_validator(non_blank).prompt()?;
        let time = prompt_minutes("Time spent (minutes):")?;
        let notes = Text::new("Notes (optional):").prompt()?;
        let date = Local::now().date_naive();
        Ok(Self {
            name,
            time,
            notes: normalize_notes(notes),
            date,
        })
    }

    /// Prompts for a replacement value of one field and returns the edited
    /// copy, leaving `self` untouched as the pre-edit snapshot.
    pub fn prompt_edit(&self, field: TaskField) -> InquireResult<Self> {
        let mut edited = self.clone();
        match field {
            TaskField::Name => {
                edited.name = Text::new("New task name:")
                    .with_validator(non_blank)
                    .prompt()?;
            }
            TaskField::Time => {
                edited.time = prompt_minutes("New time spent (minutes):")?;
            }
            TaskField::Notes => {
                let notes = Text::new("New notes:")
                    .with_help_message("Leave empty to clear the notes")
                    .prompt()?;
                edited.notes = normalize_notes(notes);
            }
            TaskField::Date => {
                edited.date = prompt_date("New date (MM/DD/YYYY):")?;
            }
        }
        Ok(edited)
    }

    /// The store's textual form of the date.
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// One field as text, the way the store and the regex filter see it.
    pub fn field_text(&self, field: TaskField) -> String {
        match field {
            TaskField::Name => self.name.clone(),
            TaskField::Time => self.time.to_string(),
            TaskField::Notes => self.notes.clone().unwrap_or_default(),
            TaskField::Date => self.date_text(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Name,
    Time,
    Notes,
    Date,
}

impl TaskField {
    pub const ALL: [TaskField; 4] = [
        TaskField::Name,
        TaskField::Time,
        TaskField::Notes,
        TaskField::Date,
    ];
}

impl Display for TaskField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskField::Name => "name",
            TaskField::Time => "time spent",
            TaskField::Notes => "notes",
            TaskField::Date => "date",
        };
        write!(f, "{label}")
    }
}

/// Blank or whitespace-only notes are stored as absent.
pub fn normalize_notes(notes: String) -> Option<String> {
    (!notes.trim().is_empty()).then_some(notes)
}

pub fn non_blank(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("Please enter some text.".into()))
    } else {
        Ok(Validation::Valid)
    }
}

/// End-of-range rule: the end date may not precede the start date.
pub fn valid_range(start: NaiveDate, end: NaiveDate) -> bool {
    start <= end
}

/// Shared prompt for a whole, strictly positive number of minutes.
pub fn prompt_minutes(message: &str) -> InquireResult<u32> {
    CustomType::<u32>::new(message)
        .with_validator(|&input: &u32| {
            if input == 0 {
                Ok(Validation::Invalid(
                    "Time spent must be at least one minute.".into(),
                ))
            } else {
                Ok(Validation::Valid)
            }
        })
        .with_error_message("Please enter a valid number")
        .prompt()
}

/// Shared prompt for a date typed in the fixed store format.
pub fn prompt_date(message: &str) -> InquireResult<NaiveDate> {
    CustomType::<NaiveDate>::new(message)
        .with_parser(&parse_date)
        .with_formatter(&format_date)
        .with_error_message("Dates must be valid and in format MM/DD/YYYY.")
        .prompt()
}

/// Date prompt that additionally rejects dates earlier than `start`.
pub fn prompt_date_after(message: &str, start: NaiveDate) -> InquireResult<NaiveDate> {
    CustomType::<NaiveDate>::new(message)
        .with_parser(&parse_date)
        .with_formatter(&format_date)
        .with_validator(move |input: &NaiveDate| {
            if valid_range(start, *input) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    "The end date cannot be earlier than the start date.".into(),
                ))
            }
        })
        .with_error_message("Dates must be valid and in format MM/DD/YYYY.")
        .prompt()
}

fn parse_date(input: &str) -> Result<NaiveDate, ()> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| ())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde codec for the `date` column in the fixed store format.
mod store_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_accepts_padded_and_bare_variants() {
        assert_eq!(parse_date("01/05/2024"), Ok(date(2024, 1, 5)));
        assert_eq!(parse_date("1/5/2024"), Ok(date(2024, 1, 5)));
        assert_eq!(parse_date(" 01/05/2024 "), Ok(date(2024, 1, 5)));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("2024-01-05").is_err());
        assert!(parse_date("13/01/2024").is_err());
        assert!(parse_date("02/30/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn date_text_is_zero_padded() {
        let entry = TaskEntry {
            name: "Task".to_string(),
            time: 5,
            notes: None,
            date: date(2024, 1, 5),
        };
        assert_eq!(entry.date_text(), "01/05/2024");
    }

    #[test]
    fn normalize_notes_stores_blank_as_absent() {
        assert_eq!(normalize_notes(String::new()), None);
        assert_eq!(normalize_notes("   ".to_string()), None);
        assert_eq!(normalize_notes("draft".to_string()), Some("draft".to_string()));
    }

    #[test]
    fn non_blank_rejects_whitespace_only_input() {
        assert!(matches!(non_blank("  "), Ok(Validation::Invalid(_))));
        assert!(matches!(non_blank(""), Ok(Validation::Invalid(_))));
        assert!(matches!(non_blank("write spec"), Ok(Validation::Valid)));
    }

    #[test]
    fn range_rule_allows_equal_dates_only_forward() {
        let start = date(2024, 1, 15);
        assert!(valid_range(start, start));
        assert!(valid_range(start, date(2024, 1, 16)));
        assert!(!valid_range(start, date(2024, 1, 14)));
    }

    #[test]
    fn field_text_matches_store_representation() {
        let entry = TaskEntry {
            name: "Write spec".to_string(),
            time: 45,
            notes: Some("draft".to_string()),
            date: date(2024, 1, 15),
        };
        assert_eq!(entry.field_text(TaskField::Name), "Write spec");
        assert_eq!(entry.field_text(TaskField::Time), "45");
        assert_eq!(entry.field_text(TaskField::Notes), "draft");
        assert_eq!(entry.field_text(TaskField::Date), "01/15/2024");
    }
}
