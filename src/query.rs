use chrono::NaiveDate;
use regex::Regex;

use crate::task::TaskEntry;

/// One search criterion. Every search applies exactly one filter to the
/// whole store.
#[derive(Debug, Clone)]
pub enum Filter {
    Date(NaiveDate),
    DateRange(NaiveDate, NaiveDate),
    Time(u32),
    Text(String),
    Pattern(Regex),
}

impl Filter {
    pub fn matches(&self, entry: &TaskEntry) -> bool {
        match self {
            Filter::Date(date) => entry.date == *date,
            Filter::DateRange(start, end) => *start <= entry.date && entry.date <= *end,
            Filter::Time(minutes) => entry.time == *minutes,
            Filter::Text(needle) => {
                entry.name.contains(needle)
                    || entry.notes.as_deref().unwrap_or("").contains(needle)
            }
            Filter::Pattern(pattern) => {
                pattern.is_match(&entry.name)
                    || pattern.is_match(&entry.time.to_string())
                    || pattern.is_match(entry.notes.as_deref().unwrap_or(""))
                    || pattern.is_match(&entry.date_text())
            }
        }
    }
}

/// A matching entry together with the store row it was found at.
#[derive(Debug, Clone)]
pub struct Hit {
    pub row: usize,
    pub entry: TaskEntry,
}

/// Filters `entries` in store order.
pub fn search(entries: &[TaskEntry], filter: &Filter) -> Vec<Hit> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry))
        .map(|(row, entry)| Hit {
            row,
            entry: entry.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> Vec<TaskEntry> {
        vec![
            TaskEntry {
                name: "Write spec".to_string(),
                time: 45,
                notes: Some("draft".to_string()),
                date: date(2024, 1, 15),
            },
            TaskEntry {
                name: "Review log".to_string(),
                time: 30,
                notes: None,
                date: date(2024, 1, 20),
            },
            TaskEntry {
                name: "Standup".to_string(),
                time: 15,
                notes: Some("Log decisions".to_string()),
                date: date(2024, 2, 1),
            },
        ]
    }

    fn rows(hits: &[Hit]) -> Vec<usize> {
        hits.iter().map(|hit| hit.row).collect()
    }

    #[test]
    fn exact_date_matches_calendar_equality() {
        let entries = fixture();
        let hits = search(&entries, &Filter::Date(date(2024, 1, 20)));
        assert_eq!(rows(&hits), vec![1]);
    }

    #[test]
    fn date_range_includes_both_boundaries() {
        let entries = fixture();
        let filter = Filter::DateRange(date(2024, 1, 15), date(2024, 2, 1));
        assert_eq!(rows(&search(&entries, &filter)), vec![0, 1, 2]);
    }

    #[test]
    fn date_range_single_day() {
        let entries = fixture();
        let filter = Filter::DateRange(date(2024, 1, 20), date(2024, 1, 20));
        assert_eq!(rows(&search(&entries, &filter)), vec![1]);
    }

    #[test]
    fn time_match_is_exact_not_a_range() {
        let entries = fixture();
        assert_eq!(rows(&search(&entries, &Filter::Time(30))), vec![1]);
        assert_eq!(rows(&search(&entries, &Filter::Time(31))), Vec::<usize>::new());
    }

    #[test]
    fn substring_is_case_sensitive() {
        let entries = fixture();
        let hits = search(&entries, &Filter::Text("Log".to_string()));
        assert_eq!(rows(&hits), vec![2]);
    }

    #[test]
    fn substring_searches_name_and_notes_only() {
        let entries = fixture();
        // "15" appears in a time and a date but in no name or notes.
        let hits = search(&entries, &Filter::Text("15".to_string()));
        assert_eq!(rows(&hits), Vec::<usize>::new());

        let hits = search(&entries, &Filter::Text("draft".to_string()));
        assert_eq!(rows(&hits), vec![0]);
    }

    #[test]
    fn regex_reaches_every_field() {
        let entries = fixture();
        let by_date = Filter::Pattern(Regex::new("^01/").unwrap());
        assert_eq!(rows(&search(&entries, &by_date)), vec![0, 1]);

        let by_time = Filter::Pattern(Regex::new("^45$").unwrap());
        assert_eq!(rows(&search(&entries, &by_time)), vec![0]);

        let by_notes = Filter::Pattern(Regex::new("decision").unwrap());
        assert_eq!(rows(&search(&entries, &by_notes)), vec![2]);
    }

    #[test]
    fn absent_notes_match_patterns_for_empty_text() {
        let entries = fixture();
        let empty_notes = Filter::Pattern(Regex::new("^$").unwrap());
        assert_eq!(rows(&search(&entries, &empty_notes)), vec![1]);
    }

    #[test]
    fn results_preserve_store_order() {
        let entries = fixture();
        let filter = Filter::DateRange(date(2024, 1, 1), date(2024, 12, 31));
        let hits = search(&entries, &filter);
        assert_eq!(rows(&hits), vec![0, 1, 2]);
        assert_eq!(hits[0].entry.name, "Write spec");
        assert_eq!(hits[2].entry.name, "Standup");
    }
}
