use inquire::error::InquireResult;
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Select, Text};
use regex::Regex;

use crate::errors::WorklogError;
use crate::query::{self, Filter, Hit};
use crate::store::Store;
use crate::task::{self, TaskEntry, TaskField};
use crate::WorklogConfig;

const MAIN_NEW: &str = "Enter a new task";
const MAIN_SEARCH: &str = "Search existing tasks";
const MAIN_QUIT: &str = "Quit";

const SEARCH_DATE: &str = "Find by date";
const SEARCH_TIME: &str = "Find by time spent";
const SEARCH_TEXT: &str = "Find by exact text";
const SEARCH_REGEX: &str = "Find by regular expression";
const SEARCH_BACK: &str = "Return to main menu";

const DATE_SINGLE: &str = "Specific date";
const DATE_RANGE: &str = "Date range";

const BROWSE_NEXT: &str = "Next result";
const BROWSE_EDIT: &str = "Edit this entry";
const BROWSE_DELETE: &str = "Delete this entry";
const BROWSE_BACK: &str = "Back to search menu";

/// Where the session is right now. Every prompt round resolves to the next
/// state, so the whole session is one flat loop.
#[derive(Debug)]
enum State {
    MainMenu,
    TaskEntry,
    SearchMenu,
    DateFind,
    TimeFind,
    ExactFind,
    RegexFind,
    Browse(Results),
    EditEntry(Results),
    Exit,
}

/// Outcome of a single prompt: a value, Esc to step back one level, or
/// Ctrl-C to quit the whole session.
enum Prompted<T> {
    Value(T),
    Back,
    Quit,
}

fn prompted<T>(result: InquireResult<T>) -> Result<Prompted<T>, WorklogError> {
    match result {
        Ok(value) => Ok(Prompted::Value(value)),
        Err(InquireError::OperationCanceled) => Ok(Prompted::Back),
        Err(InquireError::OperationInterrupted) => Ok(Prompted::Quit),
        Err(error) => Err(error.into()),
    }
}

/// A search result set being walked one entry at a time. Rows are store
/// positions captured at search time and are patched as mutations land.
#[derive(Debug)]
struct Results {
    hits: Vec<Hit>,
    cursor: usize,
}

impl Results {
    fn new(hits: Vec<Hit>) -> Self {
        Self { hits, cursor: 0 }
    }

    fn len(&self) -> usize {
        self.hits.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn current(&self) -> Option<&Hit> {
        self.hits.get(self.cursor)
    }

    fn has_next(&self) -> bool {
        self.cursor + 1 < self.hits.len()
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Records an edit that landed at store row `row`.
    fn note_edited(&mut self, row: usize, entry: TaskEntry) {
        if let Some(hit) = self.hits.get_mut(self.cursor) {
            hit.row = row;
            hit.entry = entry;
        }
    }

    /// Drops the current hit and shifts the remembered rows of every hit
    /// past the removed store row.
    fn note_removed(&mut self, row: usize) {
        if self.cursor < self.hits.len() {
            self.hits.remove(self.cursor);
        }
        for hit in &mut self.hits {
            if hit.row > row {
                hit.row -= 1;
            }
        }
    }
}

/// Runs the interactive session until the user quits.
pub fn run(store: &Store, config: &WorklogConfig) -> Result<(), WorklogError> {
    let mut state = State::MainMenu;
    loop {
        state = step(state, store, config)?;
        if matches!(state, State::Exit) {
            return Ok(());
        }
    }
}

fn step(state: State, store: &Store, config: &WorklogConfig) -> Result<State, WorklogError> {
    match state {
        State::MainMenu => main_menu(),
        State::TaskEntry => task_entry(store),
        State::SearchMenu => search_menu(),
        State::DateFind => date_find(store),
        State::TimeFind => time_find(store),
        State::ExactFind => exact_find(store),
        State::RegexFind => regex_find(store),
        State::Browse(results) => browse(results, store, config),
        State::EditEntry(results) => edit_entry(results, store),
        State::Exit => Ok(State::Exit),
    }
}

fn main_menu() -> Result<State, WorklogError> {
    let options = vec![MAIN_NEW, MAIN_SEARCH, MAIN_QUIT];
    let choice = match prompted(Select::new("What would you like to do?", options).prompt())? {
        Prompted::Value(choice) => choice,
        Prompted::Back | Prompted::Quit => return Ok(State::Exit),
    };
    let next = match choice {
        MAIN_NEW => State::TaskEntry,
        MAIN_SEARCH => State::SearchMenu,
        MAIN_QUIT => State::Exit,
        _ => unreachable!(),
    };
    Ok(next)
}

fn task_entry(store: &Store) -> Result<State, WorklogError> {
    let entry = match prompted(TaskEntry::prompt_new())? {
        Prompted::Value(entry) => entry,
        Prompted::Back => return Ok(State::MainMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    store.append(&entry)?;
    println!("\nThe task was added.\n");

    let again = Confirm::new("Add another task?").with_default(false);
    match prompted(again.prompt())? {
        Prompted::Value(true) => Ok(State::TaskEntry),
        Prompted::Value(false) | Prompted::Back => Ok(State::MainMenu),
        Prompted::Quit => Ok(State::Exit),
    }
}

fn search_menu() -> Result<State, WorklogError> {
    let options = vec![
        SEARCH_DATE,
        SEARCH_TIME,
        SEARCH_TEXT,
        SEARCH_REGEX,
        SEARCH_BACK,
    ];
    let choice = match prompted(Select::new("How do you want to search?", options).prompt())? {
        Prompted::Value(choice) => choice,
        Prompted::Back => return Ok(State::MainMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    let next = match choice {
        SEARCH_DATE => State::DateFind,
        SEARCH_TIME => State::TimeFind,
        SEARCH_TEXT => State::ExactFind,
        SEARCH_REGEX => State::RegexFind,
        SEARCH_BACK => State::MainMenu,
        _ => unreachable!(),
    };
    Ok(next)
}

fn date_find(store: &Store) -> Result<State, WorklogError> {
    let options = vec![DATE_SINGLE, DATE_RANGE];
    let mode = match prompted(
        Select::new("Search for a specific date or a range?", options).prompt(),
    )? {
        Prompted::Value(mode) => mode,
        Prompted::Back => return Ok(State::SearchMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    let filter = match mode {
        DATE_SINGLE => {
            let date = match prompted(task::prompt_date("Date (MM/DD/YYYY):"))? {
                Prompted::Value(date) => date,
                Prompted::Back => return Ok(State::DateFind),
                Prompted::Quit => return Ok(State::Exit),
            };
            Filter::Date(date)
        }
        DATE_RANGE => {
            let start = match prompted(task::prompt_date("Start date (MM/DD/YYYY):"))? {
                Prompted::Value(start) => start,
                Prompted::Back => return Ok(State::DateFind),
                Prompted::Quit => return Ok(State::Exit),
            };
            let end = match prompted(task::prompt_date_after("End date (MM/DD/YYYY):", start))? {
                Prompted::Value(end) => end,
                Prompted::Back => return Ok(State::DateFind),
                Prompted::Quit => return Ok(State::Exit),
            };
            Filter::DateRange(start, end)
        }
        _ => unreachable!(),
    };
    finish_search(store, &filter)
}

fn time_find(store: &Store) -> Result<State, WorklogError> {
    let minutes = match prompted(task::prompt_minutes("Time spent (minutes):"))? {
        Prompted::Value(minutes) => minutes,
        Prompted::Back => return Ok(State::SearchMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    finish_search(store, &Filter::Time(minutes))
}

fn exact_find(store: &Store) -> Result<State, WorklogError> {
    let prompt = Text::new("Text to find:")
        .with_validator(task::non_blank)
        .with_help_message("Case-sensitive; matches task names and notes");
    let needle = match prompted(prompt.prompt())? {
        Prompted::Value(needle) => needle,
        Prompted::Back => return Ok(State::SearchMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    finish_search(store, &Filter::Text(needle))
}

fn regex_find(store: &Store) -> Result<State, WorklogError> {
    let prompt = Text::new("Pattern to find:")
        .with_validator(|input: &str| match Regex::new(input) {
            Ok(_) => Ok(Validation::Valid),
            Err(_) => Ok(Validation::Invalid(
                "That is not a valid regular expression. Try again.".into(),
            )),
        })
        .with_help_message("Matches any field, dates as MM/DD/YYYY");
    let pattern = match prompted(prompt.prompt())? {
        Prompted::Value(pattern) => pattern,
        Prompted::Back => return Ok(State::SearchMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    finish_search(store, &Filter::Pattern(Regex::new(&pattern)?))
}

/// Loads the store fresh and either starts browsing the hits or reports
/// that nothing matched.
fn finish_search(store: &Store, filter: &Filter) -> Result<State, WorklogError> {
    let entries = store.load_all()?;
    let hits = query::search(&entries, filter);
    if hits.is_empty() {
        println!("\nNo results found.\n");
        return Ok(State::SearchMenu);
    }
    Ok(State::Browse(Results::new(hits)))
}

fn browse(
    mut results: Results,
    store: &Store,
    config: &WorklogConfig,
) -> Result<State, WorklogError> {
    let hit = match results.current() {
        Some(hit) => hit,
        None => {
            println!("\nEnd of search results.\n");
            return Ok(State::SearchMenu);
        }
    };
    println!("\nResult {} of {}", results.cursor() + 1, results.len());
    println!("{}\n", hit.entry);

    let mut options = Vec::new();
    if results.has_next() {
        options.push(BROWSE_NEXT);
    }
    options.extend([BROWSE_EDIT, BROWSE_DELETE, BROWSE_BACK]);

    let choice = match prompted(
        Select::new("What do you want to do with this result?", options).prompt(),
    )? {
        Prompted::Value(choice) => choice,
        Prompted::Back => return Ok(State::SearchMenu),
        Prompted::Quit => return Ok(State::Exit),
    };
    match choice {
        BROWSE_NEXT => {
            results.advance();
            Ok(State::Browse(results))
        }
        BROWSE_EDIT => Ok(State::EditEntry(results)),
        BROWSE_DELETE => delete_entry(results, store, config),
        BROWSE_BACK => Ok(State::SearchMenu),
        _ => unreachable!(),
    }
}

fn delete_entry(
    mut results: Results,
    store: &Store,
    config: &WorklogConfig,
) -> Result<State, WorklogError> {
    let (row, snapshot) = match results.current() {
        Some(hit) => (hit.row, hit.entry.clone()),
        None => return Ok(State::Browse(results)),
    };
    if config.confirm_delete {
        let confirm = Confirm::new("Delete this entry?").with_default(false);
        match prompted(confirm.prompt())? {
            Prompted::Value(true) => {}
            Prompted::Value(false) | Prompted::Back => return Ok(State::Browse(results)),
            Prompted::Quit => return Ok(State::Exit),
        }
    }
    match store.remove(row, &snapshot)? {
        Some(removed) => {
            println!("\nEntry deleted!\n");
            results.note_removed(removed);
        }
        None => println!("\nThis entry is no longer in the store; nothing was deleted.\n"),
    }
    Ok(State::Browse(results))
}

fn edit_entry(mut results: Results, store: &Store) -> Result<State, WorklogError> {
    let (row, snapshot) = match results.current() {
        Some(hit) => (hit.row, hit.entry.clone()),
        None => return Ok(State::Browse(results)),
    };
    let fields = TaskField::ALL.to_vec();
    let field = match prompted(Select::new("Which field do you want to edit?", fields).prompt())? {
        Prompted::Value(field) => field,
        Prompted::Back => return Ok(State::Browse(results)),
        Prompted::Quit => return Ok(State::Exit),
    };
    println!("Current {}: {}", field, snapshot.field_text(field));

    let edited = match prompted(snapshot.prompt_edit(field))? {
        Prompted::Value(edited) => edited,
        Prompted::Back => return Ok(State::Browse(results)),
        Prompted::Quit => return Ok(State::Exit),
    };
    match store.replace(row, &snapshot, edited.clone())? {
        Some(replaced) => {
            println!("\nEntry edited!\n");
            results.note_edited(replaced, edited);
        }
        None => println!("\nThis entry is no longer in the store; nothing was edited.\n"),
    }
    Ok(State::Browse(results))
}
