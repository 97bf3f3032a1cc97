use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use csv::{Reader, WriterBuilder};

use crate::errors::WorklogError;
use crate::task::TaskEntry;

/// Column order of the store file. Serialization relies on the field order
/// of [`TaskEntry`] matching this.
pub const COLUMNS: [&str; 4] = ["name", "time", "notes", "date"];

/// The on-disk work log: one CSV file, loaded whole and rewritten whole on
/// every mutation.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the file and header row if needed.
    pub fn append(&self, entry: &TaskEntry) -> Result<(), WorklogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_empty = file.metadata()?.len() == 0;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_empty {
            writer.write_record(COLUMNS)?;
        }
        writer.serialize(entry)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads every entry in file order. A store that does not exist yet
    /// reads as empty.
    pub fn load_all(&self) -> Result<Vec<TaskEntry>, WorklogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = Reader::from_path(&self.path)?;
        let mut entries = Vec::new();
        for record in reader.deserialize() {
            entries.push(record?);
        }
        Ok(entries)
    }

    /// Replaces the whole store with `entries`, header row included.
    pub fn rewrite(&self, entries: &[TaskEntry]) -> Result<(), WorklogError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Swaps the entry selected as `row` at search time for `after`, if the
    /// pre-edit snapshot can still be found. Returns the row that was
    /// actually replaced, or `None` when the store no longer holds the
    /// snapshot, in which case the file is left untouched.
    pub fn replace(
        &self,
        row: usize,
        before: &TaskEntry,
        after: TaskEntry,
    ) -> Result<Option<usize>, WorklogError> {
        let mut entries = self.load_all()?;
        let index = match locate(&entries, row, before) {
            Some(index) => index,
            None => return Ok(None),
        };
        entries[index] = after;
        self.rewrite(&entries)?;
        Ok(Some(index))
    }

    /// Deletes the entry selected as `row` at search time, with the same
    /// snapshot rules as [`Store::replace`].
    pub fn remove(&self, row: usize, before: &TaskEntry) -> Result<Option<usize>, WorklogError> {
        let mut entries = self.load_all()?;
        let index = match locate(&entries, row, before) {
            Some(index) => index,
            None => return Ok(None),
        };
        entries.remove(index);
        self.rewrite(&entries)?;
        Ok(Some(index))
    }
}

/// Finds the row to mutate: the remembered row if it still holds the
/// snapshot, otherwise the first row that does.
fn locate(entries: &[TaskEntry], row: usize, snapshot: &TaskEntry) -> Option<usize> {
    if entries.get(row) == Some(snapshot) {
        return Some(row);
    }
    entries.iter().position(|entry| entry == snapshot)
}
