use crate::error::SyncResult;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Event IDs that already have a card.
///
/// Backed by a newline-delimited file that is only ever appended to; the
/// in-memory set mirrors every line written so far.
#[derive(Debug)]
pub struct ProcessedEvents {
    path: PathBuf,
    ids: HashSet<String>,
    // Last line on disk is not newline-terminated
    unterminated: bool,
}

impl ProcessedEvents {
    /// Read the whole log; a missing file is an empty log
    pub fn load(path: impl Into<PathBuf>) -> SyncResult<Self> {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let ids = contents
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let unterminated = !contents.is_empty() && !contents.ends_with('\n');

        Ok(Self {
            path,
            ids,
            unterminated,
        })
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.ids.contains(event_id)
    }

    /// Append an ID to the log. Returns `false` without writing when the ID
    /// is already present.
    pub fn record(&mut self, event_id: &str) -> SyncResult<bool> {
        if self.contains(event_id) {
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if self.unterminated {
            writeln!(file)?;
            self.unterminated = false;
        }
        writeln!(file, "{}", event_id)?;

        self.ids.insert(event_id.to_string());
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
