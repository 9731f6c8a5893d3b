//! Activity journal.
//!
//! Every activity an actor attempts is recorded with its parent, outcome
//! and duration. When a scenario fails, the journal names the path from the
//! outermost task down to the interaction that raised the error.

use crate::result::{ScreenplayError, ScreenplayResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Instant;
use uuid::Uuid;

/// Outcome of a journaled activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// Still being performed
    Running,
    /// Completed without error
    Succeeded,
    /// Raised an error
    Failed,
}

/// One attempted activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry ID
    pub id: String,
    /// Enclosing activity, if nested
    pub parent_id: Option<String>,
    /// Activity description
    pub activity: String,
    /// Nesting depth (0 for activities attempted directly by the scenario)
    pub depth: usize,
    /// Start offset from the journal's creation (ms)
    pub start_ms: u64,
    /// Duration once finished (ms)
    pub duration_ms: Option<u64>,
    /// Outcome
    pub status: ActivityStatus,
    /// Error message when failed
    pub error: Option<String>,
}

/// Ordered record of an actor's activities
#[derive(Debug)]
pub struct Journal {
    started: Instant,
    entries: Vec<JournalEntry>,
    open: Vec<usize>,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

impl Journal {
    /// Create an empty journal
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Vec::new(),
            open: Vec::new(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Record the start of an activity nested in the currently open one
    pub fn begin(&mut self, activity: impl Into<String>) -> usize {
        let parent_id = self.open.last().map(|&i| self.entries[i].id.clone());
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            parent_id,
            activity: activity.into(),
            depth: self.open.len(),
            start_ms: self.now_ms(),
            duration_ms: None,
            status: ActivityStatus::Running,
            error: None,
        };
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        self.open.push(index);
        index
    }

    /// Record the outcome of the activity started at `index`
    pub fn finish(&mut self, index: usize, outcome: Result<(), &ScreenplayError>) {
        let now = self.now_ms();
        if let Some(pos) = self.open.iter().rposition(|&i| i == index) {
            self.open.truncate(pos);
        }
        if let Some(entry) = self.entries.get_mut(index) {
            entry.duration_ms = Some(now.saturating_sub(entry.start_ms));
            match outcome {
                Ok(()) => entry.status = ActivityStatus::Succeeded,
                Err(e) => {
                    entry.status = ActivityStatus::Failed;
                    entry.error = Some(e.to_string());
                }
            }
        }
    }

    /// Depth of the next activity to begin
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// All entries in start order
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Failed activities from the outermost down to the one that raised
    ///
    /// Only the most recent failure is reported; earlier ones stay in
    /// [`entries`](Self::entries).
    #[must_use]
    pub fn failure_path(&self) -> Vec<&JournalEntry> {
        let failed = |e: &&JournalEntry| e.status == ActivityStatus::Failed;
        let Some(mut leaf) = self.entries.iter().rev().find(failed) else {
            return Vec::new();
        };
        loop {
            let id = leaf.id.as_str();
            let child = self
                .entries
                .iter()
                .rev()
                .filter(failed)
                .find(|e| e.parent_id.as_deref() == Some(id));
            match child {
                Some(child) => leaf = child,
                None => break,
            }
        }

        let mut path = vec![leaf];
        let mut parent = leaf.parent_id.as_deref();
        while let Some(id) = parent {
            match self.entries.iter().find(|e| e.id == id) {
                Some(entry) => {
                    path.push(entry);
                    parent = entry.parent_id.as_deref();
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Indented failure path ending with the error, if anything failed
    #[must_use]
    pub fn failure_report(&self) -> Option<String> {
        let path = self.failure_path();
        let leaf = path.last()?;
        let mut report = String::new();
        for entry in &path {
            let _ = writeln!(report, "{}{}", "  ".repeat(entry.depth), entry.activity);
        }
        if let Some(error) = &leaf.error {
            let _ = write!(report, "{}cause: {error}", "  ".repeat(leaf.depth + 1));
        }
        Some(report)
    }

    /// Serialize the entries to JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> ScreenplayResult<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}
