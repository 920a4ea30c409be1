//! List view controller
//!
//! [`ListView`] owns one page load: the fetched record set (or the fetch
//! error), the search term and the sort state. Every change re-derives the
//! visible rows; [`ListView::render`] turns them into a [`ViewOutcome`].

use serde::Serialize;

use crate::jobs::{filter_jobs, sort_jobs, FetchError, JobRecord, SortKey, SortState};

/// Shown when the backend returned no records at all
pub const NO_JOBS_MESSAGE: &str = "No jobs available.";

/// Shown when records exist but none match the search term
pub const NO_MATCHES_MESSAGE: &str = "No information found.";

/// Placeholder for a record without notes
pub const NOTES_FALLBACK: &str = "N/A";

/// Display row for a single job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRow {
    pub id: Option<String>,
    pub role: String,
    pub company: String,
    pub salary: String,
    pub location: String,
    pub start_date: String,
    pub duration: String,
    pub program: String,
    pub notes: String,
}

impl JobRow {
    pub fn from_record(record: &JobRecord) -> Self {
        let text = |key: SortKey| record.text(key).unwrap_or_default();

        let notes = record
            .text(SortKey::Notes)
            .unwrap_or_else(|| NOTES_FALLBACK.to_string());

        Self {
            id: record.id.as_ref().map(|id| id.to_string()),
            role: text(SortKey::Role),
            company: text(SortKey::Company),
            salary: text(SortKey::Salary),
            location: text(SortKey::Location),
            start_date: text(SortKey::StartDate),
            duration: text(SortKey::Duration),
            program: text(SortKey::Program),
            notes,
        }
    }

    /// Cell values in [`SortKey::ALL`] order
    pub fn cells(&self) -> [&str; 8] {
        [
            self.role.as_str(),
            self.company.as_str(),
            self.salary.as_str(),
            self.location.as_str(),
            self.start_date.as_str(),
            self.duration.as_str(),
            self.program.as_str(),
            self.notes.as_str(),
        ]
    }
}

/// What a page load renders: exactly one of error, empty state or rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewOutcome {
    Error { message: String },
    Empty { message: String },
    Rows { rows: Vec<JobRow> },
}

#[derive(Debug, Clone, Default)]
pub struct ListView {
    records: Vec<JobRecord>,
    error: Option<FetchError>,
    search: String,
    sort: Option<SortState>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// View over the result of a fetch
    pub fn from_fetch(result: Result<Vec<JobRecord>, FetchError>) -> Self {
        let mut view = Self::new();
        view.load(result);
        view
    }

    /// Replace the record set with the result of a fetch
    ///
    /// A failure leaves an empty record set behind.
    pub fn load(&mut self, result: Result<Vec<JobRecord>, FetchError>) {
        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(err) => {
                self.records = Vec::new();
                self.error = Some(err);
            }
        }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Apply a column selection (header click) and return the new state
    pub fn select_sort(&mut self, key: SortKey) -> SortState {
        let next = SortState::next(self.sort, key);
        self.sort = Some(next);
        next
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    /// Records passing the search term, in sort order
    pub fn visible(&self) -> Vec<&JobRecord> {
        let mut visible = filter_jobs(&self.records, &self.search);
        sort_jobs(&mut visible, self.sort);
        visible
    }

    pub fn render(&self) -> ViewOutcome {
        if let Some(err) = &self.error {
            return ViewOutcome::Error {
                message: err.to_string(),
            };
        }

        if self.records.is_empty() {
            return ViewOutcome::Empty {
                message: NO_JOBS_MESSAGE.to_string(),
            };
        }

        let visible = self.visible();
        if visible.is_empty() {
            return ViewOutcome::Empty {
                message: NO_MATCHES_MESSAGE.to_string(),
            };
        }

        ViewOutcome::Rows {
            rows: visible.into_iter().map(JobRow::from_record).collect(),
        }
    }
}
