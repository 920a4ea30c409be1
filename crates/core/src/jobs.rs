use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Base URL used when neither an explicit value nor a deployment host is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Path of the job listing endpoint, relative to the base URL
pub const JOBS_PATH: &str = "/api/jobs";

/// Why a page load produced no record set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch jobs, status: {0}")]
    Status(u16),

    #[error("Failed to fetch jobs: {0}")]
    Transport(String),

    #[error("Invalid data format")]
    InvalidFormat,
}

/// Record identifier as sent by the backend (any JSON number or a string)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(serde_json::Number),
    Text(String),
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        JobId::Number(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(id) => write!(f, "{id}"),
            JobId::Text(id) => write!(f, "{id}"),
        }
    }
}

/// Salary as sent by the backend (number or numeric string)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Salary {
    Number(f64),
    Text(String),
}

impl Salary {
    /// Numeric value used for ordering, `None` when the text is not a number
    ///
    /// Text values may carry a leading `$`, thousands separators and
    /// surrounding whitespace.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Salary::Number(n) if n.is_finite() => Some(*n),
            Salary::Number(_) => None,
            Salary::Text(text) => {
                let cleaned: String = text
                    .trim()
                    .trim_start_matches('$')
                    .chars()
                    .filter(|c| *c != ',')
                    .collect();
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Salary::Number(n) => write!(f, "{n}"),
            Salary::Text(text) => write!(f, "{}", text.trim()),
        }
    }
}

/// Job posting from the backend
///
/// Every field is optional: the backend has shipped several shapes over
/// time (`role` vs `job_title`, missing `notes`), and a missing field must
/// never fail a page load. Display fields accept any JSON scalar and keep it
/// as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobRecord {
    pub id: Option<JobId>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub company: Option<String>,
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub program: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub notes: Option<String>,
}

/// Strings, numbers and booleans as text; `null` as absent
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar display value, found {other}"
        ))),
    }
}

impl JobRecord {
    /// Display title: `role`, falling back to `job_title`
    pub fn title(&self) -> Option<&str> {
        self.role.as_deref().or(self.job_title.as_deref())
    }

    /// Text value of a column, `None` when absent
    ///
    /// Blank notes count as absent, matching the `N/A` they render as.
    ///
    /// Salary is rendered through its `Display` so it can be compared as text
    /// by callers that want to; ordering by salary uses [`Salary::amount`].
    pub fn text(&self, key: SortKey) -> Option<String> {
        let value = match key {
            SortKey::Role => self.title(),
            SortKey::Company => self.company.as_deref(),
            SortKey::Salary => return self.salary.as_ref().map(|s| s.to_string()),
            SortKey::Location => self.location.as_deref(),
            SortKey::StartDate => self.start_date.as_deref(),
            SortKey::Duration => self.duration.as_deref(),
            SortKey::Program => self.program.as_deref(),
            SortKey::Notes => self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty()),
        };
        value.map(str::to_string)
    }
}

/// Decode a `/api/jobs` response body
///
/// The body must be a JSON array of objects. Anything else (invalid JSON, a
/// bare string, an array holding non-objects, an object or array where a
/// display value belongs) discards the whole response.
pub fn decode_jobs(body: &[u8]) -> Result<Vec<JobRecord>, FetchError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| FetchError::InvalidFormat)?;

    let items = value.as_array().ok_or(FetchError::InvalidFormat)?;
    if !items.iter().all(serde_json::Value::is_object) {
        return Err(FetchError::InvalidFormat);
    }

    serde_json::from_value(value).map_err(|_| FetchError::InvalidFormat)
}

/// Fields the search term is matched against
pub const SEARCH_FIELDS: [SortKey; 3] = [SortKey::Role, SortKey::Company, SortKey::Location];

/// Case-insensitive substring match of `term` against [`SEARCH_FIELDS`]
///
/// An empty term matches everything. A missing field never matches.
pub fn matches_search(record: &JobRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    SEARCH_FIELDS.iter().any(|key| {
        record
            .text(*key)
            .is_some_and(|value| value.to_lowercase().contains(&needle))
    })
}

/// Records matching `term`, in fetch order
pub fn filter_jobs<'a>(records: &'a [JobRecord], term: &str) -> Vec<&'a JobRecord> {
    records
        .iter()
        .filter(|record| matches_search(record, term))
        .collect()
}

/// Column a list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Role,
    Company,
    Salary,
    Location,
    StartDate,
    Duration,
    Program,
    Notes,
}

impl SortKey {
    /// Every column, in display order
    pub const ALL: [SortKey; 8] = [
        SortKey::Role,
        SortKey::Company,
        SortKey::Salary,
        SortKey::Location,
        SortKey::StartDate,
        SortKey::Duration,
        SortKey::Program,
        SortKey::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Role => "role",
            SortKey::Company => "company",
            SortKey::Salary => "salary",
            SortKey::Location => "location",
            SortKey::StartDate => "start_date",
            SortKey::Duration => "duration",
            SortKey::Program => "program",
            SortKey::Notes => "notes",
        }
    }

    /// Column header
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Role => "Role",
            SortKey::Company => "Company",
            SortKey::Salary => "Salary",
            SortKey::Location => "Location",
            SortKey::StartDate => "Start Date",
            SortKey::Duration => "Duration",
            SortKey::Program => "Program",
            SortKey::Notes => "Notes",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "role" | "job_title" | "title" => Ok(SortKey::Role),
            "company" => Ok(SortKey::Company),
            "salary" => Ok(SortKey::Salary),
            "location" => Ok(SortKey::Location),
            "start_date" | "start-date" => Ok(SortKey::StartDate),
            "duration" => Ok(SortKey::Duration),
            "program" => Ok(SortKey::Program),
            "notes" => Ok(SortKey::Notes),
            _ => Err(format!("Unknown sort key: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {s}")),
        }
    }
}

/// Active ordering of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// State after the user selects `key`
    ///
    /// Selecting the active key flips its direction; any other key starts
    /// ascending.
    pub fn next(current: Option<SortState>, key: SortKey) -> SortState {
        match current {
            Some(state) if state.key == key => SortState::new(key, state.direction.flip()),
            _ => SortState::new(key, SortDirection::Ascending),
        }
    }
}

/// Orders `a` and `b` by `sort`, placing missing values last in both directions
pub fn compare_jobs(a: &JobRecord, b: &JobRecord, sort: SortState) -> Ordering {
    match sort.key {
        SortKey::Salary => compare_present(
            a.salary.as_ref().and_then(Salary::amount),
            b.salary.as_ref().and_then(Salary::amount),
            sort.direction,
            |x, y| x.total_cmp(y),
        ),
        key => compare_present(
            a.text(key).map(|s| s.to_lowercase()),
            b.text(key).map(|s| s.to_lowercase()),
            sort.direction,
            |x, y| x.cmp(y),
        ),
    }
}

fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => cmp(&a, &b),
            SortDirection::Descending => cmp(&a, &b).reverse(),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `records` in place
///
/// `None` leaves the fetch order untouched.
pub fn sort_jobs(records: &mut [&JobRecord], sort: Option<SortState>) {
    if let Some(sort) = sort {
        records.sort_by(|a, b| compare_jobs(a, b, sort));
    }
}

/// Pick the base URL of the backend
///
/// Resolution order: an explicit value, then the deployment host (a bare host
/// name is served over `https`), then [`DEFAULT_BASE_URL`]. Blank values count
/// as unset.
pub fn resolve_base_url(explicit: Option<&str>, deployment_host: Option<&str>) -> String {
    let explicit = explicit.map(str::trim).filter(|v| !v.is_empty());
    let host = deployment_host.map(str::trim).filter(|v| !v.is_empty());

    let base = match (explicit, host) {
        (Some(url), _) => url.to_string(),
        (None, Some(host)) if host.contains("://") => host.to_string(),
        (None, Some(host)) => format!("https://{host}"),
        (None, None) => DEFAULT_BASE_URL.to_string(),
    };

    base.trim_end_matches('/').to_string()
}

/// Full URL of the job listing endpoint for `base_url`
pub fn jobs_endpoint(base_url: &str) -> String {
    format!("{}{JOBS_PATH}", base_url.trim_end_matches('/'))
}
