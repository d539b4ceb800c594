// src/domain/filter/value_objects.rs
//
// Filter state for the catalog and collection views.
// Pure value objects: no I/O, no shared state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use url::form_urlencoded;

use crate::domain::DomainError;

// ============================================================================
// SORT KEY
// ============================================================================

/// Sort order for catalog items and owned records.
///
/// Unrecognised keys are preserved as `Unknown` rather than rejected; the
/// pipeline leaves such input in its filtered order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    #[default]
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
    HeightAsc,
    HeightDesc,
    WeightAsc,
    WeightDesc,
    /// Owned records only
    CaughtDateAsc,
    /// Owned records only
    CaughtDateDesc,
    Unknown(String),
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::IdAsc => "id-asc",
            SortKey::IdDesc => "id-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::HeightAsc => "height-asc",
            SortKey::HeightDesc => "height-desc",
            SortKey::WeightAsc => "weight-asc",
            SortKey::WeightDesc => "weight-desc",
            SortKey::CaughtDateAsc => "caught-date-asc",
            SortKey::CaughtDateDesc => "caught-date-desc",
            SortKey::Unknown(raw) => raw,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SortKey::IdAsc
    }
}

impl From<&str> for SortKey {
    fn from(raw: &str) -> Self {
        match raw {
            "id-asc" => SortKey::IdAsc,
            "id-desc" => SortKey::IdDesc,
            "name-asc" => SortKey::NameAsc,
            "name-desc" => SortKey::NameDesc,
            "height-asc" => SortKey::HeightAsc,
            "height-desc" => SortKey::HeightDesc,
            "weight-asc" => SortKey::WeightAsc,
            "weight-desc" => SortKey::WeightDesc,
            "caught-date-asc" => SortKey::CaughtDateAsc,
            "caught-date-desc" => SortKey::CaughtDateDesc,
            other => SortKey::Unknown(other.to_string()),
        }
    }
}

impl From<String> for SortKey {
    fn from(raw: String) -> Self {
        SortKey::from(raw.as_str())
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CATCH STATUS
// ============================================================================

/// Ownership filter for the catalog view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchStatus {
    #[default]
    All,
    Caught,
    Uncaught,
}

impl CatchStatus {
    pub fn matches(self, owned: bool) -> bool {
        match self {
            CatchStatus::All => true,
            CatchStatus::Caught => owned,
            CatchStatus::Uncaught => !owned,
        }
    }
}

impl FromStr for CatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CatchStatus::All),
            "caught" => Ok(CatchStatus::Caught),
            "uncaught" => Ok(CatchStatus::Uncaught),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown catch status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for CatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatchStatus::All => write!(f, "all"),
            CatchStatus::Caught => write!(f, "caught"),
            CatchStatus::Uncaught => write!(f, "uncaught"),
        }
    }
}

// ============================================================================
// FILTER STATE
// ============================================================================

/// Everything the user chose to narrow and order a list with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text query over name and id
    pub query: String,

    /// Type tags; an item passes when it has any of them
    pub selected_types: BTreeSet<String>,

    pub sort: SortKey,

    pub status: CatchStatus,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_status(mut self, status: CatchStatus) -> Self {
        self.status = status;
        self
    }

    /// Add the tag if absent, remove it if present
    pub fn toggle_type(&mut self, tag: &str) {
        if !self.selected_types.remove(tag) {
            self.selected_types.insert(tag.to_string());
        }
    }

    pub fn clear_types(&mut self) {
        self.selected_types.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of filter controls that differ from their defaults
    pub fn active_filter_count(&self) -> usize {
        [
            !self.query.trim().is_empty(),
            !self.selected_types.is_empty(),
            !self.sort.is_default(),
            self.status != CatchStatus::All,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// Shareable form, e.g. `search=char&types=fire%2Cflying&sort=name-asc`.
    /// Defaults are omitted.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        let query = self.query.trim();
        if !query.is_empty() {
            pairs.push(("search", query.to_string()));
        }
        if !self.selected_types.is_empty() {
            let types: Vec<&str> = self.selected_types.iter().map(String::as_str).collect();
            pairs.push(("types", types.join(",")));
        }
        if !self.sort.is_default() {
            pairs.push(("sort", self.sort.to_string()));
        }
        if self.status != CatchStatus::All {
            pairs.push(("status", self.status.to_string()));
        }

        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    /// Parse the shareable form; unknown parameters are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.trim_start_matches('?');
        if query.is_empty() {
            return state;
        }

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => state.query = value.into_owned(),
                "types" => {
                    state.selected_types = value
                        .split(',')
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "sort" => state.sort = SortKey::from(value.as_ref()),
                "status" => {
                    if let Ok(status) = value.parse() {
                        state.status = status;
                    }
                }
                _ => {}
            }
        }
        state
    }
}
