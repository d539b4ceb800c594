// src/services/filter_service.rs
//
// Filter/Sort Pipeline
//
// CRITICAL RULES:
// - Pure: never mutates its input, always returns a new sequence
// - Fixed composition: text -> tag -> catch status -> sort
// - Sorting is stable; ties keep their filtered order
// - An unknown sort key leaves the filtered order untouched

use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::{CatalogItem, FilterState, OwnedRecord, SortKey};

/// Anything the pipeline can filter and sort
pub trait Filterable {
    fn id(&self) -> u32;
    fn name(&self) -> &str;
    fn types(&self) -> &[String];
    fn height(&self) -> u32;
    fn weight(&self) -> u32;

    /// Capture instant, for owned records only
    fn caught_at(&self) -> Option<&str> {
        None
    }
}

impl Filterable for CatalogItem {
    fn id(&self) -> u32 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn types(&self) -> &[String] {
        &self.types
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn weight(&self) -> u32 {
        self.weight
    }
}

impl Filterable for OwnedRecord {
    fn id(&self) -> u32 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn types(&self) -> &[String] {
        &self.types
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn weight(&self) -> u32 {
        self.weight
    }
    fn caught_at(&self) -> Option<&str> {
        Some(&self.caught_at)
    }
}

// ============================================================================
// PIPELINES
// ============================================================================

/// Filter and sort catalog items. The catch status is ignored.
pub fn apply(items: &[CatalogItem], state: &FilterState) -> Vec<CatalogItem> {
    run(items, state, |_| true)
}

/// Filter and sort catalog items, honouring the catch status through
/// an ownership lookup.
pub fn apply_with_ownership<F>(items: &[CatalogItem], state: &FilterState, is_owned: F) -> Vec<CatalogItem>
where
    F: Fn(u32) -> bool,
{
    let status = state.status;
    run(items, state, |item| status.matches(is_owned(item.id)))
}

/// Filter and sort the collection. Every record is owned, so the catch
/// status does not apply; the caught-date keys do.
pub fn apply_owned(records: &[OwnedRecord], state: &FilterState) -> Vec<OwnedRecord> {
    run(records, state, |_| true)
}

fn run<T, P>(items: &[T], state: &FilterState, keep: P) -> Vec<T>
where
    T: Filterable + Clone,
    P: Fn(&T) -> bool,
{
    let by_query = filter_by_query(items.iter().collect(), &state.query);
    let by_type = filter_by_types(by_query, &state.selected_types);
    let mut filtered: Vec<&T> = by_type.into_iter().filter(|&item| keep(item)).collect();

    sort_items(&mut filtered, &state.sort);
    filtered.into_iter().cloned().collect()
}

// ============================================================================
// STAGES
// ============================================================================

/// Case-insensitive name substring, or substring of the decimal id.
/// A blank query keeps everything.
pub fn filter_by_query<'a, T: Filterable>(items: Vec<&'a T>, query: &str) -> Vec<&'a T> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return items;
    }

    let needle = trimmed.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            item.name().to_lowercase().contains(&needle) || item.id().to_string().contains(trimmed)
        })
        .collect()
}

/// OR semantics: an item passes if it carries any selected tag
pub fn filter_by_types<'a, T: Filterable>(items: Vec<&'a T>, selected: &BTreeSet<String>) -> Vec<&'a T> {
    if selected.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| item.types().iter().any(|tag| selected.contains(tag)))
        .collect()
}

/// Stable in-place sort by a single key
pub fn sort_items<T: Filterable>(items: &mut [&T], key: &SortKey) {
    match key {
        SortKey::IdAsc => items.sort_by_key(|item| item.id()),
        SortKey::IdDesc => items.sort_by(|a, b| b.id().cmp(&a.id())),
        SortKey::NameAsc => items.sort_by(|a, b| compare_names(a.name(), b.name())),
        SortKey::NameDesc => items.sort_by(|a, b| compare_names(b.name(), a.name())),
        SortKey::HeightAsc => items.sort_by_key(|item| item.height()),
        SortKey::HeightDesc => items.sort_by(|a, b| b.height().cmp(&a.height())),
        SortKey::WeightAsc => items.sort_by_key(|item| item.weight()),
        SortKey::WeightDesc => items.sort_by(|a, b| b.weight().cmp(&a.weight())),
        SortKey::CaughtDateAsc => items.sort_by(|a, b| compare_caught(a.caught_at(), b.caught_at())),
        SortKey::CaughtDateDesc => items.sort_by(|a, b| compare_caught(b.caught_at(), a.caught_at())),
        SortKey::Unknown(raw) => {
            log::debug!("Unknown sort key '{}', keeping filtered order", raw);
        }
    }
}

/// Case-folded comparison first, raw bytes only to separate case variants.
///
/// Approximates a locale-aware collation: accented letters are not folded,
/// so "flabébé" sorts after every unaccented name sharing its prefix.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Items without a capture instant compare equal and keep their order
fn compare_caught(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a.and_then(parse_instant), b.and_then(parse_instant)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(&b),
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}
