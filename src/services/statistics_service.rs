// src/services/statistics_service.rs
//
// Statistics Service - derived collection analytics
//
// Tie-breaks are fixed for determinism:
// - most common type: first tag reaching the highest count, in
//   first-encountered order
// - extremes: first record in collection order holding the max/min

use std::sync::Arc;

use crate::domain::{CollectionStatistics, OwnedRecord, TagCounts, TypeCount};
use crate::services::collection_service::CollectionService;

pub struct StatisticsService {
    collection: Arc<CollectionService>,
    total_available: usize,
}

impl StatisticsService {
    pub fn new(collection: Arc<CollectionService>, total_available: usize) -> Self {
        Self {
            collection,
            total_available,
        }
    }

    /// Statistics of the collection as it is right now
    pub fn current(&self) -> CollectionStatistics {
        calculate_statistics(&self.collection.records(), self.total_available)
    }
}

pub fn calculate_statistics(records: &[OwnedRecord], total_available: usize) -> CollectionStatistics {
    if records.is_empty() {
        return CollectionStatistics::empty(total_available);
    }

    let total_caught = records.len();
    let completion_percentage = if total_available == 0 {
        0.0
    } else {
        total_caught as f64 * 100.0 / total_available as f64
    };

    let most_common_type = TagCounts::from_records(records)
        .most_common()
        .map(|(tag, count)| TypeCount {
            tag: tag.to_string(),
            count,
        })
        .unwrap_or_else(TypeCount::none);

    CollectionStatistics {
        total_caught,
        total_available,
        completion_percentage,
        most_common_type,
        heaviest: first_extreme(records, |r| r.weight, |candidate, best| candidate > best),
        lightest: first_extreme(records, |r| r.weight, |candidate, best| candidate < best),
        tallest: first_extreme(records, |r| r.height, |candidate, best| candidate > best),
        shortest: first_extreme(records, |r| r.height, |candidate, best| candidate < best),
        avg_attack: rounded_mean(records, |r| r.stats.attack),
        avg_defense: rounded_mean(records, |r| r.stats.defense),
        avg_speed: rounded_mean(records, |r| r.stats.speed),
    }
}

/// The first record whose key beats every earlier one
fn first_extreme<K, B>(records: &[OwnedRecord], key: K, beats: B) -> Option<OwnedRecord>
where
    K: Fn(&OwnedRecord) -> u32,
    B: Fn(u32, u32) -> bool,
{
    let mut best: Option<&OwnedRecord> = None;
    for record in records {
        match best {
            Some(current) if !beats(key(record), key(current)) => {}
            _ => best = Some(record),
        }
    }
    best.cloned()
}

/// Arithmetic mean, rounded half up
fn rounded_mean<F>(records: &[OwnedRecord], stat: F) -> u32
where
    F: Fn(&OwnedRecord) -> u32,
{
    if records.is_empty() {
        return 0;
    }
    let sum: u64 = records.iter().map(|r| u64::from(stat(r))).sum();
    let mean = sum as f64 / records.len() as f64;
    (mean + 0.5).floor() as u32
}
