use serde::{Deserialize, Serialize};

use crate::domain::owned::OwnedRecord;

/// Tag reported when the collection is empty
pub const NO_TYPE: &str = "N/A";

/// Derived collection analytics.
/// Never a source of truth; recomputed from the collection on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatistics {
    pub total_caught: usize,
    pub total_available: usize,

    /// 100 * caught / available, unclamped
    pub completion_percentage: f64,

    pub most_common_type: TypeCount,

    pub heaviest: Option<OwnedRecord>,
    pub lightest: Option<OwnedRecord>,
    pub tallest: Option<OwnedRecord>,
    pub shortest: Option<OwnedRecord>,

    /// Means rounded half up
    pub avg_attack: u32,
    pub avg_defense: u32,
    pub avg_speed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub tag: String,
    pub count: usize,
}

impl TypeCount {
    /// Sentinel for an empty collection
    pub fn none() -> Self {
        Self {
            tag: NO_TYPE.to_string(),
            count: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.count == 0
    }
}

impl CollectionStatistics {
    /// Statistics of a collection with nothing in it
    pub fn empty(total_available: usize) -> Self {
        Self {
            total_caught: 0,
            total_available,
            completion_percentage: 0.0,
            most_common_type: TypeCount::none(),
            heaviest: None,
            lightest: None,
            tallest: None,
            shortest: None,
            avg_attack: 0,
            avg_defense: 0,
            avg_speed: 0,
        }
    }
}
