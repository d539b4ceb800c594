use chrono::{SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::catalog::CatalogItem;

/// A captured Pokémon: a snapshot of the catalog item at capture time.
/// The persisted layout is shared with earlier web builds of the app,
/// hence the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedRecord {
    /// Same id as the source catalog item; unique within the collection
    pub id: u32,

    pub name: String,

    /// Type tags, primary first
    pub types: Vec<String>,

    /// Image URL copied from the catalog item
    #[serde(rename = "sprite")]
    pub image: String,

    /// ISO-8601 capture instant, set once and exported verbatim
    pub caught_at: String,

    /// Free-text note, editable after capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub stats: OwnedStats,

    /// Height in decimetres
    pub height: u32,

    /// Weight in hectograms
    pub weight: u32,
}

/// The six base stats kept with every capture; missing stats are 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl OwnedStats {
    pub fn from_catalog(item: &CatalogItem) -> Self {
        let stat = |name: &str| item.stat(name).unwrap_or(0);
        Self {
            hp: stat("hp"),
            attack: stat("attack"),
            defense: stat("defense"),
            special_attack: stat("special-attack"),
            special_defense: stat("special-defense"),
            speed: stat("speed"),
        }
    }
}

impl OwnedRecord {
    /// Snapshot a catalog item, stamped with the current instant
    pub fn capture(item: &CatalogItem, note: Option<String>) -> Self {
        let caught_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self::from_catalog(item, note, caught_at)
    }

    pub fn from_catalog(item: &CatalogItem, note: Option<String>, caught_at: String) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            types: item.types.clone(),
            image: item.image.clone(),
            caught_at,
            note,
            stats: OwnedStats::from_catalog(item),
            height: item.height,
            weight: item.weight,
        }
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    pub fn secondary_type(&self) -> Option<&str> {
        self.types.get(1).map(String::as_str)
    }
}

/// Per-type capture counts in first-encountered order.
/// A record counts once for every type it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCounts {
    entries: Vec<(String, usize)>,
}

impl TagCounts {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a OwnedRecord>,
    {
        let mut counts = Self::default();
        for record in records {
            for tag in &record.types {
                counts.increment(tag);
            }
        }
        counts
    }

    fn increment(&mut self, tag: &str) {
        match self.entries.iter_mut().find(|(t, _)| t == tag) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((tag.to_string(), 1)),
        }
    }

    pub fn get(&self, tag: &str) -> usize {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest count; on a tie the tag encountered first wins
    pub fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (tag, count) in self.iter() {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((tag, count));
            }
        }
        best
    }

    /// Counts ordered descending, ties kept in first-encountered order
    pub fn by_count_desc(&self) -> Vec<(String, usize)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

impl Serialize for TagCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, count) in &self.entries {
            map.serialize_entry(tag, count)?;
        }
        map.end()
    }
}
