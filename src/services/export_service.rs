// src/services/export_service.rs
//
// Export Service - comma-separated export of the collection
//
// Formatting is pure and cannot fail; only writing the file can.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::OwnedRecord;
use crate::error::{AppError, AppResult};
use crate::events::{CollectionExported, EventBus};

const HEADERS: [&str; 14] = [
    "ID",
    "Name",
    "Type 1",
    "Type 2",
    "Height (m)",
    "Weight (kg)",
    "HP",
    "Attack",
    "Defense",
    "Sp. Atk",
    "Sp. Def",
    "Speed",
    "Caught Date",
    "Note",
];

/// Header line followed by one line per record, joined by `\n`.
/// No trailing newline; an empty collection yields the header alone.
pub fn to_delimited_text(records: &[OwnedRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADERS.join(","));
    lines.extend(records.iter().map(record_line));
    lines.join("\n")
}

fn record_line(record: &OwnedRecord) -> String {
    let stats = &record.stats;
    [
        record.id.to_string(),
        escape_field(&record.name),
        escape_field(record.primary_type().unwrap_or("")),
        escape_field(record.secondary_type().unwrap_or("")),
        tenths(record.height),
        tenths(record.weight),
        stats.hp.to_string(),
        stats.attack.to_string(),
        stats.defense.to_string(),
        stats.special_attack.to_string(),
        stats.special_defense.to_string(),
        stats.speed.to_string(),
        record.caught_at.clone(),
        escape_field(record.note.as_deref().unwrap_or("")),
    ]
    .join(",")
}

/// Quote a field containing a comma, a quote or a newline; quotes are doubled
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Source units are tenths: 40 -> "4", 905 -> "90.5"
fn tenths(value: u32) -> String {
    (f64::from(value) / 10.0).to_string()
}

/// `pokedex-YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("pokedex-{}.csv", date.format("%Y-%m-%d"))
}

pub struct ExportService {
    event_bus: Arc<EventBus>,
}

impl ExportService {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self { event_bus }
    }

    /// Write the export into `dir` under today's file name.
    ///
    /// Failures are `AppError::Export`, which callers may retry.
    pub fn save_to_file(&self, records: &[OwnedRecord], dir: &Path) -> AppResult<PathBuf> {
        let path = dir.join(export_filename(Local::now().date_naive()));
        let content = to_delimited_text(records);

        std::fs::write(&path, content).map_err(|e| {
            log::error!("Failed to write export to {}: {}", path.display(), e);
            AppError::Export(format!("Could not write {}: {}", path.display(), e))
        })?;

        log::info!("Exported {} records to {}", records.len(), path.display());
        self.event_bus.emit(CollectionExported::new(
            path.display().to_string(),
            records.len(),
        ));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogItem, OwnedStats};

    const HEADER_LINE: &str =
        "ID,Name,Type 1,Type 2,Height (m),Weight (kg),HP,Attack,Defense,Sp. Atk,Sp. Def,Speed,Caught Date,Note";

    fn record(id: u32, name: &str, types: &[&str], height: u32, weight: u32, note: Option<&str>) -> OwnedRecord {
        let item = CatalogItem::new(id, name, types.iter().map(|t| t.to_string()).collect())
            .with_size(height, weight);
        let mut record = OwnedRecord::from_catalog(&item, note.map(String::from), "2024-01-15T10:30:00.000Z".into());
        record.stats = OwnedStats {
            hp: 78,
            attack: 84,
            defense: 78,
            special_attack: 109,
            special_defense: 85,
            speed: 100,
        };
        record
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let text = to_delimited_text(&[]);
        assert_eq!(text, HEADER_LINE);
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_row_layout() {
        let text = to_delimited_text(&[record(6, "charizard", &["fire", "flying"], 17, 905, None)]);
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "6,charizard,fire,flying,1.7,90.5,78,84,78,109,85,100,2024-01-15T10:30:00.000Z,"
        );
    }

    #[test]
    fn test_units_divided_by_ten() {
        let text = to_delimited_text(&[record(25, "pikachu", &["electric"], 40, 60, None)]);
        let fields: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();

        assert_eq!(fields[3], "");
        assert_eq!(fields[4], "4");
        assert_eq!(fields[5], "6");
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let records = [
            record(1, "mr, mime", &["psychic"], 13, 545, Some("said \"hi\"")),
            record(2, "plain", &["normal"], 1, 1, Some("line one\nline two")),
        ];
        let text = to_delimited_text(&records);

        let expected = format!(
            "{}\n{}\n{}",
            HEADER_LINE,
            "1,\"mr, mime\",psychic,,1.3,54.5,78,84,78,109,85,100,2024-01-15T10:30:00.000Z,\"said \"\"hi\"\"\"",
            "2,plain,normal,,0.1,0.1,78,84,78,109,85,100,2024-01-15T10:30:00.000Z,\"line one\nline two\""
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("bulbasaur"), "bulbasaur");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"x\""), "\"say \"\"x\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "pokedex-2024-03-09.csv");
    }

    #[test]
    fn test_save_to_file_writes_and_emits() {
        let dir = tempfile::tempdir().unwrap();
        let bus = Arc::new(EventBus::new());
        let service = ExportService::new(bus.clone());

        let path = service
            .save_to_file(&[record(7, "squirtle", &["water"], 5, 90, None)], dir.path())
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(HEADER_LINE));
        assert!(written.contains("7,squirtle,water,,0.5,9,"));
        assert_eq!(bus.get_event_log()[0].event_type, "CollectionExported");
    }

    #[test]
    fn test_save_to_missing_dir_is_retryable_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new(Arc::new(EventBus::new()));

        let err = service
            .save_to_file(&[], &dir.path().join("does/not/exist"))
            .unwrap_err();

        assert!(matches!(err, AppError::Export(_)));
        assert!(err.is_retryable());
    }
}
