// src/application/formatters.rs
//
// Display helpers shared by the DTOs and the CLI.

/// Decimetres to metres: 7 -> "0.7m"
pub fn format_height(height: u32) -> String {
    format!("{}m", f64::from(height) / 10.0)
}

/// Hectograms to kilograms: 905 -> "90.5kg"
pub fn format_weight(weight: u32) -> String {
    format!("{}kg", f64::from(weight) / 10.0)
}

/// 25 -> "#025"
pub fn format_pokemon_id(id: u32) -> String {
    format!("#{:03}", id)
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
