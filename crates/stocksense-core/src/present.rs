//! Presentation adapters
//!
//! Pure, stateless functions shaping one result slot into a renderable
//! form. Styling and layout belong to the front end, not here.

use crate::model::{Direction, FieldValue, InfoRecord};

/// One cell of an info display row: field name and value
pub type InfoField = (String, FieldValue);

/// Format a confidence score as a percentage with one decimal place.
///
/// An unknown or non-finite score renders as `"N/A"`.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(score) if score.is_finite() => format!("{:.1}%", score * 100.0),
        _ => "N/A".to_string(),
    }
}

/// The explicit placeholder paired with an odd trailing info field
pub fn placeholder_field() -> InfoField {
    (String::new(), FieldValue::Text(String::new()))
}

/// Group info fields two at a time, in received order.
///
/// An odd final entry is paired with [`placeholder_field`], never dropped.
pub fn pair_info_fields(info: &InfoRecord) -> Vec<(InfoField, InfoField)> {
    info.fields()
        .chunks(2)
        .map(|pair| {
            let left = pair[0].clone();
            let right = pair.get(1).cloned().unwrap_or_else(placeholder_field);
            (left, right)
        })
        .collect()
}

/// Replace separator characters with spaces and capitalize each word.
///
/// Purely cosmetic; has no semantic effect on the data.
pub fn humanize_field_name(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Caption for a directional verdict
pub fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "Market Up",
        Direction::Down => "Market Down",
    }
}
