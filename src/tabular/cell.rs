use super::types::{CellValue, RawCell};

/// Interpret one raw cell. Absent cells become the empty string; anything
/// that reads as a number (comma allowed as the decimal separator) becomes
/// a number; everything else stays a trimmed string.
pub fn parse_cell(raw: Option<&RawCell>) -> CellValue {
    let raw = match raw {
        None | Some(RawCell::Empty) => return CellValue::default(),
        Some(raw) => raw,
    };

    let text = raw.to_text();
    let trimmed = text.trim();

    match parse_number(trimmed) {
        Some(n) => CellValue::Number(n),
        None => CellValue::Text(trimmed.to_string()),
    }
}

/// Header text for a column, falling back to `Column_<n>` (1-based) when blank
pub fn header_key(raw: Option<&RawCell>, index: usize) -> String {
    let text = raw.map(RawCell::to_text).unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        generated_key(index)
    } else {
        trimmed.to_string()
    }
}

pub fn generated_key(index: usize) -> String {
    format!("Column_{}", index + 1)
}

fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    // Only the first comma is a decimal separator; no thousands grouping
    let normalized = text.replacen(',', ".", 1);
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}
