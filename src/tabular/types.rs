use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

use crate::error::BridgeError;

/// A cell exactly as the remote API returned it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawCell {
    /// String coercion used for header cells and before numeric detection
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Bool(b) => b.to_string(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Text(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

pub type RawRow = Vec<RawCell>;
pub type RawGrid = Vec<RawRow>;

/// A normalized cell: either a number or a trimmed string
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One output column: where to read it from and what to call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source_index: usize,
    pub key: String,
}

impl FieldMapping {
    pub fn new(source_index: usize, key: impl Into<String>) -> Self {
        FieldMapping {
            source_index,
            key: key.into(),
        }
    }
}

/// How grid columns become record fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "fields", rename_all = "lowercase")]
pub enum FieldSchema {
    /// First row holds the field keys
    #[default]
    Header,
    /// No header row; keys are `Column_1..Column_n` up to the widest row
    Generated,
    /// Every row is data; keys come from an explicit column mapping
    Fixed(Vec<FieldMapping>),
}

impl FieldSchema {
    pub fn fixed<K: Into<String>>(mapping: impl IntoIterator<Item = (usize, K)>) -> Self {
        FieldSchema::Fixed(
            mapping
                .into_iter()
                .map(|(index, key)| FieldMapping::new(index, key))
                .collect(),
        )
    }
}

/// Parses `header`, `generated`, or a fixed mapping such as `1:data,4:peso_arroba`
impl FromStr for FieldSchema {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("header") {
            return Ok(FieldSchema::Header);
        }
        if s.eq_ignore_ascii_case("generated") {
            return Ok(FieldSchema::Generated);
        }

        let mut mapping = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (index, key) = entry.split_once(':').ok_or_else(|| {
                BridgeError::config(format!("Schema entry '{}' must look like <index>:<key>", entry))
            })?;
            let index = index.trim().parse::<usize>().map_err(|_| {
                BridgeError::config(format!("Schema entry '{}' has an invalid column index", entry))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(BridgeError::config(format!("Schema entry '{}' has an empty key", entry)));
            }
            mapping.push(FieldMapping::new(index, key));
        }

        if mapping.is_empty() {
            return Err(BridgeError::config(format!("Schema '{}' declares no fields", s)));
        }

        Ok(FieldSchema::Fixed(mapping))
    }
}

/// A typed record whose fields keep schema declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: IndexMap<String, CellValue>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. A repeated key keeps its first position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
