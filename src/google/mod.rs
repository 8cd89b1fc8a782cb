//! Google Sheets access: spreadsheet metadata and value ranges.

pub mod types;
pub mod client;

pub use types::*;
pub use client::{a1_range, SheetsClient, DEFAULT_SHEETS_BASE_URL};
