//! Tabular data normalization.
//!
//! This module provides:
//! - Raw cell and record types
//! - Locale-aware cell parsing (comma as decimal separator)
//! - Grid to record conversion driven by a field schema

pub mod types;
pub mod cell;
pub mod normalize;

pub use types::*;
pub use cell::parse_cell;
pub use normalize::normalize;
