//! Finding a workbook's drive and item id from a weak identifier.
//!
//! This module provides:
//! - The drive directory seam and advisory worksheet listing
//! - The id/name/URL matching predicate
//! - The ordered strategy search across drives
//! - Coordinates read from share links

pub mod directory;
pub mod matcher;
pub mod resolver;
pub mod share_link;

use serde::{Deserialize, Serialize};

pub use directory::{list_worksheets, DriveDirectory};
pub use matcher::{find_match, find_spreadsheet_match, is_spreadsheet, WeakIdentifier};
pub use resolver::{locate, Strategy, STRATEGY_ORDER};
pub use share_link::coordinate_from_share_url;

/// Where a located workbook lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDocumentCoordinate {
    pub drive_id: String,
    pub item_id: String,
}
