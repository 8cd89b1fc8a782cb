pub mod commands;
pub mod config;
pub mod error;
pub mod google;
pub mod graph;
pub mod http_client;
pub mod locator;
pub mod sources;
pub mod tabular;

pub use config::Settings;
pub use error::{BridgeError, Result};
pub use locator::{list_worksheets, locate, DriveDirectory, ResolvedDocumentCoordinate, WeakIdentifier};
pub use tabular::{normalize, parse_cell, CellValue, FieldSchema, NormalizedRecord, RawCell, RawGrid};
