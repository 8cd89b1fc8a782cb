//! Microsoft Graph access: client-credentials token, drive directory and
//! workbook reads.

pub mod types;
pub mod auth;
pub mod client;

pub use types::*;
pub use auth::ClientCredentials;
pub use client::{GraphClient, DEFAULT_GRAPH_BASE_URL};
