use tracing::debug;

use super::types::*;
use crate::error::Result;
use crate::http_client::ApiClient;
use crate::tabular::RawGrid;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Read-only Google Sheets v4 client
#[derive(Debug, Clone)]
pub struct SheetsClient {
    api: ApiClient,
}

impl SheetsClient {
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(base_url, access_token)?,
        })
    }

    pub async fn spreadsheet_info(&self, spreadsheet_id: &str) -> Result<SpreadsheetInfo> {
        let mut url = self.api.endpoint(&["spreadsheets", spreadsheet_id])?;
        url.query_pairs_mut().append_pair("includeGridData", "false");
        self.api.get_json(url).await
    }

    /// Cell values of an A1 range such as `Página1!A1:I169`
    pub async fn values(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid> {
        let url = self.api.endpoint(&["spreadsheets", spreadsheet_id, "values", range])?;
        let value_range: ValueRange = self.api.get_json(url).await?;
        debug!("Range {} returned {} rows", value_range.range, value_range.values.len());
        Ok(value_range.values)
    }
}

/// `<sheet>!<range>`, quoting the sheet name when it contains anything but
/// letters, digits or underscores
pub fn a1_range(sheet_name: &str, range: &str) -> String {
    let plain = sheet_name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if plain {
        format!("{}!{}", sheet_name, range)
    } else {
        format!("'{}'!{}", sheet_name.replace('\'', "''"), range)
    }
}
