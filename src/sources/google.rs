use tracing::{info, warn};

use crate::config::{required, GoogleSettings};
use crate::error::{BridgeError, Result};
use crate::google::{a1_range, SheetsClient};
use crate::tabular::{normalize, NormalizedRecord};

pub fn connect(settings: &GoogleSettings) -> Result<SheetsClient> {
    let token = settings.access_token.clone().ok_or_else(|| {
        BridgeError::Authentication("GOOGLE_ACCESS_TOKEN is not set".to_string())
    })?;
    SheetsClient::new(&settings.base_url, token)
}

/// Read the configured range and normalize the rows
pub async fn fetch_records(settings: &GoogleSettings) -> Result<Vec<NormalizedRecord>> {
    info!("Starting Google Sheets data retrieval");
    let schema = settings.schema()?;

    let spreadsheet_id = required(&settings.spreadsheet_id, "GOOGLE_SPREADSHEET_ID")?;
    let client = connect(settings)?;

    // Metadata is diagnostic only
    match client.spreadsheet_info(&spreadsheet_id).await {
        Ok(info) => {
            info!(
                "Spreadsheet '{}' has sheets {:?}",
                info.properties.title,
                info.sheet_titles()
            );
            if !info.sheet_titles().contains(&settings.sheet_name.as_str()) {
                warn!("Sheet '{}' not found in spreadsheet", settings.sheet_name);
            }
        }
        Err(e) => warn!("Could not read spreadsheet info: {}", e),
    }

    let range = a1_range(&settings.sheet_name, &settings.range);
    info!("Reading data from range {}", range);

    let grid = client.values(&spreadsheet_id, &range).await?;
    if grid.is_empty() {
        warn!("No data found in range {}", range);
    }

    Ok(normalize(&grid, &schema))
}
