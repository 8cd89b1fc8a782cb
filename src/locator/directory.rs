use tracing::{debug, warn};

use crate::error::Result;
use crate::graph::{Drive, DriveItem, GraphClient};

/// Read-only view of a site's drives, as needed to find one document
#[allow(async_fn_in_trait)]
pub trait DriveDirectory {
    async fn list_drives(&self, site_id: &str) -> Result<Vec<Drive>>;

    /// Immediate children of the drive root
    async fn list_children(&self, drive_id: &str) -> Result<Vec<DriveItem>>;

    async fn search(&self, drive_id: &str, query: &str) -> Result<Vec<DriveItem>>;

    async fn get_item(&self, drive_id: &str, item_id: &str) -> Result<DriveItem>;

    async fn worksheet_names(&self, drive_id: &str, item_id: &str) -> Result<Vec<String>>;
}

impl DriveDirectory for GraphClient {
    async fn list_drives(&self, site_id: &str) -> Result<Vec<Drive>> {
        self.drives(site_id).await
    }

    async fn list_children(&self, drive_id: &str) -> Result<Vec<DriveItem>> {
        self.root_children(drive_id).await
    }

    async fn search(&self, drive_id: &str, query: &str) -> Result<Vec<DriveItem>> {
        GraphClient::search(self, drive_id, query).await
    }

    async fn get_item(&self, drive_id: &str, item_id: &str) -> Result<DriveItem> {
        self.item(drive_id, item_id).await
    }

    async fn worksheet_names(&self, drive_id: &str, item_id: &str) -> Result<Vec<String>> {
        let mut worksheets = self.worksheets(drive_id, item_id).await?;
        worksheets.sort_by_key(|w| w.position);
        Ok(worksheets.into_iter().map(|w| w.name).collect())
    }
}

/// Worksheet names of a workbook. Advisory: a failure is logged and yields
/// an empty list.
pub async fn list_worksheets<D: DriveDirectory + ?Sized>(
    directory: &D,
    drive_id: &str,
    item_id: &str,
) -> Vec<String> {
    match directory.worksheet_names(drive_id, item_id).await {
        Ok(names) => {
            debug!("Workbook {} has worksheets {:?}", item_id, names);
            names
        }
        Err(e) => {
            warn!("Could not list worksheets of {} in drive {}: {}", item_id, drive_id, e);
            Vec::new()
        }
    }
}
