use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::*;
use crate::error::{BridgeError, Result};
use crate::http_client::ApiClient;
use crate::locator::ResolvedDocumentCoordinate;
use crate::tabular::RawGrid;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

// Upper bound on followed @odata.nextLink pages for a single listing
const MAX_PAGES: usize = 50;

/// Read-only Microsoft Graph client for sites, drives and workbooks
#[derive(Debug, Clone)]
pub struct GraphClient {
    api: ApiClient,
}

impl GraphClient {
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(base_url, access_token)?,
        })
    }

    /// Resolve a site by hostname and server-relative path (`/sites/Team`)
    pub async fn resolve_site(&self, hostname: &str, site_path: &str) -> Result<Site> {
        let url = self.site_url(hostname, site_path)?;
        self.api.get_json(url).await
    }

    /// `sites/{host}:/{path}` for a sub-site, bare `sites/{host}` for the root site
    fn site_url(&self, hostname: &str, site_path: &str) -> Result<Url> {
        let path: Vec<&str> = site_path.split('/').filter(|s| !s.is_empty()).collect();
        if path.is_empty() {
            return self.api.endpoint(&["sites", hostname]);
        }

        let host_segment = format!("{}:", hostname);
        let mut segments = vec!["sites", host_segment.as_str()];
        segments.extend(path);
        self.api.endpoint(&segments)
    }

    pub async fn drives(&self, site_id: &str) -> Result<Vec<Drive>> {
        let url = self.api.endpoint(&["sites", site_id, "drives"])?;
        self.get_all_pages(url).await
    }

    pub async fn root_children(&self, drive_id: &str) -> Result<Vec<DriveItem>> {
        let url = self.api.endpoint(&["drives", drive_id, "root", "children"])?;
        self.get_all_pages(url).await
    }

    pub async fn search(&self, drive_id: &str, query: &str) -> Result<Vec<DriveItem>> {
        let search = format!("search(q='{}')", query.replace('\'', "''"));
        let url = self.api.endpoint(&["drives", drive_id, "root", search.as_str()])?;
        self.get_all_pages(url).await
    }

    pub async fn item(&self, drive_id: &str, item_id: &str) -> Result<DriveItem> {
        let url = self.api.endpoint(&["drives", drive_id, "items", item_id])?;
        self.api.get_json(url).await
    }

    pub async fn worksheets(&self, drive_id: &str, item_id: &str) -> Result<Vec<Worksheet>> {
        let url = self.api.endpoint(&["drives", drive_id, "items", item_id, "workbook", "worksheets"])?;
        self.get_all_pages(url).await
    }

    /// Cell values of a worksheet's used range
    pub async fn used_range(&self, document: &ResolvedDocumentCoordinate, worksheet: &str) -> Result<RawGrid> {
        let url = self.api.endpoint(&[
            "drives", document.drive_id.as_str(),
            "items", document.item_id.as_str(),
            "workbook", "worksheets", worksheet,
            "usedRange",
        ])?;

        let range: WorkbookRange = self.api.get_json(url).await?;
        debug!(
            "Used range {} has {} rows",
            range.address.as_deref().unwrap_or("?"),
            range.values.len()
        );
        Ok(range.values)
    }

    /// Rows of a named table flattened into a grid. The table's header row
    /// is not part of the rows collection.
    pub async fn table_rows(
        &self,
        document: &ResolvedDocumentCoordinate,
        worksheet: &str,
        table: &str,
    ) -> Result<RawGrid> {
        let url = self.api.endpoint(&[
            "drives", document.drive_id.as_str(),
            "items", document.item_id.as_str(),
            "workbook", "worksheets", worksheet,
            "tables", table, "rows",
        ])?;

        let rows: Vec<TableRow> = self.get_all_pages(url).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.values.into_iter().next())
            .collect())
    }

    /// Header row of a named table
    pub async fn table_header(
        &self,
        document: &ResolvedDocumentCoordinate,
        worksheet: &str,
        table: &str,
    ) -> Result<RawGrid> {
        let url = self.api.endpoint(&[
            "drives", document.drive_id.as_str(),
            "items", document.item_id.as_str(),
            "workbook", "worksheets", worksheet,
            "tables", table, "headerRowRange",
        ])?;

        let range: WorkbookRange = self.api.get_json(url).await?;
        Ok(range.values)
    }

    async fn get_all_pages<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                return Err(BridgeError::invalid_response(format!(
                    "Listing exceeded {} pages",
                    MAX_PAGES
                )));
            }
            pages += 1;

            let page: ODataPage<T> = self.api.get_json(url).await?;
            items.extend(page.value);

            if let Some(link) = page.next_link {
                let url = Url::parse(&link)
                    .map_err(|e| BridgeError::invalid_response(format!("Bad nextLink '{}': {}", link, e)))?;
                next = Some(url);
            }
        }

        Ok(items)
    }
}
