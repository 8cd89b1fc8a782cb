use tracing::{info, warn};

use crate::config::{required, ExcelSettings, GraphSettings, Settings};
use crate::error::Result;
use crate::graph::GraphClient;
use crate::locator::{self, list_worksheets, ResolvedDocumentCoordinate};
use crate::tabular::{normalize, FieldSchema, NormalizedRecord, RawGrid};

/// Acquire a token and build a Graph client
pub async fn connect(settings: &GraphSettings) -> Result<GraphClient> {
    let token = settings.credentials()?.acquire_token().await?;
    GraphClient::new(&settings.base_url, token)
}

/// Site id from settings, resolving hostname and path when no id is given
pub async fn resolve_site_id(graph: &GraphClient, excel: &ExcelSettings) -> Result<String> {
    if let Some(site_id) = &excel.site_id {
        return Ok(site_id.clone());
    }

    let hostname = required(&excel.site_hostname, "SHAREPOINT_SITE_ID or SHAREPOINT_HOSTNAME")?;
    let path = excel.site_path.clone().unwrap_or_default();
    let site = graph.resolve_site(&hostname, &path).await?;
    info!("Resolved site '{}' to {}", site.display_name, site.id);
    Ok(site.id)
}

/// Fixed coordinate when configured, otherwise run the locator
pub async fn resolve_document(graph: &GraphClient, excel: &ExcelSettings) -> Result<ResolvedDocumentCoordinate> {
    if let Some(coordinate) = excel.fixed_coordinate() {
        info!("Using configured document {} in drive {}", coordinate.item_id, coordinate.drive_id);
        return Ok(coordinate);
    }

    let site_id = resolve_site_id(graph, excel).await?;
    locator::locate(graph, &site_id, &excel.weak_identifier()).await
}

/// Warn when the configured worksheet is not among the listed ones. An empty
/// listing means the workbook could not be inspected and is not reported.
pub fn check_worksheet(available: &[String], worksheet: &str) -> bool {
    if available.is_empty() || available.iter().any(|name| name == worksheet) {
        return true;
    }
    warn!(
        "Worksheet '{}' not found; workbook has {:?}",
        worksheet, available
    );
    false
}

/// Raw grid of the configured worksheet or table. With a header schema the
/// table's header row is put in front of its data rows.
pub async fn read_grid(
    graph: &GraphClient,
    document: &ResolvedDocumentCoordinate,
    excel: &ExcelSettings,
    schema: &FieldSchema,
) -> Result<RawGrid> {
    match &excel.table {
        None => graph.used_range(document, &excel.worksheet).await,
        Some(table) => {
            let mut grid = match schema {
                FieldSchema::Header => graph.table_header(document, &excel.worksheet, table).await?,
                _ => RawGrid::new(),
            };
            grid.extend(graph.table_rows(document, &excel.worksheet, table).await?);
            Ok(grid)
        }
    }
}

/// Locate the workbook, read it and normalize the rows
pub async fn fetch_records(settings: &Settings) -> Result<Vec<NormalizedRecord>> {
    let excel = &settings.excel;
    info!("Starting Microsoft Excel data retrieval");
    let schema = excel.schema()?;

    let graph = connect(&settings.graph).await?;
    let document = resolve_document(&graph, excel).await?;

    let worksheets = list_worksheets(&graph, &document.drive_id, &document.item_id).await;
    check_worksheet(&worksheets, &excel.worksheet);

    let grid = read_grid(&graph, &document, excel, &schema).await?;
    info!("Read {} raw rows from worksheet '{}'", grid.len(), excel.worksheet);

    Ok(normalize(&grid, &schema))
}
