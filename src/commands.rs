use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Settings;
use crate::error::BridgeError;
use crate::locator::{list_worksheets, ResolvedDocumentCoordinate};
use crate::sources::{google, microsoft};
use crate::tabular::NormalizedRecord;

pub const SOURCE_GOOGLE: &str = "google-sheets";
pub const SOURCE_MICROSOFT: &str = "microsoft-excel";

/// Error payload handed to the caller
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub error: String,
    pub message: String,
}

impl CommandError {
    pub fn new(error: impl Into<String>, cause: &BridgeError) -> Self {
        CommandError {
            error: error.into(),
            message: cause.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub source: String,
    pub message: String,
    pub total_records: usize,
    pub data: Vec<NormalizedRecord>,
}

impl DataResponse {
    fn new(source: &str, label: &str, data: Vec<NormalizedRecord>) -> Self {
        DataResponse {
            source: source.to_string(),
            message: format!("{} data retrieved successfully!", label),
            total_records: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Success,
    Error,
    NotAvailable,
}

/// Per-source entry of a comparison report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub status: SourceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_record: Option<NormalizedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SourceSummary {
    pub fn from_result(result: Result<Vec<NormalizedRecord>, BridgeError>) -> Self {
        match result {
            Ok(records) => SourceSummary {
                status: SourceStatus::Success,
                total_records: Some(records.len()),
                headers: Some(
                    records
                        .first()
                        .map(|r| r.keys().map(str::to_string).collect())
                        .unwrap_or_default(),
                ),
                sample_record: records.into_iter().next(),
                message: None,
            },
            Err(e) => SourceSummary {
                status: SourceStatus::Error,
                total_records: None,
                sample_record: None,
                headers: None,
                message: Some(e.to_string()),
            },
        }
    }

    pub fn not_available(message: impl Into<String>) -> Self {
        SourceSummary {
            status: SourceStatus::NotAvailable,
            total_records: None,
            sample_record: None,
            headers: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport {
    pub comparison: String,
    pub timestamp: DateTime<Utc>,
    pub google_sheets: SourceSummary,
    pub microsoft_excel: SourceSummary,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub services: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateResponse {
    #[serde(flatten)]
    pub document: ResolvedDocumentCoordinate,
    pub worksheets: Vec<String>,
}

pub fn index() -> IndexResponse {
    IndexResponse {
        message: "SheetBridge - Microsoft Excel & Google Sheets Reader".to_string(),
        endpoints: vec![
            "excel - Read data from Microsoft Excel".to_string(),
            "google - Read data from Google Sheets".to_string(),
            "compare - Compare data from both sources".to_string(),
            "health - Service configuration status".to_string(),
            "locate - Resolve the Excel document's drive and item".to_string(),
            "worksheets - List worksheets of the Excel document".to_string(),
        ],
    }
}

pub async fn microsoft_excel(settings: &Settings) -> Result<DataResponse, CommandError> {
    microsoft::fetch_records(settings)
        .await
        .map(|data| DataResponse::new(SOURCE_MICROSOFT, "Microsoft Excel", data))
        .map_err(|e| CommandError::new("Failed to read Microsoft Excel data", &e))
}

pub async fn google_sheets(settings: &Settings) -> Result<DataResponse, CommandError> {
    google::fetch_records(&settings.google)
        .await
        .map(|data| DataResponse::new(SOURCE_GOOGLE, "Google Sheets", data))
        .map_err(|e| CommandError::new("Failed to read Google Sheets data", &e))
}

/// Read both sources and summarize each; one failing source does not fail
/// the report
pub async fn compare(settings: &Settings) -> CompareReport {
    let google_sheets = async {
        if settings.google.is_configured() {
            SourceSummary::from_result(google::fetch_records(&settings.google).await)
        } else {
            SourceSummary::not_available("Google Sheets integration not configured")
        }
    };
    let microsoft_excel = async {
        if settings.graph.is_configured() {
            SourceSummary::from_result(microsoft::fetch_records(settings).await)
        } else {
            SourceSummary::not_available("Microsoft Excel integration not configured")
        }
    };

    let (google_sheets, microsoft_excel) = futures::join!(google_sheets, microsoft_excel);

    CompareReport {
        comparison: "Data comparison between Microsoft Excel and Google Sheets".to_string(),
        timestamp: Utc::now(),
        google_sheets,
        microsoft_excel,
    }
}

pub fn health(settings: &Settings) -> HealthReport {
    let describe = |configured: bool| match configured {
        true => "available".to_string(),
        false => "requires configuration".to_string(),
    };

    let mut services = BTreeMap::new();
    services.insert(SOURCE_GOOGLE.to_string(), describe(settings.google.is_configured()));
    services.insert(SOURCE_MICROSOFT.to_string(), describe(settings.graph.is_configured()));

    HealthReport {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        services,
    }
}

/// Resolve the configured workbook and list its worksheets
pub async fn locate_document(settings: &Settings) -> Result<LocateResponse, CommandError> {
    let run = async {
        let graph = microsoft::connect(&settings.graph).await?;
        let document = microsoft::resolve_document(&graph, &settings.excel).await?;
        let worksheets = list_worksheets(&graph, &document.drive_id, &document.item_id).await;
        Ok::<_, BridgeError>(LocateResponse { document, worksheets })
    };

    run.await
        .map_err(|e| CommandError::new("Failed to locate Microsoft Excel document", &e))
}
