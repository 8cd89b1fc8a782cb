use serde::Serialize;

use crate::error::{BridgeError, Result};
use crate::google::DEFAULT_SHEETS_BASE_URL;
use crate::graph::{ClientCredentials, DEFAULT_GRAPH_BASE_URL};
use crate::locator::{coordinate_from_share_url, ResolvedDocumentCoordinate, WeakIdentifier};
use crate::tabular::FieldSchema;

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const DEFAULT_WORKSHEET: &str = "Sheet1";
const DEFAULT_GOOGLE_SHEET: &str = "Página1";
const DEFAULT_GOOGLE_RANGE: &str = "A1:I169";

/// Microsoft Graph app registration
#[derive(Debug, Clone, Serialize)]
pub struct GraphSettings {
    pub base_url: String,
    pub authority: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
}

impl GraphSettings {
    pub fn is_configured(&self) -> bool {
        self.tenant_id.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }

    pub fn credentials(&self) -> Result<ClientCredentials> {
        Ok(ClientCredentials {
            authority: self.authority.clone(),
            tenant_id: required(&self.tenant_id, "TENANT_ID")?,
            client_id: required(&self.client_id, "CLIENT_ID")?,
            client_secret: required(&self.client_secret, "CLIENT_SECRET")?,
        })
    }
}

/// Which workbook to read and how
#[derive(Debug, Clone, Serialize)]
pub struct ExcelSettings {
    pub site_id: Option<String>,
    pub site_hostname: Option<String>,
    pub site_path: Option<String>,
    pub drive_id: Option<String>,
    pub item_id: Option<String>,
    pub share_url: Option<String>,
    pub document_id: Option<String>,
    pub name_hint: Option<String>,
    pub worksheet: String,
    pub table: Option<String>,
    /// Unparsed `EXCEL_SCHEMA`; see [`ExcelSettings::schema`]
    pub schema: Option<String>,
}

impl ExcelSettings {
    /// A coordinate known up front, from explicit ids or a share link
    pub fn fixed_coordinate(&self) -> Option<ResolvedDocumentCoordinate> {
        if let (Some(drive_id), Some(item_id)) = (&self.drive_id, &self.item_id) {
            return Some(ResolvedDocumentCoordinate {
                drive_id: drive_id.clone(),
                item_id: item_id.clone(),
            });
        }
        self.share_url.as_deref().and_then(coordinate_from_share_url)
    }

    pub fn schema(&self) -> Result<FieldSchema> {
        parse_schema(self.schema.as_deref(), "EXCEL_SCHEMA")
    }

    pub fn weak_identifier(&self) -> WeakIdentifier {
        WeakIdentifier::new(
            self.document_id.clone().unwrap_or_default(),
            self.name_hint.clone(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleSettings {
    pub base_url: String,
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
    pub range: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub schema: Option<String>,
}

impl GoogleSettings {
    pub fn is_configured(&self) -> bool {
        self.spreadsheet_id.is_some() && self.access_token.is_some()
    }

    pub fn schema(&self) -> Result<FieldSchema> {
        parse_schema(self.schema.as_deref(), "GOOGLE_SCHEMA")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub graph: GraphSettings,
    pub excel: ExcelSettings,
    pub google: GoogleSettings,
}

impl Settings {
    /// Load from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file. Values are checked when an operation uses them.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Settings {
            graph: GraphSettings {
                base_url: get_or("GRAPH_BASE_URL", DEFAULT_GRAPH_BASE_URL),
                authority: get_or("GRAPH_AUTHORITY", DEFAULT_AUTHORITY),
                tenant_id: get("TENANT_ID"),
                client_id: get("CLIENT_ID"),
                client_secret: get("CLIENT_SECRET"),
            },
            excel: ExcelSettings {
                site_id: get("SHAREPOINT_SITE_ID"),
                site_hostname: get("SHAREPOINT_HOSTNAME"),
                site_path: get("SHAREPOINT_SITE_PATH"),
                drive_id: get("EXCEL_DRIVE_ID"),
                item_id: get("EXCEL_ITEM_ID"),
                share_url: get("EXCEL_SHARE_URL"),
                document_id: get("EXCEL_DOCUMENT_ID"),
                name_hint: get("EXCEL_NAME_HINT"),
                worksheet: get_or("EXCEL_WORKSHEET", DEFAULT_WORKSHEET),
                table: get("EXCEL_TABLE"),
                schema: get("EXCEL_SCHEMA"),
            },
            google: GoogleSettings {
                base_url: get_or("GOOGLE_SHEETS_BASE_URL", DEFAULT_SHEETS_BASE_URL),
                spreadsheet_id: get("GOOGLE_SPREADSHEET_ID"),
                sheet_name: get_or("GOOGLE_SHEET_NAME", DEFAULT_GOOGLE_SHEET),
                range: get_or("GOOGLE_SHEET_RANGE", DEFAULT_GOOGLE_RANGE),
                access_token: get("GOOGLE_ACCESS_TOKEN"),
                schema: get("GOOGLE_SCHEMA"),
            },
        }
    }
}

/// Parse a schema variable; unset means header mode
fn parse_schema(raw: Option<&str>, name: &str) -> Result<FieldSchema> {
    match raw {
        None => Ok(FieldSchema::Header),
        Some(raw) => raw.parse::<FieldSchema>().map_err(|e| match e {
            BridgeError::Config(message) => BridgeError::config(format!("{}: {}", name, message)),
            other => other,
        }),
    }
}

pub(crate) fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| BridgeError::config(format!("{} environment variable is required", name)))
}
