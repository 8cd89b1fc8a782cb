use serde::{Deserialize, Serialize};

use crate::tabular::RawGrid;

/// A document library within a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub drive_type: String,
}

/// A file or folder entry inside a drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub web_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub visibility: String,
}

/// Workbook range response (`usedRange`, `headerRowRange`); only the cell
/// values are kept
#[derive(Debug, Clone, Deserialize)]
pub struct WorkbookRange {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub values: RawGrid,
}

/// One row of a named table. Graph wraps the row cells in a single-row grid.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub values: RawGrid,
}

/// OData collection page
#[derive(Debug, Clone, Deserialize)]
pub struct ODataPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::RawCell;
    use serde_json::json;

    #[test]
    fn test_drive_page_deserializes() {
        let page: ODataPage<Drive> = serde_json::from_value(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#drives",
            "value": [
                { "id": "b!one", "name": "Documents", "driveType": "documentLibrary" },
                { "id": "b!two", "name": "Historico", "driveType": "documentLibrary" }
            ]
        }))
        .unwrap();

        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[1].drive_type, "documentLibrary");
        assert!(page.next_link.is_none());
    }

    #[test]
    fn test_drive_item_defaults_missing_fields() {
        let item: DriveItem = serde_json::from_value(json!({
            "id": "01ABC",
            "name": "historico.xlsx",
            "folder": { "childCount": 0 }
        }))
        .unwrap();

        assert_eq!(item.web_url, "");
        assert_eq!(item.size, 0);
    }

    #[test]
    fn test_used_range_values() {
        let range: WorkbookRange = serde_json::from_value(json!({
            "address": "Sheet1!A1:B3",
            "values": [["Name", "Age"], ["Alice", 30], ["", ""]]
        }))
        .unwrap();

        assert_eq!(range.values.len(), 3);
        assert_eq!(range.values[1][1], RawCell::Number(30.0));
    }

    #[test]
    fn test_table_rows_page() {
        let page: ODataPage<TableRow> = serde_json::from_value(json!({
            "value": [
                { "index": 0, "values": [["id1", "2024-01-01", "M", "Boi", "3,5"]] },
                { "index": 1, "values": [["id2", "2024-01-02", "F", "Vaca", 4]] }
            ],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next?$skiptoken=abc"
        }))
        .unwrap();

        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[1].values[0][4], RawCell::Number(4.0));
        assert!(page.next_link.is_some());
    }
}
