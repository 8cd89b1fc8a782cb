use serde::{Deserialize, Serialize};

use crate::graph::DriveItem;

/// File extensions treated as workbooks
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xlsm", ".xlsb", ".xls"];

/// A non-authoritative reference to a document: a fragment of its id or URL
/// and an optional keyword expected in its file name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeakIdentifier {
    pub guid_fragment: String,
    pub name_hint: Option<String>,
}

impl WeakIdentifier {
    pub fn new(guid_fragment: impl Into<String>, name_hint: Option<String>) -> Self {
        WeakIdentifier {
            guid_fragment: guid_fragment.into().trim().to_string(),
            name_hint: name_hint
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.guid_fragment.is_empty() && self.name_hint.is_none()
    }

    /// Permissive match: id contains the fragment, OR name contains the
    /// hint (case-insensitive), OR URL contains the fragment
    pub fn matches(&self, item: &DriveItem) -> bool {
        let guid = self.guid_fragment.as_str();
        if !guid.is_empty() && item.id.contains(guid) {
            return true;
        }

        if let Some(hint) = &self.name_hint {
            if item.name.to_lowercase().contains(&hint.to_lowercase()) {
                return true;
            }
        }

        !guid.is_empty() && item.web_url.contains(guid)
    }
}

pub fn is_spreadsheet(name: &str) -> bool {
    let name = name.to_lowercase();
    SPREADSHEET_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// First item in listing order satisfying the identifier
pub fn find_match<'a>(items: &'a [DriveItem], identifier: &WeakIdentifier) -> Option<&'a DriveItem> {
    items.iter().find(|item| identifier.matches(item))
}

/// Like [`find_match`], restricted to workbook files
pub fn find_spreadsheet_match<'a>(
    items: &'a [DriveItem],
    identifier: &WeakIdentifier,
) -> Option<&'a DriveItem> {
    items
        .iter()
        .filter(|item| is_spreadsheet(&item.name))
        .find(|item| identifier.matches(item))
}
