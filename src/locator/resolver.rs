use tracing::{debug, info, warn};

use super::directory::DriveDirectory;
use super::matcher::{find_match, find_spreadsheet_match, WeakIdentifier};
use super::ResolvedDocumentCoordinate;
use crate::error::{BridgeError, Result};
use crate::graph::{Drive, DriveItem};

/// Lookup strategies, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Scan the drive root for a matching workbook
    RootListing,
    /// Drive-scoped search using the name hint
    KeywordSearch,
    /// Fetch the GUID fragment as an item id
    DirectAccess,
}

pub const STRATEGY_ORDER: [Strategy; 3] = [
    Strategy::RootListing,
    Strategy::KeywordSearch,
    Strategy::DirectAccess,
];

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::RootListing => "root listing",
            Strategy::KeywordSearch => "keyword search",
            Strategy::DirectAccess => "direct access",
        }
    }

    async fn attempt<D: DriveDirectory + ?Sized>(
        self,
        directory: &D,
        drive: &Drive,
        identifier: &WeakIdentifier,
    ) -> Result<Option<DriveItem>> {
        match self {
            Strategy::RootListing => {
                let children = directory.list_children(&drive.id).await?;
                Ok(find_spreadsheet_match(&children, identifier).cloned())
            }
            Strategy::KeywordSearch => {
                let Some(hint) = identifier.name_hint.as_deref() else {
                    return Ok(None);
                };
                let results = directory.search(&drive.id, hint).await?;
                Ok(find_match(&results, identifier).cloned())
            }
            Strategy::DirectAccess => {
                if identifier.guid_fragment.is_empty() {
                    return Ok(None);
                }
                match directory.get_item(&drive.id, &identifier.guid_fragment).await {
                    Ok(item) => Ok(Some(item)),
                    Err(e) if e.status() == Some(404) => Ok(None),
                    Err(e) => Err(e),
                }
            }
        }
    }
}

/// Find one document among the drives of a site.
///
/// Drives are visited in listing order and, within each drive, strategies in
/// [`STRATEGY_ORDER`]; the first hit anywhere wins. A recoverable failure of
/// one strategy is logged and the search moves on.
pub async fn locate<D: DriveDirectory + ?Sized>(
    directory: &D,
    site_id: &str,
    identifier: &WeakIdentifier,
) -> Result<ResolvedDocumentCoordinate> {
    if identifier.is_empty() {
        return Err(BridgeError::config(
            "A document id fragment or name hint is required to locate a document",
        ));
    }

    let drives = directory.list_drives(site_id).await?;
    info!(
        "Locating document {:?} (hint {:?}) across {} drives",
        identifier.guid_fragment,
        identifier.name_hint,
        drives.len()
    );

    for drive in &drives {
        for strategy in STRATEGY_ORDER {
            debug!("Trying {} in drive '{}' ({})", strategy.name(), drive.name, drive.id);

            match strategy.attempt(directory, drive, identifier).await {
                Ok(Some(item)) => {
                    info!(
                        "Found '{}' ({}) in drive '{}' via {}",
                        item.name,
                        item.id,
                        drive.name,
                        strategy.name()
                    );
                    return Ok(ResolvedDocumentCoordinate {
                        drive_id: drive.id.clone(),
                        item_id: item.id,
                    });
                }
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    warn!("{} failed in drive '{}': {}", strategy.name(), drive.name, e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Err(BridgeError::not_found(format!(
        "no drive of site {} holds a document matching {:?}",
        site_id, identifier.guid_fragment
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::list_worksheets;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeDirectory {
        drives: Vec<Drive>,
        children: HashMap<String, Vec<DriveItem>>,
        search_results: HashMap<String, Vec<DriveItem>>,
        items: HashMap<(String, String), DriveItem>,
        failing_children: Vec<String>,
        failing_search: Vec<String>,
        failing_items: bool,
        failing_worksheets: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DriveDirectory for FakeDirectory {
        async fn list_drives(&self, site_id: &str) -> Result<Vec<Drive>> {
            self.record(format!("drives:{}", site_id));
            Ok(self.drives.clone())
        }

        async fn list_children(&self, drive_id: &str) -> Result<Vec<DriveItem>> {
            self.record(format!("children:{}", drive_id));
            if self.failing_children.iter().any(|d| d == drive_id) {
                return Err(BridgeError::Transport {
                    status: 500,
                    body: "root unavailable".to_string(),
                });
            }
            Ok(self.children.get(drive_id).cloned().unwrap_or_default())
        }

        async fn search(&self, drive_id: &str, query: &str) -> Result<Vec<DriveItem>> {
            self.record(format!("search:{}:{}", drive_id, query));
            if self.failing_search.iter().any(|d| d == drive_id) {
                return Err(BridgeError::Transport {
                    status: 501,
                    body: "search not supported".to_string(),
                });
            }
            Ok(self.search_results.get(drive_id).cloned().unwrap_or_default())
        }

        async fn get_item(&self, drive_id: &str, item_id: &str) -> Result<DriveItem> {
            self.record(format!("item:{}:{}", drive_id, item_id));
            if self.failing_items {
                return Err(BridgeError::Transport {
                    status: 500,
                    body: "generalException".to_string(),
                });
            }
            self.items
                .get(&(drive_id.to_string(), item_id.to_string()))
                .cloned()
                .ok_or(BridgeError::Transport {
                    status: 404,
                    body: "itemNotFound".to_string(),
                })
        }

        async fn worksheet_names(&self, drive_id: &str, item_id: &str) -> Result<Vec<String>> {
            self.record(format!("worksheets:{}:{}", drive_id, item_id));
            if self.failing_worksheets {
                return Err(BridgeError::Transport {
                    status: 400,
                    body: "not a workbook".to_string(),
                });
            }
            Ok(vec!["Sheet1".to_string()])
        }
    }

    fn drive(id: &str) -> Drive {
        Drive {
            id: id.to_string(),
            name: format!("Library {}", id),
            drive_type: "documentLibrary".to_string(),
        }
    }

    fn item(id: &str, name: &str) -> DriveItem {
        DriveItem {
            id: id.to_string(),
            name: name.to_string(),
            web_url: format!("https://contoso.sharepoint.com/{}", name),
            size: 1024,
        }
    }

    fn identifier() -> WeakIdentifier {
        WeakIdentifier::new("a5cf69d6", Some("historico".to_string()))
    }

    #[tokio::test]
    async fn test_root_listing_match_short_circuits() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1"), drive("d2"), drive("d3")],
            ..Default::default()
        };
        directory.children.insert("d1".into(), vec![item("x1", "notas.xlsx")]);
        directory
            .children
            .insert("d2".into(), vec![item("01a5cf69d6", "historico.xlsx")]);

        let coordinate = locate(&directory, "site", &identifier()).await.unwrap();

        assert_eq!(
            coordinate,
            ResolvedDocumentCoordinate {
                drive_id: "d2".to_string(),
                item_id: "01a5cf69d6".to_string(),
            }
        );

        let calls = directory.calls();
        assert_eq!(
            calls,
            vec![
                "drives:site",
                "children:d1",
                "search:d1:historico",
                "item:d1:a5cf69d6",
                "children:d2",
            ]
        );
        assert!(!calls.iter().any(|c| c.contains("d3")));
    }

    #[tokio::test]
    async fn test_not_found_after_all_strategies() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1"), drive("d2")],
            ..Default::default()
        };
        directory.children.insert("d1".into(), vec![item("x1", "notas.xlsx")]);

        let err = locate(&directory, "site", &identifier()).await.unwrap_err();
        assert!(matches!(err, BridgeError::NotFound(_)));
        assert_eq!(directory.calls().len(), 1 + 3 * 2);
    }

    #[tokio::test]
    async fn test_no_drives_is_not_found() {
        let directory = FakeDirectory::default();
        let err = locate(&directory, "site", &identifier()).await.unwrap_err();
        assert!(matches!(err, BridgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failure_in_first_drive_does_not_stop_second() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1"), drive("d2")],
            failing_children: vec!["d1".to_string()],
            ..Default::default()
        };
        directory
            .children
            .insert("d2".into(), vec![item("01a5cf69d6", "historico.xlsx")]);

        let coordinate = locate(&directory, "site", &identifier()).await.unwrap();
        assert_eq!(coordinate.drive_id, "d2");
        assert!(directory.calls().contains(&"children:d2".to_string()));
    }

    #[tokio::test]
    async fn test_search_failure_moves_to_next_drive() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1"), drive("d2")],
            failing_search: vec!["d1".to_string()],
            ..Default::default()
        };
        directory
            .search_results
            .insert("d2".into(), vec![item("zz", "Historico 2024.xlsx")]);

        let coordinate = locate(&directory, "site", &identifier()).await.unwrap();
        assert_eq!(
            coordinate,
            ResolvedDocumentCoordinate {
                drive_id: "d2".to_string(),
                item_id: "zz".to_string(),
            }
        );

        let calls = directory.calls();
        assert!(calls.contains(&"item:d1:a5cf69d6".to_string()));
        assert!(calls.contains(&"search:d2:historico".to_string()));
    }

    #[tokio::test]
    async fn test_direct_access_server_error_is_skipped() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1"), drive("d2")],
            failing_items: true,
            ..Default::default()
        };
        directory
            .children
            .insert("d2".into(), vec![item("zz", "historico.xlsx")]);

        let coordinate = locate(&directory, "site", &identifier()).await.unwrap();
        assert_eq!(coordinate.drive_id, "d2");
        assert_eq!(coordinate.item_id, "zz");
        assert!(directory.calls().contains(&"children:d2".to_string()));
    }

    #[tokio::test]
    async fn test_direct_access_server_error_ends_in_not_found() {
        let directory = FakeDirectory {
            drives: vec![drive("d1")],
            failing_items: true,
            ..Default::default()
        };

        let err = locate(&directory, "site", &identifier()).await.unwrap_err();
        assert!(matches!(err, BridgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_worksheet_listing_failure_yields_empty_list() {
        let directory = FakeDirectory {
            failing_worksheets: true,
            ..Default::default()
        };

        let names = list_worksheets(&directory, "d1", "i1").await;
        assert!(names.is_empty());
        assert_eq!(directory.calls(), vec!["worksheets:d1:i1"]);
    }

    #[tokio::test]
    async fn test_worksheet_listing_passes_names_through() {
        let directory = FakeDirectory::default();
        let names = list_worksheets(&directory, "d1", "i1").await;
        assert_eq!(names, vec!["Sheet1".to_string()]);
    }

    #[tokio::test]
    async fn test_root_listing_ignores_non_spreadsheets() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1")],
            ..Default::default()
        };
        directory
            .children
            .insert("d1".into(), vec![item("a5cf69d6-doc", "historico.docx")]);
        directory
            .search_results
            .insert("d1".into(), vec![item("s1", "Historico Pesagem.xlsx")]);

        let coordinate = locate(&directory, "site", &identifier()).await.unwrap();
        assert_eq!(coordinate.item_id, "s1");
    }

    #[tokio::test]
    async fn test_direct_access_accepts_any_existing_item() {
        let mut directory = FakeDirectory {
            drives: vec![drive("d1")],
            ..Default::default()
        };
        directory.items.insert(
            ("d1".to_string(), "a5cf69d6".to_string()),
            item("a5cf69d6", "renamed.bin"),
        );

        let coordinate = locate(&directory, "site", &identifier()).await.unwrap();
        assert_eq!(coordinate.item_id, "a5cf69d6");
    }

    #[tokio::test]
    async fn test_search_skipped_without_name_hint() {
        let directory = FakeDirectory {
            drives: vec![drive("d1")],
            ..Default::default()
        };
        let identifier = WeakIdentifier::new("a5cf69d6", None);

        let _ = locate(&directory, "site", &identifier).await;
        assert!(!directory.calls().iter().any(|c| c.starts_with("search")));
    }

    #[tokio::test]
    async fn test_empty_identifier_is_rejected() {
        let directory = FakeDirectory::default();
        let err = locate(&directory, "site", &WeakIdentifier::default()).await.unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(directory.calls().is_empty());
    }
}
