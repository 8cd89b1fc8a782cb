use reqwest::Url;

use super::ResolvedDocumentCoordinate;

/// Read a document coordinate out of a cloud-office share link such as
/// `https://excel.cloud.microsoft/open/onedrive/?docId=D1B4FC2F8C816AEE%21sa5cf...&driveId=D1B4FC2F8C816AEE`.
///
/// `docId` is `<driveId>!<itemId>`; the drive part is used when the link has
/// no separate `driveId` parameter.
pub fn coordinate_from_share_url(share_url: &str) -> Option<ResolvedDocumentCoordinate> {
    let url = Url::parse(share_url.trim()).ok()?;

    let mut doc_id = None;
    let mut drive_id = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "docId" | "docid" => doc_id = Some(value.into_owned()),
            "driveId" | "driveid" => drive_id = Some(value.into_owned()),
            _ => {}
        }
    }

    let doc_id = doc_id.filter(|d| !d.is_empty())?;
    let (doc_drive, item_id) = match doc_id.split_once('!') {
        Some((drive, item)) => (Some(drive.to_string()), item.to_string()),
        None => (None, doc_id),
    };

    let drive_id = drive_id.filter(|d| !d.is_empty()).or(doc_drive)?;
    if item_id.is_empty() {
        return None;
    }

    Some(ResolvedDocumentCoordinate { drive_id, item_id })
}
