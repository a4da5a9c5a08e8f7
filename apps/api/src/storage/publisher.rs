use std::path::Path;

use tracing::{info, warn};

use crate::storage::{FileStore, StoreError};

/// Uploads the rendered report and returns its public link.
///
/// Upload and grant are both required. If the grant fails the object stays
/// in the folder without public access; that is logged and returned as an
/// error, never reported as success.
pub async fn publish_report(
    store: &dyn FileStore,
    report_path: &Path,
    folder: &str,
) -> Result<String, StoreError> {
    let name = report_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report.pdf")
        .to_string();
    let bytes = tokio::fs::read(report_path).await?;

    let object_id = store.upload(&name, bytes, folder).await?;

    if let Err(e) = store.grant_public_read(&object_id).await {
        warn!("Report {object_id} uploaded but left private: {e}");
        return Err(e);
    }

    let link = store.share_link(&object_id);
    info!("Published report {object_id}");
    Ok(link)
}
