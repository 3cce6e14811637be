//! Server-side database backup trigger.

use serde_json::Value;
use tracing::{error, info};

use crate::api::{ApiClient, HttpMethod};
use crate::error::ApiResult;

/// Ask the server to create a backup. Any 2xx counts as success; the body,
/// if any, is returned for display.
pub async fn create_backup(client: &ApiClient) -> ApiResult<Value> {
    match client
        .request(HttpMethod::Get, "/backup/secret/create-backup", &[], None)
        .await
    {
        Ok(body) => {
            info!("backup created");
            Ok(body)
        }
        Err(e) => {
            error!(error = %e, "backup failed");
            Err(e)
        }
    }
}
