use axum::extract::Path;
use serde_json::{json, Value};

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::directory_service::DirectoryService;

/// GET /churches/:church - Church descriptor plus its service modules.
pub async fn church_home(Path(church): Path<String>) -> ApiResult<Value> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;
    let services = directory.list_services(church.id).await?;

    Ok(ApiResponse::ok(json!({
        "church": church,
        "services": services,
    })))
}
