use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Prayer, PrayerStatus};
use crate::handlers::access::require_admin_for_ids;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::prayer_service::PrayerService;

#[derive(Debug, Deserialize)]
pub struct EditPrayer {
    pub body: Option<String>,
    pub category: Option<String>,
}

/// Fetch the prayer and verify the caller administers its board.
async fn load_gated(id: Uuid, user: &AuthUser) -> Result<(PrayerService, Prayer), crate::error::ApiError> {
    let prayers = PrayerService::new().await?;
    let prayer = prayers.get(id).await?;
    require_admin_for_ids(prayer.church_id, prayer.service_id, user).await?;
    Ok((prayers, prayer))
}

/// PUT /api/prayers/:id - Edit body and/or category.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditPrayer>,
) -> ApiResult<Prayer> {
    let (prayers, _) = load_gated(id, &user).await?;
    let prayer = prayers
        .update(id, payload.body.as_deref(), payload.category.as_deref())
        .await?;

    Ok(ApiResponse::ok(prayer))
}

/// DELETE /api/prayers/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let (prayers, _) = load_gated(id, &user).await?;
    prayers.delete(id).await?;

    Ok(ApiResponse::ok(json!({ "deleted": id })))
}

/// POST /api/prayers/:id/answered - Move a request into the answered column.
/// The write is unconditional, so repeating it is harmless.
pub async fn mark_answered(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Prayer> {
    let (prayers, _) = load_gated(id, &user).await?;
    let prayer = prayers.set_status(id, PrayerStatus::Answered).await?;

    Ok(ApiResponse::ok(prayer))
}

/// POST /api/prayers/:id/request - Move an answered prayer back to request.
pub async fn mark_request(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Prayer> {
    let (prayers, _) = load_gated(id, &user).await?;
    let prayer = prayers.set_status(id, PrayerStatus::Request).await?;

    Ok(ApiResponse::ok(prayer))
}
