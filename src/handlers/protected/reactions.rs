use axum::extract::{Extension, Path};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::realtime::aggregator::ReactionAggregator;
use crate::services::prayer_service::PrayerService;

/// POST /api/prayers/:id/reactions/toggle - Flip the caller's "I'm praying"
/// marker. Open to any signed-in user, no role needed. Returns the state
/// after the flip so the client can render without waiting for the feed.
pub async fn toggle(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    // Reject toggles against prayers that do not exist before touching state
    let prayers = PrayerService::new().await?;
    prayers.get(id).await?;

    let mut aggregator = ReactionAggregator::shared().lock().await;
    let reacting = aggregator.toggle(id, Some(user.user_id)).await?;
    let count = aggregator.count_for(id);

    Ok(ApiResponse::ok(json!({
        "prayer_id": id,
        "reacting": reacting,
        "count": count,
    })))
}
