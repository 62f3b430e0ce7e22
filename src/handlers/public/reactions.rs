use axum::extract::{Extension, Path};
use serde_json::{json, Map, Value};

use crate::middleware::auth::MaybeUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::realtime::aggregator::ReactionAggregator;
use crate::services::directory_service::DirectoryService;
use crate::services::prayer_service::PrayerService;

/// GET /churches/:church/reactions - Bulk reaction map for a church's
/// prayers: per-prayer support counts, plus which of them the caller has
/// reacted to when signed in. This is the board's initial snapshot; deltas
/// arrive over the feed.
pub async fn bulk_map(
    Path(church): Path<String>,
    Extension(maybe_user): Extension<MaybeUser>,
) -> ApiResult<Value> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;

    let prayers = PrayerService::new().await?;
    let prayer_ids = prayers.ids_for_church(church.id).await?;

    let aggregator = ReactionAggregator::shared().lock().await;

    let mut counts = Map::new();
    for prayer_id in &prayer_ids {
        let count = aggregator.count_for(*prayer_id);
        if count > 0 {
            counts.insert(prayer_id.to_string(), json!(count));
        }
    }

    let mine: Vec<String> = match maybe_user.user_id() {
        Some(user_id) => prayer_ids
            .iter()
            .filter(|prayer_id| aggregator.has_reacted(**prayer_id, user_id))
            .map(|prayer_id| prayer_id.to_string())
            .collect(),
        None => Vec::new(),
    };

    Ok(ApiResponse::ok(json!({
        "counts": counts,
        "mine": mine,
    })))
}
