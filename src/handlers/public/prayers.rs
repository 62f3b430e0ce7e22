use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;

use crate::config;
use crate::database::models::{Prayer, PrayerStatus};
use crate::filter::PrayerQuery;
use crate::middleware::response::{ApiResponse, ApiResult, ListMeta};
use crate::services::directory_service::DirectoryService;
use crate::services::prayer_service::PrayerService;

#[derive(Debug, Deserialize)]
pub struct SubmitPrayer {
    /// Board to post on; defaults like the listing does.
    pub service: Option<String>,
    pub author_name: String,
    pub body: String,
    pub category: Option<String>,
    /// Testimonies land directly in the answered column.
    #[serde(default)]
    pub testimony: bool,
}

fn effective_service(requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&config::config().api.default_service_slug)
        .to_string()
}

/// GET /churches/:church/prayers - Filtered, sorted, paginated board.
pub async fn list(
    Path(church): Path<String>,
    Query(query): Query<PrayerQuery>,
) -> ApiResult<Vec<Prayer>> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;
    let service_slug = effective_service(query.service.as_deref());
    let service = directory.require_service(church.id, &service_slug).await?;

    let prayers = PrayerService::new().await?;
    let (page, total) = prayers.list(church.id, service.id, &query).await?;

    Ok(ApiResponse::page(
        page,
        ListMeta {
            total,
            page: query.page(),
            page_size: query.page_size(),
        },
    ))
}

/// POST /churches/:church/prayers - Submit a prayer or testimony.
/// Open to anonymous visitors; the author name is whatever they wrote.
pub async fn submit(
    Path(church): Path<String>,
    Json(payload): Json<SubmitPrayer>,
) -> ApiResult<Prayer> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;
    let service_slug = effective_service(payload.service.as_deref());
    let service = directory.require_service(church.id, &service_slug).await?;

    let status = if payload.testimony {
        PrayerStatus::Answered
    } else {
        PrayerStatus::Request
    };

    let prayers = PrayerService::new().await?;
    let prayer = prayers
        .submit(
            church.id,
            service.id,
            &payload.author_name,
            &payload.body,
            payload.category.as_deref(),
            status,
        )
        .await?;

    Ok(ApiResponse::created(prayer))
}
