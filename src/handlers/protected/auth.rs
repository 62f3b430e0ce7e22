use axum::extract::{Extension, Query};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::role_service::RoleService;

#[derive(Debug, Deserialize)]
pub struct WhoamiQuery {
    pub church: Option<String>,
    pub service: Option<String>,
}

/// GET /api/auth/whoami - Token introspection. When a church/service pair is
/// supplied, the caller's resolved role for that scope rides along.
pub async fn whoami(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<WhoamiQuery>,
) -> ApiResult<Value> {
    let mut body = json!({
        "user": {
            "id": user.user_id,
            "email": user.email,
            "name": user.name,
        }
    });

    if let (Some(church), Some(service)) = (query.church.as_deref(), query.service.as_deref()) {
        let roles = RoleService::new().await?;
        let role = roles.resolve(church, service, Some(user.user_id)).await;
        body["scope"] = json!({
            "church": church,
            "service": service,
            "role": role,
        });
    }

    Ok(ApiResponse::ok(body))
}
