use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::{Membership, Role};
use crate::error::ApiError;
use crate::handlers::access::require_admin;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::directory_service::DirectoryService;
use crate::services::membership_service::{MembershipService, RosterEntry};

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub email: String,
    pub role: String,
}

async fn resolve_scope(
    church_slug: &str,
    service_slug: &str,
) -> Result<(Uuid, Uuid), ApiError> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(church_slug).await?;
    let service = directory.require_service(church.id, service_slug).await?;
    Ok((church.id, service.id))
}

/// GET /api/churches/:church/services/:service/memberships - Roster listing.
pub async fn roster(
    Extension(user): Extension<AuthUser>,
    Path((church, service)): Path<(String, String)>,
) -> ApiResult<Vec<RosterEntry>> {
    require_admin(&church, &service, &user).await?;
    let (church_id, service_id) = resolve_scope(&church, &service).await?;

    let roster = MembershipService::new()
        .await?
        .roster(church_id, service_id)
        .await?;

    Ok(ApiResponse::ok(roster))
}

/// POST /api/churches/:church/services/:service/memberships - Grant a role
/// by email. Granting over an existing assignment replaces it.
pub async fn grant(
    Extension(user): Extension<AuthUser>,
    Path((church, service)): Path<(String, String)>,
    Json(payload): Json<GrantRequest>,
) -> ApiResult<Membership> {
    require_admin(&church, &service, &user).await?;
    let (church_id, service_id) = resolve_scope(&church, &service).await?;

    let role = Role::from_str(&payload.role)
        .map_err(|_| ApiError::bad_request(format!("Unknown role: {}", payload.role)))?;

    let memberships = MembershipService::new().await?;
    let member_id = memberships.user_id_by_email(&payload.email).await?;
    let membership = memberships
        .grant(church_id, service_id, member_id, role)
        .await?;

    Ok(ApiResponse::created(membership))
}

/// DELETE /api/churches/:church/services/:service/memberships/:user_id -
/// Revoke an assignment. The user falls back to viewer, absence being the
/// default role.
pub async fn revoke(
    Extension(user): Extension<AuthUser>,
    Path((church, service, member_id)): Path<(String, String, Uuid)>,
) -> ApiResult<Value> {
    require_admin(&church, &service, &user).await?;
    let (church_id, service_id) = resolve_scope(&church, &service).await?;

    let removed = MembershipService::new()
        .await?
        .revoke(church_id, service_id, member_id)
        .await?;

    Ok(ApiResponse::ok(json!({ "revoked": removed })))
}
