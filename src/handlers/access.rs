// Admin gating for mutating endpoints. Every check funnels through the
// role resolver, so the fail-closed policy decides here too: an unknown
// church, a missing module, or a backend hiccup all read as viewer.

use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::directory_service::{DirectoryLookup, DirectoryService};
use crate::services::role_service::RoleService;

/// Module slug that gates worship song management.
pub const WORSHIP_MODULE: &str = "worship";
/// Module slug that gates discipleship course management.
pub const DISCIPLESHIP_MODULE: &str = "discipleship";

/// Require admin on a (church slug, service slug) pair.
pub async fn require_admin(
    church_slug: &str,
    service_slug: &str,
    user: &AuthUser,
) -> Result<(), ApiError> {
    let roles = RoleService::new().await?;
    if roles
        .resolve(church_slug, service_slug, Some(user.user_id))
        .await
        .is_admin()
    {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}

/// Require admin on already-resolved ids, for endpoints addressed by record
/// id (a fetched prayer already carries its church and service ids).
pub async fn require_admin_for_ids(
    church_id: Uuid,
    service_id: Uuid,
    user: &AuthUser,
) -> Result<(), ApiError> {
    let roles = RoleService::new().await?;
    if roles
        .role_for_ids(church_id, service_id, user.user_id)
        .await
        .is_admin()
    {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}

/// Require admin on a named module ("worship", "discipleship") of a church
/// known only by id. A church without that module has nobody holding the
/// role, so the answer is forbidden.
pub async fn require_module_admin(
    church_id: Uuid,
    module_slug: &str,
    user: &AuthUser,
) -> Result<(), ApiError> {
    let directory = DirectoryService::new().await?;
    let service = directory
        .service_by_slug(church_id, module_slug)
        .await?
        .ok_or_else(|| ApiError::forbidden("Admin access required"))?;

    require_admin_for_ids(church_id, service.id, user).await
}
