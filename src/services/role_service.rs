use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::database::models::church::normalize_slug;
use crate::database::models::Role;
use crate::services::directory_service::{DirectoryError, DirectoryLookup, DirectoryService};

/// Resolves the acting user's permission level for one (church, service)
/// pair by chaining church -> service -> membership lookups.
///
/// Resolution is total: it never errors and never panics. Anything that
/// prevents a clean answer - unknown church, unknown service, missing
/// membership, backend failure, unparseable stored role - resolves to
/// `Viewer`. A partial outage must degrade reads, never escalate privilege.
pub struct RoleService {
    directory: Arc<dyn DirectoryLookup>,
}

impl RoleService {
    pub async fn new() -> Result<Self, DirectoryError> {
        Ok(Self::with_lookup(Arc::new(DirectoryService::new().await?)))
    }

    pub fn with_lookup(directory: Arc<dyn DirectoryLookup>) -> Self {
        Self { directory }
    }

    /// Resolve the role for a church slug, service slug and optional user.
    /// Anonymous callers short-circuit to `Viewer` with zero lookups.
    pub async fn resolve(
        &self,
        church_slug: &str,
        service_slug: &str,
        user_id: Option<Uuid>,
    ) -> Role {
        let Some(user_id) = user_id else {
            return Role::Viewer;
        };

        let church_slug = normalize_slug(church_slug);
        let church = match self.directory.church_by_slug(&church_slug).await {
            Ok(Some(church)) => church,
            Ok(None) => return Role::Viewer,
            Err(e) => {
                warn!("Role resolution degraded to viewer: church lookup failed: {}", e);
                return Role::Viewer;
            }
        };

        let service = match self.directory.service_by_slug(church.id, service_slug).await {
            Ok(Some(service)) => service,
            Ok(None) => return Role::Viewer,
            Err(e) => {
                warn!("Role resolution degraded to viewer: service lookup failed: {}", e);
                return Role::Viewer;
            }
        };

        self.role_for_ids(church.id, service.id, user_id).await
    }

    /// Membership tail of the chain, for callers that already hold resolved
    /// ids (e.g. gating a mutation on a fetched prayer). Same fail-closed
    /// policy as [`Self::resolve`].
    pub async fn role_for_ids(&self, church_id: Uuid, service_id: Uuid, user_id: Uuid) -> Role {
        match self
            .directory
            .membership_role(church_id, service_id, user_id)
            .await
        {
            Ok(Some(stored)) => stored.parse().unwrap_or_else(|_| {
                warn!(
                    "Membership ({}, {}, {}) holds unknown role '{}', treating as viewer",
                    church_id, service_id, user_id, stored
                );
                Role::Viewer
            }),
            Ok(None) => Role::Viewer,
            Err(e) => {
                warn!("Role resolution degraded to viewer: membership lookup failed: {}", e);
                Role::Viewer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::database::models::church::{Church, ChurchService};

    /// In-memory directory double with a failure switch and a lookup counter.
    #[derive(Default)]
    struct MemoryDirectory {
        churches: Mutex<HashMap<String, Church>>,
        services: Mutex<HashMap<(Uuid, String), ChurchService>>,
        memberships: Mutex<HashMap<(Uuid, Uuid, Uuid), String>>,
        fail: AtomicBool,
        lookups: AtomicUsize,
    }

    impl MemoryDirectory {
        fn add_church(&self, slug: &str) -> Uuid {
            let church = Church {
                id: Uuid::new_v4(),
                slug: slug.to_string(),
                name: slug.to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            let id = church.id;
            self.churches.lock().unwrap().insert(slug.to_string(), church);
            id
        }

        fn add_service(&self, church_id: Uuid, slug: &str) -> Uuid {
            let service = ChurchService {
                id: Uuid::new_v4(),
                church_id,
                slug: slug.to_string(),
                name: slug.to_string(),
                created_at: Utc::now(),
            };
            let id = service.id;
            self.services
                .lock()
                .unwrap()
                .insert((church_id, slug.to_string()), service);
            id
        }

        fn add_membership(&self, church_id: Uuid, service_id: Uuid, user_id: Uuid, role: &str) {
            self.memberships
                .lock()
                .unwrap()
                .insert((church_id, service_id, user_id), role.to_string());
        }

        fn check_failure(&self) -> Result<(), DirectoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(DirectoryError::NotFound("backend offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DirectoryLookup for MemoryDirectory {
        async fn church_by_slug(&self, slug: &str) -> Result<Option<Church>, DirectoryError> {
            self.check_failure()?;
            Ok(self.churches.lock().unwrap().get(slug).cloned())
        }

        async fn service_by_slug(
            &self,
            church_id: Uuid,
            slug: &str,
        ) -> Result<Option<ChurchService>, DirectoryError> {
            self.check_failure()?;
            Ok(self
                .services
                .lock()
                .unwrap()
                .get(&(church_id, slug.to_string()))
                .cloned())
        }

        async fn membership_role(
            &self,
            church_id: Uuid,
            service_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<String>, DirectoryError> {
            self.check_failure()?;
            Ok(self
                .memberships
                .lock()
                .unwrap()
                .get(&(church_id, service_id, user_id))
                .cloned())
        }
    }

    fn service_with(directory: Arc<MemoryDirectory>) -> RoleService {
        RoleService::with_lookup(directory)
    }

    #[tokio::test]
    async fn anonymous_user_is_viewer_with_zero_lookups() {
        let directory = Arc::new(MemoryDirectory::default());
        let roles = service_with(directory.clone());

        let role = roles.resolve("riverside", "worship", None).await;
        assert_eq!(role, Role::Viewer);
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_church_resolves_to_viewer() {
        let directory = Arc::new(MemoryDirectory::default());
        let roles = service_with(directory);

        let role = roles.resolve("nowhere", "worship", Some(Uuid::new_v4())).await;
        assert_eq!(role, Role::Viewer);
    }

    #[tokio::test]
    async fn unknown_service_resolves_to_viewer() {
        let directory = Arc::new(MemoryDirectory::default());
        directory.add_church("riverside");
        let roles = service_with(directory);

        let role = roles.resolve("riverside", "worship", Some(Uuid::new_v4())).await;
        assert_eq!(role, Role::Viewer);
    }

    #[tokio::test]
    async fn missing_membership_resolves_to_viewer() {
        let directory = Arc::new(MemoryDirectory::default());
        let church = directory.add_church("riverside");
        directory.add_service(church, "worship");
        let roles = service_with(directory);

        let u1 = Uuid::new_v4();
        let role = roles.resolve("riverside", "worship", Some(u1)).await;
        assert_eq!(role, Role::Viewer);
    }

    #[tokio::test]
    async fn admin_membership_resolves_to_admin() {
        let directory = Arc::new(MemoryDirectory::default());
        let church = directory.add_church("riverside");
        let service = directory.add_service(church, "worship");
        let user = Uuid::new_v4();
        directory.add_membership(church, service, user, "admin");
        let roles = service_with(directory);

        let role = roles.resolve("riverside", "worship", Some(user)).await;
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn church_slug_is_normalized_before_lookup() {
        let directory = Arc::new(MemoryDirectory::default());
        let church = directory.add_church("riverside");
        let service = directory.add_service(church, "worship");
        let user = Uuid::new_v4();
        directory.add_membership(church, service, user, "admin");
        let roles = service_with(directory);

        let role = roles.resolve("  Riverside ", "worship", Some(user)).await;
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn same_service_slug_under_another_church_does_not_leak() {
        let directory = Arc::new(MemoryDirectory::default());
        let first = directory.add_church("riverside");
        let first_service = directory.add_service(first, "worship");
        let second = directory.add_church("hillside");
        directory.add_service(second, "worship");

        let user = Uuid::new_v4();
        directory.add_membership(first, first_service, user, "admin");
        let roles = service_with(directory);

        assert_eq!(roles.resolve("riverside", "worship", Some(user)).await, Role::Admin);
        assert_eq!(roles.resolve("hillside", "worship", Some(user)).await, Role::Viewer);
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_viewer() {
        let directory = Arc::new(MemoryDirectory::default());
        let church = directory.add_church("riverside");
        let service = directory.add_service(church, "worship");
        let user = Uuid::new_v4();
        directory.add_membership(church, service, user, "admin");
        directory.fail.store(true, Ordering::SeqCst);
        let roles = service_with(directory);

        let role = roles.resolve("riverside", "worship", Some(user)).await;
        assert_eq!(role, Role::Viewer);
    }

    #[tokio::test]
    async fn unparseable_stored_role_degrades_to_viewer() {
        let directory = Arc::new(MemoryDirectory::default());
        let church = directory.add_church("riverside");
        let service = directory.add_service(church, "worship");
        let user = Uuid::new_v4();
        directory.add_membership(church, service, user, "superuser");
        let roles = service_with(directory);

        let role = roles.resolve("riverside", "worship", Some(user)).await;
        assert_eq!(role, Role::Viewer);
    }
}
