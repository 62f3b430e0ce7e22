pub mod course_service;
pub mod directory_service;
pub mod membership_service;
pub mod prayer_service;
pub mod reaction_service;
pub mod role_service;
pub mod song_service;
pub mod user_service;

pub use directory_service::{DirectoryError, DirectoryLookup, DirectoryService};
pub use role_service::RoleService;
