// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert service error types to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        use crate::database::manager::DatabaseError;
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            other => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::directory_service::DirectoryError> for ApiError {
    fn from(err: crate::services::directory_service::DirectoryError) -> Self {
        use crate::services::directory_service::DirectoryError;
        match err {
            DirectoryError::NotFound(what) => ApiError::not_found(format!("Unknown {}", what)),
            DirectoryError::ChurchExists(slug) => {
                ApiError::conflict(format!("Church '{}' already exists", slug))
            }
            DirectoryError::ServiceExists(slug) => {
                ApiError::conflict(format!("Service '{}' already exists", slug))
            }
            DirectoryError::InvalidSlug(msg) => ApiError::bad_request(format!("Invalid slug: {}", msg)),
            other => {
                tracing::error!("Directory error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::prayer_service::PrayerError> for ApiError {
    fn from(err: crate::services::prayer_service::PrayerError) -> Self {
        use crate::services::prayer_service::PrayerError;
        match err {
            PrayerError::NotFound(id) => ApiError::not_found(format!("Prayer {} not found", id)),
            PrayerError::MissingField(field) => {
                ApiError::bad_request(format!("Missing required field: {}", field))
            }
            PrayerError::Filter(e) => ApiError::bad_request(e.to_string()),
            other => {
                tracing::error!("Prayer error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::reaction_service::ReactionError> for ApiError {
    fn from(err: crate::services::reaction_service::ReactionError) -> Self {
        use crate::services::reaction_service::ReactionError;
        match err {
            ReactionError::Unauthenticated => ApiError::unauthorized("Sign in to support a prayer"),
            other => {
                tracing::error!("Reaction error: {}", other);
                ApiError::internal_server_error("Could not update your reaction")
            }
        }
    }
}

impl From<crate::services::membership_service::MembershipError> for ApiError {
    fn from(err: crate::services::membership_service::MembershipError) -> Self {
        use crate::services::membership_service::MembershipError;
        match err {
            MembershipError::UserNotFound(email) => {
                ApiError::not_found(format!("No user registered as {}", email))
            }
            other => {
                tracing::error!("Membership error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::user_service::UserError> for ApiError {
    fn from(err: crate::services::user_service::UserError) -> Self {
        use crate::services::user_service::UserError;
        match err {
            UserError::EmailTaken(email) => {
                ApiError::conflict(format!("Email already registered: {}", email))
            }
            UserError::InvalidCredentials => ApiError::unauthorized("Invalid email or password"),
            UserError::InvalidField(field) => ApiError::bad_request(format!("Invalid {}", field)),
            other => {
                tracing::error!("User error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::song_service::SongError> for ApiError {
    fn from(err: crate::services::song_service::SongError) -> Self {
        use crate::services::song_service::SongError;
        match err {
            SongError::NotFound(id) => ApiError::not_found(format!("Song {} not found", id)),
            SongError::MissingField(field) => {
                ApiError::bad_request(format!("Missing required field: {}", field))
            }
            other => {
                tracing::error!("Song error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::course_service::CourseError> for ApiError {
    fn from(err: crate::services::course_service::CourseError) -> Self {
        use crate::services::course_service::CourseError;
        match err {
            CourseError::CourseNotFound(id) => {
                ApiError::not_found(format!("Course {} not found", id))
            }
            CourseError::LessonNotFound(id) => {
                ApiError::not_found(format!("Lesson {} not found", id))
            }
            CourseError::MissingField(field) => {
                ApiError::bad_request(format!("Missing required field: {}", field))
            }
            other => {
                tracing::error!("Course error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        ApiError::internal_server_error("Could not issue a session token")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
