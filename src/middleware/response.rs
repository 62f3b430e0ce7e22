use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Serialize)]
pub struct ListMeta {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Wrapper for API responses that automatically adds the success envelope:
/// `{"success": true, "data": ..., "meta": ...?}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: T,
    meta: Option<ListMeta>,
    status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data
    pub fn ok(data: T) -> Self {
        Self {
            data,
            meta: None,
            status_code: StatusCode::OK,
        }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self {
            data,
            meta: None,
            status_code: StatusCode::CREATED,
        }
    }

    /// 200 OK with pagination metadata
    pub fn page(data: T, meta: ListMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = match self.meta {
            Some(meta) => json!({
                "success": true,
                "data": data_value,
                "meta": meta,
            }),
            None => json!({
                "success": true,
                "data": data_value,
            }),
        };

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Standard handler return type: envelope on success, ApiError otherwise.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
