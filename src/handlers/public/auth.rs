use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::user_service::UserService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// POST /auth/login - Authenticate and receive a JWT session token.
///
/// The token carries identity only. Roles are resolved against the
/// membership tables on every request, so nothing here encodes privilege.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let users = UserService::new().await?;
    let user = users.verify(&payload.email, &payload.password).await?;

    let claims = Claims::new(user.id, user.email.clone(), user.name.clone());
    let token = generate_jwt(claims)?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(ApiResponse::ok(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
        },
        "expires_in": expires_in,
    })))
}

/// POST /auth/register - Create an account. New accounts hold no roles;
/// an admin grants those per (church, service) afterwards.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    let users = UserService::new().await?;
    let user = users
        .register(&payload.email, &payload.name, &payload.password)
        .await?;

    Ok(ApiResponse::created(json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
    })))
}
