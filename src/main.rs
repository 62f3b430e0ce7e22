use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod filter;
mod handlers;
mod middleware;
mod realtime;
mod services;

use realtime::aggregator::ReactionAggregator;
use realtime::hub::FeedHub;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = crate::config::config();
    tracing::info!("Starting Flock API in {:?} mode", config.environment);

    // Seed the reaction board from the store. A failed load is not fatal:
    // the board starts empty and converges through the feed and retried
    // bulk loads from clients.
    {
        let mut aggregator = ReactionAggregator::shared().lock().await;
        if let Err(e) = aggregator.load_all().await {
            tracing::warn!("Reaction board bulk load failed, starting empty: {}", e);
        }
    }

    // Feed plumbing: LISTEN bridge for cross-process events, plus a pump
    // applying every hub event to the shared board.
    realtime::listener::spawn_reaction_bridge();
    tokio::spawn(async {
        let mut subscription = FeedHub::global().subscribe();
        while let Some(event) = subscription.next().await {
            ReactionAggregator::shared().lock().await.apply_remote(&event);
        }
    });

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("FLOCK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Flock API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_routes())
        // Public church surfaces (anonymous or signed-in)
        .merge(board_routes())
        // Realtime feed
        .merge(feed_routes())
        // Protected admin API
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
}

fn board_routes() -> Router {
    use handlers::public::{catalog, directory, prayers, reactions};

    Router::new()
        .route("/churches/:church", get(directory::church_home))
        .route(
            "/churches/:church/prayers",
            get(prayers::list).post(prayers::submit),
        )
        .route("/churches/:church/reactions", get(reactions::bulk_map))
        .route("/churches/:church/songs", get(catalog::list_songs))
        .route("/songs/:id", get(catalog::get_song))
        .route("/churches/:church/courses", get(catalog::list_courses))
        .route("/courses/:id", get(catalog::get_course))
        // Identity is optional on these routes; a valid token personalizes
        // the response, anything else stays anonymous
        .layer(axum::middleware::from_fn(
            middleware::auth::optional_auth_middleware,
        ))
}

fn feed_routes() -> Router {
    use handlers::public::feed;

    Router::new().route("/feed/reactions", get(feed::reactions))
}

fn admin_routes() -> Router {
    use axum::routing::{delete, post, put};
    use handlers::protected::{auth, courses, memberships, prayers, reactions, songs};

    Router::new()
        // Session introspection
        .route("/api/auth/whoami", get(auth::whoami))
        // Prayer moderation and lifecycle
        .route("/api/prayers/:id", put(prayers::update).delete(prayers::delete))
        .route("/api/prayers/:id/answered", post(prayers::mark_answered))
        .route("/api/prayers/:id/request", post(prayers::mark_request))
        // Reactions (any signed-in user)
        .route("/api/prayers/:id/reactions/toggle", post(reactions::toggle))
        // Roster administration
        .route(
            "/api/churches/:church/services/:service/memberships",
            get(memberships::roster).post(memberships::grant),
        )
        .route(
            "/api/churches/:church/services/:service/memberships/:user_id",
            delete(memberships::revoke),
        )
        // Worship songbook
        .route("/api/churches/:church/songs", post(songs::create))
        .route("/api/songs/:id", put(songs::update).delete(songs::delete))
        // Discipleship courses
        .route("/api/churches/:church/courses", post(courses::create_course))
        .route(
            "/api/courses/:id",
            put(courses::update_course).delete(courses::delete_course),
        )
        .route("/api/courses/:id/lessons", post(courses::create_lesson))
        .route(
            "/api/lessons/:id",
            put(courses::update_lesson).delete(courses::delete_lesson),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::jwt_auth_middleware,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Flock API",
            "version": version,
            "description": "Multi-tenant church management backend",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/login, /auth/register (public)",
                "churches": "/churches/:church (public)",
                "prayers": "/churches/:church/prayers (public)",
                "reactions": "/churches/:church/reactions (public), /api/prayers/:id/reactions/toggle (protected)",
                "feed": "/feed/reactions (public, SSE)",
                "songs": "/churches/:church/songs (public), /api/churches/:church/songs (protected)",
                "courses": "/churches/:church/courses (public), /api/churches/:church/courses (protected)",
                "memberships": "/api/churches/:church/services/:service/memberships (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
