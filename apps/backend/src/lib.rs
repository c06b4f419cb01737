pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::services::streak::StreakTracker;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub streak: StreakTracker,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running migrations...");
        db.run_migrations().await?;
    }

    let streak = StreakTracker::detect(&db, config.streak_tracking).await?;
    tracing::info!(enabled = streak.enabled(), "Streak tracking configured");

    let addr = config.bind_addr();
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
        streak,
    };

    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Account routes
        .route("/api/auth/me", get(routes::users::me))
        .route("/api/auth/logout", post(routes::users::logout))
        .route("/api/user/update-streak", post(routes::users::update_streak))
        // Project routes
        .route("/api/projects", post(routes::projects::create))
        .route(
            "/api/projects/{id}",
            get(routes::projects::get).delete(routes::projects::soft_delete),
        )
        .route("/api/projects/{id}/restore", post(routes::projects::restore))
        .route(
            "/api/projects/{id}/permanent",
            delete(routes::projects::permanent_delete),
        )
        .route(
            "/api/projects/{id}/share",
            post(routes::sharing::enable).delete(routes::sharing::disable),
        )
        // Task routes
        .route("/api/tasks", post(routes::tasks::create))
        .route(
            "/api/tasks/{id}",
            get(routes::tasks::get).delete(routes::tasks::soft_delete),
        )
        .route("/api/tasks/{id}/toggle", patch(routes::tasks::toggle))
        .route("/api/tasks/{id}/restore", post(routes::tasks::restore))
        .route("/api/tasks/{id}/permanent", delete(routes::tasks::permanent_delete))
        .route("/api/tasks/{id}/tags", put(routes::tasks::set_tags))
        // Trash and dashboard
        .route("/api/trash", get(routes::trash::list))
        .route("/api/dashboard", get(routes::dashboard::get))
        // Focus routes
        .route("/api/focus/start", post(routes::focus::start))
        .route("/api/focus/stats", get(routes::focus::stats))
        .route("/api/focus/{id}/end", post(routes::focus::end))
        // Tag routes
        .route(
            "/api/tags",
            get(routes::tags::list).post(routes::tags::create),
        )
        .route(
            "/api/tags/{id}",
            put(routes::tags::update).delete(routes::tags::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::users::register))
        .route("/api/auth/login", post(routes::users::login))
        .route("/api/calendar.ics", get(routes::calendar::feed))
        .route(
            "/api/projects/shared/{token}",
            get(routes::sharing::shared_project),
        )
        .route(
            "/api/projects/shared/{token}/tasks",
            get(routes::sharing::shared_tasks),
        )
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(frontend_url, "FRONTEND_URL is not a valid origin, allowing any");
            CorsLayer::permissive()
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
