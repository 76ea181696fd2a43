use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmTodoService, SeaOrmUserService, TodoService, UserService};

pub mod auth;
mod error;
mod observability;
mod todos;
mod types;
mod users;
mod validation;

pub use auth::{AUTH_HEADER, CurrentUser};
pub use error::ApiError;
pub use observability::RequestUser;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub todo_service: Arc<dyn TodoService>,

    pub user_service: Arc<dyn UserService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, store: Store, prometheus_handle: Option<PrometheusHandle>) -> Self {
        let todo_service = Arc::new(SeaOrmTodoService::new(store.clone()));
        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            todo_service,
            user_service,
            prometheus_handle,
        }
    }
}

/// Connects the store (running migrations) and wires the services.
pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::connect(&config.database).await?;
    Ok(Arc::new(AppState::new(config, store, prometheus_handle)))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let protected_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/users/me/token", delete(users::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/todos", post(todos::create_todo).get(todos::list_todos))
        .route(
            "/todos/{id}",
            get(todos::get_todo)
                .patch(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
        .route("/metrics", get(observability::get_metrics))
        .merge(protected_routes)
        .with_state(state)
        .layer(
            cors_layer
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([AUTH_HEADER]),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}
