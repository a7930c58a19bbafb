use axum::{
    extract::{FromRef, State},
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenValidator;
use crate::database::DatabaseManager;
use crate::dispatch::Dispatcher;
use crate::handlers;
use crate::middleware::{exception_middleware, require_bearer};

/// Everything the routes need, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub tokens: TokenValidator,
    pub pool: Option<PgPool>,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, tokens: TokenValidator) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tokens,
            pool: None,
            cors_origins: Vec::new(),
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}

impl FromRef<AppState> for Arc<Dispatcher> {
    fn from_ref(state: &AppState) -> Self {
        state.dispatcher.clone()
    }
}

impl FromRef<AppState> for TokenValidator {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(users_public_routes())
        // Bearer token required
        .merge(guarded_routes(&state))
        .with_state(state)
        // Global middleware; the exception handler wraps everything
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(from_fn(exception_middleware))
}

fn users_public_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/api/Users/GetUserByUserNameAndPassword", post(users::login))
        .route("/api/Users/RefreshToken", post(users::refresh_token))
}

fn guarded_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(users_admin_routes())
        .merge(home_routes())
        .merge(user_management_routes())
        // route_layer keeps unknown paths at 404 instead of 401
        .route_layer(from_fn_with_state(state.clone(), require_bearer))
}

fn users_admin_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/api/Users/GetAllUsers", get(users::all_users))
        .route("/api/Users/DeactivateUser", delete(users::deactivate_user))
        .route("/api/Users/DeactivateUser/:id", delete(users::deactivate_user))
}

fn home_routes() -> Router<AppState> {
    use handlers::home;

    Router::new()
        .route("/api/Home/GetUserMenus", get(home::user_menus))
        .route("/api/Home/GetUserMenus/:user_id", get(home::user_menus))
}

fn user_management_routes() -> Router<AppState> {
    use handlers::user_management as um;

    Router::new()
        .route("/api/UserManagement/GetUserlevelLookup", post(um::user_level_lookup))
        .route("/api/UserManagement/GetUserdesignationlevel", post(um::designation_lookup))
        .route("/api/UserManagement/GetUserreportinglevel", post(um::reporting_level_lookup))
        .route("/api/UserManagement/GetExistingUserDetails", post(um::existing_user_details))
        .route("/api/UserManagement/GetUserTranslander", post(um::user_translander))
        .route("/api/UserManagement/UserInsert", post(um::user_insert))
        .route("/api/UserManagement/UserUpdate", post(um::user_update))
}

/// Origins come from config. Credentials are only allowed with an explicit
/// origin list since browsers reject them alongside a wildcard.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "Status": "Success",
        "Message": {
            "Name": "FOS Users API",
            "Version": env!("CARGO_PKG_VERSION"),
            "Endpoints": {
                "Users": "/api/Users/GetUserByUserNameAndPassword, /api/Users/RefreshToken (public)",
                "UserAdmin": "/api/Users/GetAllUsers, /api/Users/DeactivateUser/:id (bearer token)",
                "Home": "/api/Home/GetUserMenus/:userId (bearer token)",
                "UserManagement": "/api/UserManagement/* (bearer token)",
                "Health": "/health (public)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "Status": "Error",
                "Message": { "Timestamp": now, "Database": "not configured" }
            })),
        );
    };

    match DatabaseManager::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "Status": "Success",
                "Message": { "Timestamp": now, "Database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "Status": "Error",
                    "Message": { "Timestamp": now, "Database": "unavailable" }
                })),
            )
        }
    }
}
