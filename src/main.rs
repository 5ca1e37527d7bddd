mod auth;
mod config;
mod db;
mod users;
mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    models::{AckResponse, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, Role, SignupRequest, UserResponse},
    notify::{LogNotifier, ResetNotifier},
    repository::UserRepository,
    reset::ResetTokenGenerator,
    service::AuthService,
    token::TokenService,
};
use config::AppConfig;
use users::models::UpdateMeRequest;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::signup_handler,
        auth::handlers::login_handler,
        auth::handlers::logout_handler,
        auth::handlers::forgot_password_handler,
        auth::handlers::reset_password_handler,
        auth::handlers::change_password_handler,
        auth::handlers::me_handler,
        users::handlers::update_me_handler,
        users::handlers::delete_me_handler,
        users::handlers::list_users_handler,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            ChangePasswordRequest,
            UpdateMeRequest,
            AuthResponse,
            AckResponse,
            UserResponse,
            Role,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login, and password recovery"),
        (name = "users", description = "Account profile endpoints")
    ),
    info(
        title = "Grocery Store API",
        version = "1.0.0",
        description = "RESTful API for the grocery storefront",
    )
)]
struct ApiDoc;

/// Application state shared across handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenService,
    pub users: UserRepository,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Assemble the state from configuration: the signing secret is injected
    /// into the token service here and nowhere else
    pub fn new(db: PgPool, config: &AppConfig, notifier: Arc<dyn ResetNotifier>) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.session_ttl_seconds());
        let users = UserRepository::new(db.clone());
        let auth = Arc::new(AuthService::new(
            users.clone(),
            tokens.clone(),
            ResetTokenGenerator::new(config.reset_token_ttl_minutes),
            notifier,
        ));

        Self {
            db,
            tokens,
            users,
            auth,
        }
    }
}

/// Creates and configures the application router
///
/// Route tiers mirror the access model: public auth routes, routes behind
/// `protect`, and admin routes behind `protect` plus the role guard.
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        .route("/api/users", get(users::handlers::list_users_handler))
        .route_layer(middleware::from_fn({
            let guard = auth::middleware::RequireRole::admin();
            move |request: axum::extract::Request, next: middleware::Next| {
                guard.clone().middleware(request, next)
            }
        }));

    let protected_routes = Router::new()
        .route("/api/users/get-me", get(auth::handlers::me_handler))
        .route("/api/users/update-me", patch(users::handlers::update_me_handler))
        .route(
            "/api/users/update-me-password",
            patch(auth::handlers::change_password_handler),
        )
        .route("/api/users/delete-me", delete(users::handlers::delete_me_handler))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::protect,
        ));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public auth routes
        .route("/api/users/signup", post(auth::handlers::signup_handler))
        .route("/api/users/login", post(auth::handlers::login_handler))
        .route("/api/users/logout", get(auth::handlers::logout_handler))
        .route(
            "/api/users/forgot-password",
            post(auth::handlers::forgot_password_handler),
        )
        .route(
            "/api/users/reset-password",
            patch(auth::handlers::reset_password_handler),
        )
        .merge(protected_routes)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Grocery API - Starting...");

    let config = AppConfig::from_env().expect("DATABASE_URL and JWT_SECRET must be set");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db_pool, &config, Arc::new(LogNotifier));
    let app = create_router(state);

    // Start the Axum server
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Grocery API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
