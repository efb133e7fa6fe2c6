use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::clients::oidc::OidcClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, Mailer, NotificationService, SeaOrmAuthService, mailer_from_config,
};

pub mod auth;
mod blog;
mod contact;
mod contests;
mod error;
mod faqs;
mod forum;
mod observability;
mod portfolio;
mod professional;
mod system;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub notifications: Arc<NotificationService>,

    /// `None` when no hosted identity provider is configured.
    pub oidc: Option<Arc<OidcClient>>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let mailer = mailer_from_config(&config.email)?;
    create_app_state_with_mailer(config, mailer, prometheus_handle).await
}

/// Builds the state around an explicit mailer, e.g. a recording one in tests.
pub async fn create_app_state_with_mailer(
    config: Config,
    mailer: Arc<dyn Mailer>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let notifications = Arc::new(NotificationService::new(mailer, &config));
    let auth: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        notifications.clone(),
        config.security.clone(),
    ));
    let oidc = OidcClient::from_config(&config.hosted_identity)?.map(Arc::new);

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
        notifications,
        oidc,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(create_authenticated_router(state.clone()))
        .merge(create_admin_router(state.clone()))
        .route_layer(middleware::from_fn(observability::track_requests))
        .fallback(|| async { ApiError::NotFound("Route not found".to_string()) })
        .layer(session_layer)
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/login", get(auth::hosted_login))
        .route("/callback", get(auth::hosted_callback))
        .route("/logout", get(auth::hosted_logout))
        .route("/portfolio/sections", get(portfolio::list_sections))
        .route("/portfolio/sections/{id}", get(portfolio::get_section))
        .route("/blog/posts", get(blog::list_posts))
        .route("/blog/posts/{id}", get(blog::get_post))
        .route("/blog/posts/slug/{slug}", get(blog::get_post_by_slug))
        .route("/blog/posts/{id}/like", post(blog::like_post))
        .route("/blog/posts/{id}/comments", get(blog::list_comments))
        .route("/comments/{id}/like", post(blog::like_comment))
        .route("/forum/posts", get(forum::list_posts))
        .route("/forum/posts/{id}", get(forum::get_post))
        .route("/forum/posts/{id}/replies", get(forum::list_replies))
        .route("/contests", get(contests::list_contests))
        .route("/contests/{id}", get(contests::get_contest))
        .route("/faqs", get(faqs::list_faqs))
        .route("/faqs/{id}", get(faqs::get_faq))
        .route("/contact", post(contact::submit_message))
        .route(
            "/employment-experience",
            get(professional::list_employment),
        )
        .route(
            "/employment-experience/{id}",
            get(professional::employment::get),
        )
        .route("/projects", get(professional::list_projects))
        .route("/projects/{id}", get(professional::project::get))
        .route("/certifications", get(professional::list_certifications))
        .route(
            "/certifications/{id}",
            get(professional::certification::get),
        )
        .route("/skills", get(professional::list_skills))
        .route("/skills/{id}", get(professional::skill::get))
        .route("/achievements", get(professional::list_achievements))
        .route("/achievements/{id}", get(professional::achievement::get))
        .route("/education", get(professional::list_education))
        .route("/education/{id}", get(professional::education_entry::get))
        .route("/social-links", get(professional::list_social_links))
        .route("/social-links/{id}", get(professional::social_link::get))
}

fn create_authenticated_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/user", get(auth::current_user))
        .route("/auth/logout", post(auth::logout))
        .route("/blog/posts/{id}/comments", post(blog::create_comment))
        .route("/forum/posts", post(forum::create_post))
        .route("/forum/posts/{id}/replies", post(forum::create_reply))
        .route("/forum/replies/{id}/accept", patch(forum::accept_reply))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/sections", post(portfolio::create_section))
        .route(
            "/portfolio/sections/{id}",
            put(portfolio::update_section).delete(portfolio::delete_section),
        )
        .route(
            "/portfolio/sections/{id}/toggle-visibility",
            patch(portfolio::toggle_visibility),
        )
        .route("/blog/posts", post(blog::create_post))
        .route(
            "/blog/posts/{id}",
            put(blog::update_post).delete(blog::delete_post),
        )
        .route("/comments/{id}", delete(blog::delete_comment))
        .route("/contests", post(contests::create_contest))
        .route(
            "/contests/{id}",
            put(contests::update_contest).delete(contests::delete_contest),
        )
        .route("/faqs", post(faqs::create_faq))
        .route(
            "/faqs/{id}",
            put(faqs::update_faq).delete(faqs::delete_faq),
        )
        .route("/contact/messages", get(contact::list_messages))
        .route("/contact/messages/{id}/read", patch(contact::mark_read))
        .route(
            "/employment-experience",
            post(professional::employment::create),
        )
        .route(
            "/employment-experience/{id}",
            put(professional::employment::update)
                .delete(professional::employment::delete),
        )
        .route("/projects", post(professional::project::create))
        .route(
            "/projects/{id}",
            put(professional::project::update)
                .delete(professional::project::delete),
        )
        .route("/certifications", post(professional::certification::create))
        .route(
            "/certifications/{id}",
            put(professional::certification::update)
                .delete(professional::certification::delete),
        )
        .route("/skills", post(professional::skill::create))
        .route(
            "/skills/{id}",
            put(professional::skill::update).delete(professional::skill::delete),
        )
        .route("/achievements", post(professional::achievement::create))
        .route(
            "/achievements/{id}",
            put(professional::achievement::update)
                .delete(professional::achievement::delete),
        )
        .route("/education", post(professional::education_entry::create))
        .route(
            "/education/{id}",
            put(professional::education_entry::update)
                .delete(professional::education_entry::delete),
        )
        .route("/social-links", post(professional::social_link::create))
        .route(
            "/social-links/{id}",
            put(professional::social_link::update)
                .delete(professional::social_link::delete),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::admin_middleware))
}
