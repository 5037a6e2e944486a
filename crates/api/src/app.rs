use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use persistence::repositories::{AccountRepository, ActivityLogRepository};
use shared::jwt::JwtKeys;

use crate::config::Config;
use crate::routes::{
    activity, admin, auth, backup, candidates, governorates, health, messaging, news, reports,
    site, voting,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtKeys,
    pub accounts: AccountRepository,
    pub activity: ActivityLogRepository,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let jwt = JwtKeys::new(&config.auth.jwt_secret, config.auth.token_expiry_secs);
    let config = Arc::new(config);

    let state = AppState {
        accounts: AccountRepository::new(pool.clone()),
        activity: ActivityLogRepository::new(pool.clone()),
        pool,
        config: config.clone(),
        jwt,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public pages and JSON feeds
    let public_routes = Router::new()
        .route("/api/health", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/api/home", get(site::home))
        .route("/api/contact", post(site::contact))
        .route("/robots.txt", get(site::robots_txt))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/quick-login", post(auth::quick_login))
        .route("/api/governorates", get(governorates::list))
        .route("/api/governorates/search", get(governorates::search))
        .route("/api/governorates/:slug", get(governorates::detail))
        .route("/api/candidates", get(candidates::list))
        .route("/api/candidates/search", get(candidates::search))
        .route("/api/candidates/:id", get(candidates::detail))
        .route("/api/candidates/:id/messages", post(messaging::send))
        .route("/api/news", get(news::list))
        .route("/api/news/ticker", get(news::ticker))
        .route("/api/news/:id", get(news::detail))
        .route("/api/notifications", get(messaging::notifications));

    // Authenticated citizen surface
    let user_routes = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/candidates/:id/vote", post(voting::vote))
        .route("/api/candidates/:id/rate", post(voting::rate))
        .route("/api/messages/sent", get(messaging::sent))
        .route("/api/messages/:id", get(messaging::thread))
        .route("/api/messages/:id/reply", post(messaging::reply));

    // Candidate dashboard
    let candidate_routes = Router::new()
        .route("/api/candidate/dashboard", get(candidates::dashboard))
        .route("/api/candidate/profile", put(candidates::update_profile))
        .route(
            "/api/candidate/promises",
            get(candidates::list_promises).post(candidates::create_promise),
        )
        .route(
            "/api/candidate/promises/:id",
            put(candidates::update_promise).delete(candidates::delete_promise),
        )
        .route(
            "/api/candidate/service-history",
            post(candidates::create_service_history),
        )
        .route(
            "/api/candidate/service-history/:id",
            delete(candidates::delete_service_history),
        )
        .route("/api/candidate/messages", get(messaging::inbox))
        .route("/api/candidate/ratings", get(voting::ratings_votes))
        .route(
            "/api/candidate/ratings/:id/reply",
            post(voting::reply_to_rating),
        );

    // Administration
    let admin_routes = Router::new()
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/candidates",
            get(admin::list_candidates).post(admin::create_candidate),
        )
        .route("/api/admin/candidates/:id", delete(admin::delete_candidate))
        .route(
            "/api/admin/news",
            get(admin::list_news).post(admin::create_news),
        )
        .route(
            "/api/admin/news/:id",
            put(admin::update_news).delete(admin::delete_news),
        )
        .route("/api/admin/news/:id/toggle", post(admin::toggle_news_status))
        .route("/api/admin/activities", get(activity::list))
        .route("/api/admin/activities/stats", get(activity::stats))
        .route("/api/admin/activities/security", get(activity::security_alerts))
        .route("/api/admin/activities/critical", get(activity::critical))
        .route("/api/admin/activities/:id", get(activity::detail))
        .route("/api/admin/users/:id/activities", get(activity::user_history))
        .route("/api/admin/reports/dashboard", get(reports::dashboard))
        .route(
            "/api/admin/reports/candidates",
            get(reports::candidate_performance),
        )
        .route("/api/admin/reports/engagement", get(reports::user_engagement))
        .route("/api/admin/reports/charts", get(reports::chart_data))
        .route(
            "/api/admin/reports/export/:report_type",
            get(reports::export_csv),
        )
        .route("/api/admin/backup", get(backup::backup))
        .route("/api/admin/backup/restore", post(backup::restore));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(candidate_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
