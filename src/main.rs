//! Referral rewards backend server
//!
//! Serves the app catalog, click tracking with UTM attribution, the
//! admin-reviewed reward lifecycle, and payout-destination management.

use axum::http::{HeaderValue, Method};
use axum::{middleware as axum_middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use earnlink_server::apps::AppService;
use earnlink_server::auth::AuthService;
use earnlink_server::clicks::ClickService;
use earnlink_server::config::Config;
use earnlink_server::middleware::{self, IpRateLimiter};
use earnlink_server::profile::ProfileService;
use earnlink_server::rewards::RewardService;
use earnlink_server::state::AppState;
use earnlink_server::submissions::SubmissionService;
use earnlink_server::upi::UpiRateLimiter;
use earnlink_server::{db, routes};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = %config.environment.as_str(), "Starting earnlink server");

    // Database pool and migrations
    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database setup failed: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Migration failed: {}", e);
        std::process::exit(1);
    }

    // Services
    let app_service = Arc::new(AppService::new(db_pool.clone()));
    let click_service = Arc::new(ClickService::new(db_pool.clone()));
    let reward_service = Arc::new(RewardService::new(
        db_pool.clone(),
        config.payout_threshold,
    ));
    let profile_service = Arc::new(ProfileService::new(db_pool.clone()));
    let submission_service = Arc::new(SubmissionService::new(db_pool.clone()));
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        config.jwt_secret.clone(),
    ));

    // Injected, process-local throttle for payout-destination updates
    let upi_rate_limiter = UpiRateLimiter::new(
        config.upi_rate_limit_attempts,
        Duration::from_secs(config.upi_rate_limit_window_seconds),
    );

    let app_state = AppState::new(
        app_service,
        click_service,
        reward_service,
        profile_service,
        submission_service,
        auth_service,
        upi_rate_limiter.clone(),
        config.anon_cookie_ttl_days,
    );

    // General per-IP throttle
    let ip_rate_limiter = IpRateLimiter::new(config.rate_limit_rps);

    // Periodic eviction keeps both limiter maps bounded
    let upi_limiter_cleanup = upi_rate_limiter.clone();
    let ip_limiter_cleanup = ip_rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            upi_limiter_cleanup.cleanup(Duration::from_secs(300)).await;
            ip_limiter_cleanup.cleanup(Duration::from_secs(300)).await;
        }
    });

    let health_db_pool = db_pool.clone();

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_db_pool.clone())))
        .merge(routes::app_routes())
        .merge(routes::click_routes())
        .merge(routes::profile_routes())
        .merge(routes::submission_routes())
        .merge(routes::admin_routes())
        .with_state(app_state)
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(axum_middleware::from_fn(middleware::request_tracing))
        .layer(axum_middleware::from_fn_with_state(
            ip_rate_limiter,
            middleware::rate_limit,
        ))
        .layer(configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

async fn root() -> &'static str {
    "Earnlink API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let db_status = match db::check_health(&pool).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let Some(allowed_origins) = allowed_origins.filter(|s| !s.is_empty()) else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
