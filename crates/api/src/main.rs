use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wishdrop_api::background::{badge_watcher, expiry_sweep};
use wishdrop_api::config::ServerConfig;
use wishdrop_api::notifications::NotificationInbox;
use wishdrop_api::router::build_app_router;
use wishdrop_api::state::AppState;
use wishdrop_events::EventBus;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = wishdrop_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    wishdrop_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    wishdrop_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    // Event bus with its consumers and producers.
    let event_bus = Arc::new(EventBus::default());
    let inbox = Arc::new(NotificationInbox::new());
    let inbox_handle = tokio::spawn(Arc::clone(&inbox).run(event_bus.subscribe()));

    let jobs_cancel = CancellationToken::new();
    let badge_watcher_handle = tokio::spawn(badge_watcher::run(
        pool.clone(),
        Arc::clone(&event_bus),
        Duration::from_secs(config.badge_poll_interval_secs),
        config.badge_recent_window_secs,
        jobs_cancel.clone(),
    ));
    let expiry_sweep_handle = tokio::spawn(expiry_sweep::run(
        pool.clone(),
        Arc::clone(&event_bus),
        Duration::from_secs(config.expiry_sweep_interval_secs),
        jobs_cancel.clone(),
    ));
    tracing::info!("Notification inbox, badge watcher and expiry sweep started");

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    let app = build_app_router(AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::clone(&event_bus),
        inbox,
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server drained, stopping background work");

    jobs_cancel.cancel();
    let _ = tokio::time::timeout(grace, badge_watcher_handle).await;
    let _ = tokio::time::timeout(grace, expiry_sweep_handle).await;

    // The inbox exits once the last sender is gone.
    drop(event_bus);
    let _ = tokio::time::timeout(grace, inbox_handle).await;

    tracing::info!("Shutdown complete");
}

/// Compact human-readable logs by default; `LOG_FORMAT=json` for shippers.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wishdrop_api=debug,wishdrop_events=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
