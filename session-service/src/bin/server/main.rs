use std::sync::Arc;
use std::time::Duration;

use auth::AuthGuard;
use auth::TokenCodec;
use auth::TokenKeys;
use session_service::config::Config;
use session_service::domain::session::ports::SessionServicePort;
use session_service::domain::session::ports::SystemClock;
use session_service::domain::session::service::SessionService;
use session_service::inbound::http::router::create_router;
use session_service::outbound::metrics::TracingAuthMetrics;
use session_service::outbound::repositories::PostgresRefreshTokenRepository;
use session_service::outbound::repositories::PostgresSubjectDirectory;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "session-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        sweep_interval_secs = config.sweeper.interval_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let codec = Arc::new(TokenCodec::new(&TokenKeys {
        access_secret: config.tokens.access_secret.clone(),
        refresh_secret: config.tokens.refresh_secret.clone(),
    }));
    let guard = Arc::new(AuthGuard::new(Arc::clone(&codec)));

    let refresh_tokens = Arc::new(PostgresRefreshTokenRepository::new(pg_pool.clone()));
    let subjects = Arc::new(PostgresSubjectDirectory::new(pg_pool));
    let metrics = Arc::new(TracingAuthMetrics::new());

    let session_service: Arc<dyn SessionServicePort> = Arc::new(SessionService::new(
        refresh_tokens,
        subjects,
        metrics,
        SystemClock,
        codec,
    ));

    // Expiry sweep runs independently of request traffic; no coordination
    // is needed, racing deletes just surface as "not found" downstream.
    let sweeper = Arc::clone(&session_service);
    let sweep_interval = Duration::from_secs(config.sweeper.interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            if let Err(e) = sweeper.sweep_expired().await {
                tracing::error!(error = %e, "Expiry sweep failed");
            }
        }
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(session_service, guard);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
