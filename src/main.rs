//! Live Classroom server binary.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use live_classroom::adapters::auth::JwtSessionValidator;
use live_classroom::adapters::events::TracingEventPublisher;
use live_classroom::adapters::http::{build_router, ApiHandlers, ClassroomPorts, HttpSettings};
use live_classroom::adapters::memory::SystemClock;
use live_classroom::adapters::postgres::{
    PostgresActivityLog, PostgresBreakoutRepository, PostgresDirectory, PostgresPollRepository,
    PostgresRegistrationRepository, PostgresSessionRepository,
};
use live_classroom::adapters::scheduler::ReconciliationWorker;
use live_classroom::adapters::security::Argon2PasswordHasher;
use live_classroom::config::{AppConfig, ServerConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if server.json_logs() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn postgres_ports(pool: PgPool, config: &AppConfig) -> Result<ClassroomPorts, BoxError> {
    let directory = Arc::new(PostgresDirectory::new(pool.clone()));
    Ok(ClassroomPorts {
        sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
        registrations: Arc::new(PostgresRegistrationRepository::new(pool.clone())),
        activity_log: Arc::new(PostgresActivityLog::new(pool.clone())),
        breakouts: Arc::new(PostgresBreakoutRepository::new(pool.clone())),
        polls: Arc::new(PostgresPollRepository::new(pool)),
        courses: directory.clone(),
        users: directory,
        hasher: Arc::new(Argon2PasswordHasher::new(config.security.argon2_cost())?),
        publisher: Arc::new(TracingEventPublisher::new()),
        clock: Arc::new(SystemClock),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let ports = postgres_ports(pool, &config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker = if config.reconciliation.enabled {
        let worker = ReconciliationWorker::new(Arc::new(
            ports.reconciler(config.reconciliation.max_active_hours),
        ))
        .with_interval(config.reconciliation.interval());
        Some(tokio::spawn(async move { worker.run(shutdown_rx).await }))
    } else {
        tracing::info!("reconciliation worker disabled");
        None
    };

    let settings = HttpSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let validator = Arc::new(JwtSessionValidator::new(config.auth.jwt()));
    let app = build_router(ApiHandlers::new(&ports), validator, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "live classroom listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(worker) = worker {
        if let Err(err) = worker.await {
            tracing::warn!(error = %err, "reconciliation worker ended abnormally");
        }
    }
    tracing::info!("server stopped");
    Ok(())
}
