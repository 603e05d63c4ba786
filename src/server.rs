//! Server lifecycle: dependency bootstrap, listener, graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;
use tracing::info;

use crate::api::state::{AppState, CookieConfig};
use crate::api::router::create_router;
use crate::config::{AppConfig, DatabaseConfig, RedisConfig};
use crate::infrastructure::cache::{RedisCache, RedisCacheConfig};
use crate::infrastructure::session::{RedisSessionConfig, RedisSessionStore};
use crate::infrastructure::user::{PostgresUserRepository, UserService};

/// Run the server until a shutdown signal arrives
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    // Both backends are required; connect concurrently and fail fast
    // before the listener binds.
    let (pool, redis) = tokio::try_join!(
        connect_postgres(&config.database),
        connect_redis(&config.redis)
    )?;

    let state = build_state(&config, pool.clone(), redis);
    let app = create_router(state, &config.server);

    let addr = build_socket_addr(&config)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    let drain_started = Arc::new(Notify::new());
    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let server = {
        let drain_started = drain_started.clone();

        axum::serve(listener, app).with_graceful_shutdown(async move {
            shutdown_signal().await;
            drain_started.notify_one();
        })
    };

    let graceful = async {
        server.await.context("Server error")?;
        info!("In-flight requests drained");

        pool.close().await;
        info!("PostgreSQL pool closed");

        // ConnectionManager has no explicit close; dropping the last
        // clone tears the connection down.
        info!("Redis connection released");

        anyhow::Ok(())
    };

    let hard_deadline = async {
        drain_started.notified().await;
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = graceful => {
            result?;
            info!("Shutdown complete");
            Ok(())
        }
        _ = hard_deadline => {
            anyhow::bail!("Shutdown did not finish within {}s", timeout.as_secs())
        }
    }
}

fn build_state(config: &AppConfig, pool: PgPool, redis: ConnectionManager) -> AppState {
    let repository = Arc::new(PostgresUserRepository::new(pool));

    let cache = Arc::new(RedisCache::new(
        redis.clone(),
        RedisCacheConfig::default().with_key_prefix(config.cache.key_prefix.clone()),
    ));

    let users = Arc::new(UserService::new(
        repository,
        cache,
        Duration::from_secs(config.cache.ttl_secs),
    ));

    let sessions = Arc::new(RedisSessionStore::new(
        redis,
        RedisSessionConfig {
            key_prefix: config.session.key_prefix.clone(),
            ttl: Duration::from_secs(config.session.ttl_secs),
        },
    ));

    let cookies = CookieConfig {
        name: config.session.cookie_name.clone(),
        secure: config.server.secure_cookies,
        ttl: Duration::from_secs(config.session.ttl_secs),
    };

    AppState::new(users, sessions, cookies)
}

async fn connect_postgres(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("PostgreSQL ping failed")?;

    info!("Connected to PostgreSQL");

    Ok(pool)
}

async fn connect_redis(config: &RedisConfig) -> anyhow::Result<ConnectionManager> {
    let client = redis::Client::open(config.url.as_str()).context("Invalid Redis URL")?;

    let mut manager = ConnectionManager::new(client)
        .await
        .context("Failed to connect to Redis")?;

    let _: String = redis::cmd("PING")
        .query_async(&mut manager)
        .await
        .context("Redis ping failed")?;

    info!("Connected to Redis");

    Ok(manager)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid host '{}'", config.server.host))?,
        config.server.port,
    )))
}
