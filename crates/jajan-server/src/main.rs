mod api;
mod middleware;

use std::{sync::Arc, time::Duration};

use jajan_core::{SearchEngine, SearchSettings};
use jajan_db::PgCandidateStore;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = jajan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting jajan-server");

    let pool_config = jajan_db::PoolConfig::from_app_config(&config);
    let pool = jajan_db::connect_pool(&config.database_url, pool_config).await?;
    jajan_db::run_migrations(&pool).await?;

    if let Some(path) = &config.seed_path {
        let seed = jajan_core::load_seed_file(path)?;
        let count = jajan_db::upsert_peddlers(&pool, &seed.peddlers).await?;
        tracing::info!(count, path = %path.display(), "seeded peddlers");
    }

    let engine = SearchEngine::new(
        Arc::new(PgCandidateStore::new(pool)),
        SearchSettings::from_app_config(&config),
    );
    let app = build_app(AppState {
        engine,
        search_timeout: Duration::from_secs(config.search_timeout_secs),
        max_page_size: config.max_page_size,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
