mod api;
mod cache;
mod middleware;
mod sessions;

use std::{sync::Arc, time::Duration};

use lunchmap_core::AppConfig;
use lunchmap_db::PgRestaurantStore;
use lunchmap_places::KakaoPlaceClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::TableCache,
    sessions::SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(lunchmap_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let store = connect_store(&config).await?;
    let places = build_place_client(&config)?;

    let app = build_app(AppState {
        store,
        places,
        sessions: SessionStore::new(Duration::from_secs(config.session_idle_secs)),
        cache: TableCache::new(Duration::from_secs(config.table_cache_ttl_secs)),
        config: Arc::clone(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "lunchmap server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Connects, migrates and seeds the restaurant table.
///
/// Without `DATABASE_URL` the server still starts and serves an empty table.
/// A configured but unreachable database is a startup error.
async fn connect_store(config: &AppConfig) -> anyhow::Result<PgRestaurantStore> {
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; restaurant table will be empty and read-only");
        return Ok(PgRestaurantStore::unconfigured());
    }

    let pool = lunchmap_db::connect_pool_from_config(config).await?;
    let applied = lunchmap_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations complete");

    if let Some(path) = &config.seed_path {
        let seed = lunchmap_core::load_seed_file(path)?;
        let inserted = lunchmap_db::seed_restaurants_if_empty(&pool, &seed.restaurants).await?;
        tracing::info!(inserted, path = %path.display(), "seed file applied");
    }

    Ok(PgRestaurantStore::new(pool))
}

fn build_place_client(config: &AppConfig) -> anyhow::Result<Option<Arc<KakaoPlaceClient>>> {
    let Some(key) = config.kakao_rest_api_key.as_deref() else {
        tracing::warn!("KAKAO_REST_API_KEY not set; place search disabled");
        return Ok(None);
    };
    let client = KakaoPlaceClient::new(key, config.reference, config.search_radius_m)?;
    Ok(Some(Arc::new(client)))
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
