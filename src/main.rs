use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pest_detect::inference::ModelCache;
use pest_detect::middleware::session::session_key;
use pest_detect::router::{PestState, pest_router};
use pest_detect::service::AccountService;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &pest_detect::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        model_path = %cfg.model.path.display(),
        model_url = %cfg.model.download_url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        password_scheme = ?cfg.accounts.password_scheme,
        cookie_secret = cfg.cookie_secret_redacted(),
        loglevel = %cfg.basic.loglevel,
    );

    let storage = pest_detect::db::connect(&cfg.basic.database_url).await?;
    match storage.count().await {
        Ok(n) => info!(accounts = n, "account store ready"),
        Err(e) => warn!(error = %e, "failed to count accounts"),
    }

    let accounts = AccountService::new(storage, cfg.accounts.password_scheme);
    let models = ModelCache::new(cfg.model.clone());
    let key = session_key(cfg.basic.cookie_secret.as_deref())?;

    let state = PestState::new(
        accounts,
        models,
        key,
        cfg.basic.insecure_cookie,
        cfg.basic.max_upload_bytes,
    );
    let app = pest_router(state);

    let addr = cfg.basic.listen_addr.as_str();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
