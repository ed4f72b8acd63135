mod app;
mod config;
mod state;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::app::StaticDirs;
use crate::state::{AppState, AssetSummary};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dirs = StaticDirs {
        dist: config::dist_dir(),
        assets: config::asset_dir(),
    };
    let asset_file = config::asset_file();
    let asset = inspect_asset(&dirs, &asset_file).await;
    let state = AppState::new(asset);

    let app = app::build_app(state, &dirs);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!(
        dist = %dirs.dist.display(),
        assets = %dirs.assets.display(),
        "Region heatmap demo listening on {addr}"
    );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

/// Reads and validates the region image. A missing or malformed asset is
/// logged and reported as zero regions; the bundle is still served.
async fn inspect_asset(dirs: &StaticDirs, file: &str) -> AssetSummary {
    let path = dirs.assets.join(file);
    let markup = match tokio::fs::read_to_string(&path).await {
        Ok(markup) => markup,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "region image not readable");
            return AssetSummary {
                file: file.to_owned(),
                ..AssetSummary::default()
            };
        }
    };

    match AssetSummary::inspect(file, &markup) {
        Ok(summary) => {
            if summary.regions == 0 {
                tracing::warn!(
                    path = %path.display(),
                    tag = config::ASSET_REGION_TAG,
                    "region image has no elements with an id"
                );
            } else {
                tracing::info!(
                    regions = summary.regions,
                    named = summary.named,
                    "Loaded region image {}",
                    path.display()
                );
            }
            summary
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "region image is invalid");
            AssetSummary {
                file: file.to_owned(),
                ..AssetSummary::default()
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
