use cat_stats::{AppState, Config, load_data, poller::run_chained, reload_data, router};
use tokio::{fs, sync::watch};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&config.data_path).await;
    info!(
        path = %config.data_path.display(),
        cats = data.cats.len(),
        "loaded timeslot data"
    );
    let state = AppState::new(config.data_path.clone(), data);

    let (stop, shutdown) = watch::channel(false);
    let refresher = config.refresh_interval.map(|every| {
        let state = state.clone();
        tokio::spawn(async move {
            run_chained("reload-data", every, shutdown, move || {
                let state = state.clone();
                async move { reload_data(&state).await }
            })
            .await;
        })
    });

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = stop.send(true);
    if let Some(handle) = refresher {
        if let Err(err) = handle.await {
            warn!("refresh loop ended abnormally: {err}");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
