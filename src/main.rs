use callcast::application::{CallService, TimerEngine};
use callcast::config::Config;
use callcast::interface::api::{build_router, init_metrics, AppState};
use std::future::IntoFuture;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("callcast=info,tower_http=info")),
        )
        .init();

    info!("Starting Callcast call-state broadcaster");

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded: {:?}", config);

    let calls = CallService::new(&config.simulator);

    // Start the simulated inbound call generator
    let simulator_handle = if config.simulator.enable_incoming {
        TimerEngine::spawn_incoming_simulator(
            &calls,
            config.simulator.incoming_interval(),
            config.simulator.incoming_number.clone(),
        )
    } else {
        info!("Incoming call simulator disabled");
        None
    };

    // Initialize metrics exporter
    let prometheus_handle = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus exporter unavailable: {}", e);
            None
        }
    };

    let app = build_router(AppState::new(calls), prometheus_handle);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("HTTP server listening on {}", config.bind_address());

    // Event streams never complete; stop on Ctrl-C without draining.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        _ = shutdown_signal() => info!("Shutting down..."),
    }

    if let Some(handle) = simulator_handle {
        handle.abort();
        info!("Incoming call simulator stopped");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
