//! Integration service entry point.

use std::sync::Arc;

use adapters::StatusListener;
use api::config::Config;
use api::routes::orders::AppState;
use api::spawner::TokioSagaSpawner;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = Config::from_env();

    // 2. Initialize tracing: stdout plus an append-only log file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .expect("failed to open log file");

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .init();

    tracing::info!(
        addr = %config.addr(),
        inventory = %config.backends.inventory_url,
        payment = %config.backends.payment_url,
        rabbitmq = %config.backends.rabbitmq_host,
        "integration service starting"
    );

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Start the warehouse status listener as a daemon task
    tokio::spawn(StatusListener::new(config.backends.amqp_uri()).run());

    // 5. Build application state and router
    let state = Arc::new(AppState {
        spawner: TokioSagaSpawner::new(config.backends.clone()),
    });
    let app = api::create_app(state, metrics_handle);

    // 6. Serve until shutdown; in-flight sagas are abandoned on exit
    let addr = config.addr();
    tracing::info!(%addr, "intake API listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
