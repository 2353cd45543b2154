use super::{
    BrokerState, ProxyState, StaticAssets, apply_cors, control_zone_light, forward_wled_state,
    health, publish_wled_command,
};
use crate::config::{BridgeConfig, DispatchMode};
use crate::domain::broker::CommandPublisher;
use crate::domain::proxy::DeviceForwarder;
use crate::infrastructure::broker::MqttBrokerConnection;
use crate::infrastructure::http::WledHttpForwarder;
use anyhow::Context;
use axum::{
    Router,
    http::Method,
    middleware,
    routing::any,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The dispatch strategy chosen at startup.
pub enum Dispatcher {
    Broker(Arc<dyn CommandPublisher>),
    Proxy(Arc<dyn DeviceForwarder>),
}

impl Dispatcher {
    /// Build the dispatcher for the configured mode. In MQTT mode this opens the
    /// single broker connection for the lifetime of the process.
    pub fn from_config(config: &BridgeConfig) -> anyhow::Result<Self> {
        match config.mode {
            DispatchMode::Mqtt => {
                let settings = config
                    .broker_settings()
                    .context("Invalid MQTT broker configuration")?;
                Ok(Self::Broker(Arc::new(MqttBrokerConnection::connect(
                    &settings,
                ))))
            }
            DispatchMode::Proxy => {
                let forwarder =
                    WledHttpForwarder::new().context("Failed to build the HTTP client")?;
                Ok(Self::Proxy(Arc::new(forwarder)))
            }
        }
    }
}

pub async fn create_server(config: &BridgeConfig) -> anyhow::Result<()> {
    info!("Starting WLED bridge...");

    let addr = config.socket_addr()?;
    let dispatcher = Dispatcher::from_config(config)?;
    let assets = StaticAssets::new(config.index_path());
    info!(
        mode = ?config.mode,
        control_panel = %assets.index_path().display(),
        "Dispatch mode selected"
    );

    let app = build_router(dispatcher, assets);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("🚀 WLED bridge started successfully!");
    println!("   URL: http://{addr}");
    if config.mode == DispatchMode::Mqtt {
        println!("   MQTT broker: {}", config.broker_url);
    }
    println!("   Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}

/// Assemble the HTTP surface for the active dispatch mode.
///
/// API routes accept every method. Only the static fallback answers 405.
pub fn build_router(dispatcher: Dispatcher, assets: StaticAssets) -> Router {
    let api = match dispatcher {
        Dispatcher::Broker(publisher) => broker_routes(publisher),
        Dispatcher::Proxy(forwarder) => proxy_routes(forwarder),
    };
    let assets = Arc::new(assets);

    api
        // Everything that is not an API route goes to the control panel
        .fallback(move |method: Method| {
            let assets = assets.clone();
            async move { assets.serve(&method).await }
        })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(apply_cors)),
        )
}

fn broker_routes(publisher: Arc<dyn CommandPublisher>) -> Router {
    Router::new()
        .route("/api/wled", any(publish_wled_command))
        .route("/api/zones/{zone_id}/light", any(control_zone_light))
        .route("/health", any(health))
        .with_state(Arc::new(BrokerState::new(publisher)))
}

fn proxy_routes(forwarder: Arc<dyn DeviceForwarder>) -> Router {
    Router::new()
        .route("/api/wled", any(forward_wled_state))
        .with_state(Arc::new(ProxyState::new(forwarder)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
