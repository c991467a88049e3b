//! # MLB Server
//!
//! The mobility load-balancing controller binary: process bootstrap, the
//! `reqwest`-backed TopoSource/OffsetSink adapters, the `axum` management
//! API, and graceful shutdown, wired over `mlb-core`'s closed control loop.

mod http_offset_sink;
mod http_topo_source;
mod management_api;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use mlb_config::{tls, Config};
use mlb_core::{BootParameters, Manager};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use http_offset_sink::HttpOffsetSink;
use http_topo_source::HttpTopoSource;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mlb_server=info,mlb_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(app = mlb_config::constants::APP_ID, "configuration loaded");

    // Fatal on bad TLS paths (§7, "Boot misconfiguration ... terminates the
    // process"): fail fast here rather than discovering a bad cert/key pair
    // only when the first connection attempt hits it.
    let tls_material = tls::load(&config.ca_path, &config.key_path, &config.cert_path)
        .context("loading TLS material")?;
    info!(
        ca_certs = tls_material.ca_certs.len(),
        leaf_certs = tls_material.leaf_certs.len(),
        "TLS material verified"
    );

    let reqwest_client = build_outbound_client(&config).context("building outbound HTTP client")?;

    let topo_source = Arc::new(HttpTopoSource::new(
        reqwest_client.clone(),
        &config.topo_source_endpoint,
    ));
    let offset_sink = Arc::new(HttpOffsetSink::new(
        reqwest_client,
        &config.offset_sink_endpoint,
        config.ric_action_id,
    ));

    let boot = BootParameters {
        interval_secs: config.interval_secs,
        overload_threshold: config.overload_threshold as i64,
        target_threshold: config.target_threshold as i64,
        delta_ocn: config.delta_ocn,
    };
    let manager = Arc::new(Manager::new(boot, topo_source, offset_sink));

    let shutdown = CancellationToken::new();
    let controller_handle = manager.spawn_controller(shutdown.clone());

    let app = management_api::router(manager.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.management_api_port));
    let rustls_config =
        axum_server::tls_rustls::RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
            .await
            .context("building management-API TLS configuration")?;

    info!("management API listening on {addr}");

    tokio::select! {
        result = axum_server::bind_rustls(addr, rustls_config).serve(app.into_make_service()) => {
            if let Err(e) = result {
                error!("management API server exited: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, shutting down");
        }
    }

    shutdown.cancel();
    if let Err(e) = controller_handle.await {
        warn!("controller task did not join cleanly: {e}");
    }

    Ok(())
}

/// Builds the outbound `reqwest` client used to reach TopoSource and
/// OffsetSink, trusting the configured CA as an additional root (§6's
/// "TLS material for outbound connections").
fn build_outbound_client(config: &Config) -> Result<reqwest::Client> {
    let ca_pem = tls::read_ca_pem(&config.ca_path)?;
    let root_cert =
        reqwest::Certificate::from_pem(&ca_pem).context("parsing CA certificate for outbound TLS")?;

    reqwest::Client::builder()
        .add_root_certificate(root_cert)
        .build()
        .context("building reqwest client")
}
