use axum::http::{HeaderName, Request, Response};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use arreglio_admin::{
    config::AppConfig,
    db::connect_and_migrate,
    routes::create_app,
    services::auth_service::ensure_admin_account,
    state::AppState,
    storage::Storage,
};

const REQUEST_ID: &str = "x-request-id";
const MAX_CONCURRENT_REQUESTS: usize = 100;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,arreglio_admin=debug,activity=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local map.
async fn open_storage(config: &AppConfig) -> anyhow::Result<Storage> {
    match config.database_url.as_deref() {
        Some(url) => Ok(Storage::postgres(connect_and_migrate(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL is not set, data lives in memory until shutdown");
            Ok(Storage::in_memory())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<IpAddr>()?, config.port));
    let body_limit = config.body_limit_bytes;

    let storage = open_storage(&config).await?;
    tracing::info!(backend = storage.backend_name(), "storage ready");
    let state = AppState::load(config, storage).await?;
    ensure_admin_account(&state).await?;

    let request_id_header = HeaderName::from_static(REQUEST_ID);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            if response.status().is_server_error() {
                tracing::warn!(status = %response.status(), ms = %latency.as_millis(), "request failed");
            } else {
                tracing::info!(status = %response.status(), ms = %latency.as_millis(), "request finished");
            }
        });

    let app = create_app(state)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS));

    tracing::info!(%addr, docs = %format!("http://{addr}/docs"), "dashboard api listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
