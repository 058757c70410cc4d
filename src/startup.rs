use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::handlers::{combine_handler, health_handler, ready_handler, spa_service};
use crate::middleware::{logging_middleware, rate_limit_middleware};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let combine_routes = Router::new()
        .route("/combine", post(combine_handler))
        .route("/api/combine", post(combine_handler))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes()));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .merge(combine_routes);

    if state.config.serve_files {
        router = router.fallback_service(spa_service(&state.config.static_dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(from_fn(logging_middleware)),
        )
        .with_state(state)
}

/// A converter-verified server with its listener already bound.
pub struct Application {
    listener: TcpListener,
    router: Router,
    port: u16,
}

impl Application {
    /// Probes the converter, then binds. A failing probe aborts before any
    /// port is opened.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let state = AppState::new(config).context("Failed to create application state")?;

        info!(converter_url = %state.converter.base_url(), "Checking converter health");
        state
            .converter
            .health_check()
            .await
            .context("Converter health check failed")?;

        let addr = state.config.listen_addr();
        let router = build_router(state);

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to address {}", addr))?;
        let port = listener.local_addr()?.port();

        info!("Server is listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            router,
            port,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
