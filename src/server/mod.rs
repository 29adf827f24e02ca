pub mod api;
pub mod dtos;
pub mod error;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{Extension, Router, routing::get};
use once_cell::sync::Lazy;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::server::api::{
    health_controller::health_endpoint, intercept_controller::InterceptController,
};
use crate::server::services::intercept_services::InterceptServices;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub struct ProxyApplicationServer;

impl ProxyApplicationServer {
    /// the transparent hop. Every path and method falls through to the
    /// interception handler, including /health
    pub fn intercept_app(services: InterceptServices) -> Router {
        InterceptController::app()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(services))
    }

    /// health sits on its own listener so it never shadows an upstream path
    /// passing through the hop
    pub fn admin_app(services: InterceptServices) -> Router {
        Router::new()
            .route("/health", get(health_endpoint))
            .layer(Extension(services))
    }

    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        // touch the start time before the first request can
        Lazy::force(&START_TIME);

        let services = InterceptServices::new(config.clone())
            .context("failed to wire intercept services")?;

        let intercept_listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
            .await
            .context("failed to bind interception port")?;
        let admin_listener = tokio::net::TcpListener::bind(("0.0.0.0", config.admin_port))
            .await
            .context("failed to bind admin port")?;

        info!(
            "interception hop listening on port {}, admin on port {}",
            config.port, config.admin_port
        );

        let intercept = axum::serve(intercept_listener, Self::intercept_app(services.clone()));
        let admin = axum::serve(admin_listener, Self::admin_app(services));

        tokio::try_join!(
            async move { intercept.await.context("interception server exited") },
            async move { admin.await.context("admin server exited") },
        )?;

        Ok(())
    }
}
