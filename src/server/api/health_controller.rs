use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use std::time::Instant;
use tracing::error;

use crate::server::dtos::health_dto::{
    EndpointHealth, HealthResponse, HealthStatus, ServiceHealthDetails,
};
use crate::server::services::intercept_services::InterceptServices;
use crate::server::{get_app_version, get_uptime_seconds};

/// health endpoint - probes the existence-check collaborator since that's
/// the only external piece the rewrite path depends on
pub async fn health_endpoint(
    Extension(services): Extension<InterceptServices>,
) -> (StatusCode, Json<HealthResponse>) {
    let access_health = check_access_endpoint(&services).await;

    // a dead collaborator only costs the local-cache optimization, requests
    // still pass through, so it's degraded rather than unhealthy
    let overall_status = if access_health.status == HealthStatus::Unhealthy {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: format!("{:?}", services.config.cargo_env).to_lowercase(),
        services: ServiceHealthDetails {
            access_endpoint: access_health,
        },
    };

    (StatusCode::OK, Json(response))
}

async fn check_access_endpoint(services: &InterceptServices) -> EndpointHealth {
    let start = Instant::now();

    match services
        .http
        .head(&services.config.access_endpoint)
        .send()
        .await
    {
        Ok(_) => EndpointHealth {
            status: HealthStatus::Healthy,
            response_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
        Err(e) => {
            error!("access endpoint health check failed: {}", e);
            EndpointHealth {
                status: HealthStatus::Unhealthy,
                response_time_ms: 0.0,
            }
        }
    }
}
