use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::any;
use tower::ServiceExt;

use unada_edge::config::AppConfig;
use unada_edge::server::ProxyApplicationServer;
use unada_edge::server::api::intercept_controller::InterceptController;
use unada_edge::server::services::intercept_services::InterceptServices;

fn parts(host: &str, path: &str) -> axum::http::request::Parts {
    let (parts, _) = Request::builder()
        .uri(path)
        .header("Host", host)
        .body(())
        .expect("request should build")
        .into_parts();
    parts
}

#[test]
fn test_flow_defaults_to_port_80_without_a_host_port() {
    let flow = InterceptController::build_flow(&parts("cdn.example.net", "/videos/clip.mp4"))
        .expect("flow should build");

    assert_eq!(flow.host, "cdn.example.net");
    assert_eq!(flow.port, 80);
    assert_eq!(flow.url, "http://cdn.example.net/videos/clip.mp4");
}

#[test]
fn test_flow_keeps_an_explicit_host_port() {
    let flow = InterceptController::build_flow(&parts("cdn.example.net:8080", "/videos/clip.mp4"))
        .expect("flow should build");

    assert_eq!(flow.host, "cdn.example.net");
    assert_eq!(flow.port, 8080);
    assert_eq!(flow.url, "http://cdn.example.net:8080/videos/clip.mp4");
}

#[test]
fn test_flow_accepts_a_bracketed_ipv6_host() {
    let flow =
        InterceptController::build_flow(&parts("[::1]", "/index.html")).expect("flow should build");

    assert_eq!(flow.host, "[::1]");
    assert_eq!(flow.port, 80);
    assert_eq!(flow.url, "http://[::1]/index.html");
}

#[test]
fn test_flow_accepts_a_bracketed_ipv6_host_with_port() {
    let flow = InterceptController::build_flow(&parts("[::1]:8088", "/index.html"))
        .expect("flow should build");

    assert_eq!(flow.host, "[::1]");
    assert_eq!(flow.port, 8088);
    assert_eq!(flow.url, "http://[::1]:8088/index.html");
}

#[test]
fn test_flow_rejects_a_bracketed_ipv6_host_with_garbage_port() {
    assert!(InterceptController::build_flow(&parts("[::1]:abc", "/index.html")).is_err());
}

#[tokio::test]
async fn test_health_path_passes_through_the_hop() {
    // an upstream that owns /health, the hop must not answer in its place
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("test listener has an address");
    let upstream = Router::new().fallback(any(|| async { "upstream health" }));
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.expect("test server");
    });

    let services =
        InterceptServices::new(Arc::new(AppConfig::default())).expect("services should wire");
    let app = ProxyApplicationServer::intercept_app(services);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Host", format!("127.0.0.1:{}", addr.port()))
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("hop should answer");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("body should collect");
    assert_eq!(&body[..], b"upstream health");
}

#[tokio::test]
async fn test_admin_health_is_answered_locally() {
    // collaborator down, health must still answer on its own listener
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("test listener has an address");
    drop(listener);

    let mut config = AppConfig::default();
    config.access_endpoint = format!("http://{}/unada/rest/access", addr);

    let services = InterceptServices::new(Arc::new(config)).expect("services should wire");
    let app = ProxyApplicationServer::admin_app(services);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("admin should answer");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body should collect");
    let health: serde_json::Value = serde_json::from_slice(&body).expect("body should be json");
    assert_eq!(health["status"], "degraded");
}
