// wire-level checks against a throwaway local listener. Only the literal
// body `true` on a successful response may count as cached
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;

use unada_edge::server::services::cache_lookup_services::{
    CacheLookupServiceTrait, UnadaCacheLookupService,
};

const FILE_PATH: &str = "/home/unada/unada/videos/clip.mp4";

async fn spawn_access_endpoint(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("test listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    format!("http://{}/access", addr)
}

fn service(endpoint: String) -> UnadaCacheLookupService {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client should build");

    UnadaCacheLookupService::new(http, endpoint)
}

#[tokio::test]
async fn test_exact_true_body_counts_as_cached() {
    let endpoint =
        spawn_access_endpoint(Router::new().route("/access", post(|| async { "true" }))).await;

    assert!(service(endpoint).is_cached(FILE_PATH).await);
}

#[tokio::test]
async fn test_false_body_is_not_cached() {
    let endpoint =
        spawn_access_endpoint(Router::new().route("/access", post(|| async { "false" }))).await;

    assert!(!service(endpoint).is_cached(FILE_PATH).await);
}

#[tokio::test]
async fn test_padded_or_cased_true_is_not_cached() {
    for body in ["true\n", " true", "True", ""] {
        let endpoint =
            spawn_access_endpoint(Router::new().route("/access", post(move || async move { body })))
                .await;

        assert!(
            !service(endpoint).is_cached(FILE_PATH).await,
            "body {:?} must not count as cached",
            body
        );
    }
}

#[tokio::test]
async fn test_error_status_is_not_cached_even_with_true_body() {
    let endpoint = spawn_access_endpoint(Router::new().route(
        "/access",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "true") }),
    ))
    .await;

    assert!(!service(endpoint).is_cached(FILE_PATH).await);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_not_cached() {
    // grab a port and release it again so the connect gets refused
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("test listener has an address");
    drop(listener);

    assert!(
        !service(format!("http://{}/access", addr))
            .is_cached(FILE_PATH)
            .await
    );
}
