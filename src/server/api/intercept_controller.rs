// the actual interception hop. This is deliberately thin, all the decision
// logic lives in the rewrite service so it can be tested without a socket
use std::collections::HashMap;

use axum::{
    Extension, Router,
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use tracing::{debug, error};

use crate::flow::{FlowRequest, FlowResponse};
use crate::server::{
    error::{AppResult, Error},
    services::intercept_services::InterceptServices,
};

// connection-scoped headers that must not be forwarded hop to hop
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
    header::TRAILER,
    header::PROXY_AUTHORIZATION,
];

pub struct InterceptController;

impl InterceptController {
    pub fn app() -> Router {
        // every path and method lands here, the hop is transparent
        Router::new().fallback(any(Self::intercept))
    }

    async fn intercept(
        Extension(services): Extension<InterceptServices>,
        request: Request,
    ) -> AppResult<Response> {
        let (parts, body) = request.into_parts();

        let mut flow = Self::build_flow(&parts)?;

        debug!("intercepted request {}", flow.effective_url());

        // request-phase hook, may repoint the flow at the local origin
        services.rewrite.on_request(&mut flow).await;

        let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
            .map_err(|_| Error::BadRequest("unsupported method".to_string()))?;

        let mut upstream_headers = HeaderMap::new();
        for (name, value) in parts.headers.iter() {
            if HOP_BY_HOP.contains(name) || name == header::HOST {
                continue;
            }
            upstream_headers.insert(name.clone(), value.clone());
        }

        let mut builder = services
            .http
            .request(method, &flow.url)
            .headers(upstream_headers)
            .body(reqwest::Body::wrap_stream(body.into_data_stream()));

        // the hook overwrites Host on rewrite, honour whatever it left there
        if let Some(host) = flow.headers.get("Host") {
            builder = builder.header(header::HOST, host.as_str());
        }

        let upstream = builder.send().await.map_err(|e| {
            error!("forwarding {} failed: {}", flow.url, e);
            Error::BadGateway(e.to_string())
        })?;

        // response-headers hook, marks the body for streamed delivery
        let mut flow_response = FlowResponse::default();
        services.rewrite.on_response_headers(&mut flow_response);

        let status = StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        let mut response_headers = HeaderMap::new();
        for (name, value) in upstream.headers().iter() {
            if HOP_BY_HOP.contains(name) {
                continue;
            }
            response_headers.insert(name.clone(), value.clone());
        }

        // stream flag is always set, large media bodies never get buffered here
        let response_body = if flow_response.stream {
            Body::from_stream(upstream.bytes_stream())
        } else {
            Body::from(upstream.bytes().await.map_err(|e| {
                error!("reading upstream body failed: {}", e);
                Error::BadGateway(e.to_string())
            })?)
        };

        Ok((status, response_headers, response_body).into_response())
    }

    /// reconstruct the mutable flow view from the inbound request parts
    pub fn build_flow(parts: &axum::http::request::Parts) -> AppResult<FlowRequest> {
        let host_header = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::BadRequest("missing Host header".to_string()))?;

        let (host, port) = Self::split_host_header(host_header)?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let url = if port == 80 {
            format!("http://{}{}", host, path_and_query)
        } else {
            format!("http://{}:{}{}", host, port, path_and_query)
        };

        let mut headers = HashMap::new();
        for (name, value) in parts.headers.iter() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_string(), v.to_string());
            }
        }

        Ok(FlowRequest {
            scheme: "http".to_string(),
            host,
            port,
            path: path_and_query,
            url,
            headers,
        })
    }

    // ipv6 literals come bracketed ("[::1]" or "[::1]:8080"), everything
    // else splits on the last colon
    fn split_host_header(host_header: &str) -> AppResult<(String, u16)> {
        if host_header.starts_with('[') {
            return match host_header.split_once(']') {
                Some((address, "")) => Ok((format!("{}]", address), 80)),
                Some((address, suffix)) => {
                    let port = suffix
                        .strip_prefix(':')
                        .and_then(|p| p.parse::<u16>().ok())
                        .ok_or_else(|| {
                            Error::BadRequest("invalid Host header port".to_string())
                        })?;
                    Ok((format!("{}]", address), port))
                }
                None => Err(Error::BadRequest("invalid Host header".to_string())),
            };
        }

        match host_header.rsplit_once(':') {
            Some((h, p)) => Ok((
                h.to_string(),
                p.parse::<u16>()
                    .map_err(|_| Error::BadRequest("invalid Host header port".to_string()))?,
            )),
            None => Ok((host_header.to_string(), 80)),
        }
    }
}
