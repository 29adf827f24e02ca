use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use reqwest::header;
use tracing::{debug, error};

pub type DynCacheLookupService = Arc<dyn CacheLookupServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait CacheLookupServiceTrait {
    /// whether the given absolute file path is already in the local cache.
    /// anything short of a confirmed yes is a no
    async fn is_cached(&self, file_path: &str) -> bool;
}

/// POSTs the candidate file path to the existence-check collaborator as
/// plain text. Only the literal body `true` counts as cached, every other
/// body, status or transport error means the request passes through
pub struct UnadaCacheLookupService {
    http: reqwest::Client,
    endpoint: String,
}

impl UnadaCacheLookupService {
    pub fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl CacheLookupServiceTrait for UnadaCacheLookupService {
    async fn is_cached(&self, file_path: &str) -> bool {
        let response = match self
            .http
            .post(&self.endpoint)
            .header(header::ACCEPT, "text/plain")
            .header(header::ACCEPT_CHARSET, "utf-8;q=0.7,*;q=0.3")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(file_path.to_string())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("existence check for {} failed: {}", file_path, e);
                return false;
            }
        };

        if !response.status().is_success() {
            error!(
                "existence check for {} answered {}",
                file_path,
                response.status()
            );
            return false;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!("existence check body for {} unreadable: {}", file_path, e);
                return false;
            }
        };

        debug!("existence check for {} answered '{}'", file_path, body);

        // anything other than true/false is treated exactly like false
        body == "true"
    }
}
