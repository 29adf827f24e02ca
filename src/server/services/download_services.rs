use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};

pub type DynDownloadService = Arc<dyn DownloadServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait DownloadServiceTrait {
    /// ask the cache box to start downloading a video by its numeric id.
    /// fire-and-forget, the caller never learns whether it worked
    async fn trigger_download(&self, video_id: &str);
}

/// fires GET {endpoint}{video_id} against the download-trigger collaborator.
/// the response body is thrown away and failures are logged and swallowed,
/// a dead trigger service must never fail the user's original request
pub struct UnadaDownloadService {
    http: reqwest::Client,
    endpoint: String,
}

impl UnadaDownloadService {
    pub fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl DownloadServiceTrait for UnadaDownloadService {
    async fn trigger_download(&self, video_id: &str) {
        let url = format!("{}{}", self.endpoint, video_id);

        match self.http.get(&url).send().await {
            Ok(response) => {
                debug!(
                    "download trigger for video {} answered {}",
                    video_id,
                    response.status()
                );
            }
            Err(e) => {
                // the request still proceeds to its original destination
                warn!("download trigger for video {} failed: {}", video_id, e);
            }
        }
    }
}
