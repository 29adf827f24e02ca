use std::sync::Arc;

use tracing::{debug, info};

use crate::flow::{FlowPatterns, FlowRequest, FlowResponse, LocalOrigin, RewriteDecision, UrlMatch};

use super::{DynCacheLookupService, DynDownloadService};

pub type DynRewriteService = Arc<RewriteService>;

/// the decision engine behind both interception hooks. Classifies each
/// request's host+path, fires the shape-specific side effect and decides
/// whether the flow gets repointed at the local media origin.
/// holds no mutable state, every pass is a function of its one flow
pub struct RewriteService {
    patterns: FlowPatterns,
    download: DynDownloadService,
    cache_lookup: DynCacheLookupService,
    local_origin: LocalOrigin,
    cache_root: String,
}

impl RewriteService {
    pub fn new(
        patterns: FlowPatterns,
        download: DynDownloadService,
        cache_lookup: DynCacheLookupService,
        local_origin: LocalOrigin,
        cache_root: String,
    ) -> Self {
        Self {
            patterns,
            download,
            cache_lookup,
            local_origin,
            cache_root,
        }
    }

    /// request-phase hook. Runs once per intercepted request and applies
    /// whatever the plan says to the live flow
    pub async fn on_request(&self, flow: &mut FlowRequest) {
        let decision = self.plan_request(&flow.effective_url()).await;
        decision.apply(flow);
    }

    /// response-headers hook. Every response gets streamed to the client as
    /// it arrives instead of buffered in full, match outcome doesn't matter
    pub fn on_response_headers(&self, response: &mut FlowResponse) {
        response.stream = true;
    }

    /// classify one effective url and work out what to do with the request.
    /// collaborator failures never escape here, when in doubt the answer
    /// is pass-through
    pub async fn plan_request(&self, effective_url: &str) -> RewriteDecision {
        match self.patterns.classify(effective_url) {
            UrlMatch::Page { video_id } => {
                info!("request {} matches vimeo page pattern", effective_url);
                // populate the cache ahead of future streaming requests,
                // the page request itself proceeds untouched
                self.download.trigger_download(&video_id).await;
                RewriteDecision::PassThrough
            }
            UrlMatch::Stream {
                content_path,
                file_name,
            } => {
                info!("request {} matches streaming pattern", effective_url);

                let video_file = format!("{}/{}", content_path, file_name);
                let file_path = format!("{}/{}", self.cache_root, video_file);

                if self.cache_lookup.is_cached(&file_path).await {
                    info!(
                        "file {} exists, serving from local media origin",
                        file_path
                    );
                    RewriteDecision::RedirectTo {
                        scheme: "http".to_string(),
                        host: self.local_origin.host.clone(),
                        port: self.local_origin.port,
                        path: format!("/unada/{}", video_file),
                        url: self.local_origin.media_url(&video_file),
                        host_header: self.local_origin.authority(),
                    }
                } else {
                    debug!("file {} not cached, passing through", file_path);
                    RewriteDecision::PassThrough
                }
            }
            UrlMatch::NoMatch => RewriteDecision::PassThrough,
        }
    }
}
