use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::AppConfig;
use crate::flow::{FlowPatterns, LocalOrigin};

use super::{
    DynCacheLookupService, DynDownloadService, DynRewriteService,
    cache_lookup_services::UnadaCacheLookupService, download_services::UnadaDownloadService,
    rewrite_services::RewriteService,
};

/// everything the interception hop needs per request, wired once at startup.
/// no database, no shared mutable state, just the two collaborators and the
/// decision engine on top of them
#[derive(Clone)]
pub struct InterceptServices {
    pub rewrite: DynRewriteService,
    pub download: DynDownloadService,
    pub cache_lookup: DynCacheLookupService,
    pub http: reqwest::Client,
    pub config: Arc<AppConfig>,
}

impl InterceptServices {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        info!("starting intercept services...");

        // forwarding client, connect timeout only - media bodies stream for
        // minutes and must not be cut by a total deadline
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // collaborator client with a bounded total timeout, that's what keeps
        // a dead trigger or existence-check endpoint from stalling the pipeline
        let collaborator_http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.collaborator_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let download = Arc::new(UnadaDownloadService::new(
            collaborator_http.clone(),
            config.download_endpoint.clone(),
        )) as DynDownloadService;

        let cache_lookup = Arc::new(UnadaCacheLookupService::new(
            collaborator_http,
            config.access_endpoint.clone(),
        )) as DynCacheLookupService;

        let patterns = FlowPatterns::new(&config.stream_host_pattern)?;

        let local_origin = LocalOrigin {
            host: config.local_media_host.clone(),
            port: config.local_media_port,
        };

        let cache_root = match &config.cache_root {
            Some(root) => root.clone(),
            None => {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/root".to_string());
                format!("{}/unada", home)
            }
        };

        info!("cache root resolved to {}", cache_root);

        let rewrite = Arc::new(RewriteService::new(
            patterns,
            download.clone(),
            cache_lookup.clone(),
            local_origin,
            cache_root,
        ));

        Ok(Self {
            rewrite,
            download,
            cache_lookup,
            http,
            config,
        })
    }
}
