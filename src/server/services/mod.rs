pub mod cache_lookup_services;
pub mod download_services;
pub mod intercept_services;
pub mod rewrite_services;

pub use cache_lookup_services::DynCacheLookupService;
pub use download_services::DynDownloadService;
pub use rewrite_services::DynRewriteService;
