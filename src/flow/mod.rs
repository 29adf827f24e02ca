pub mod classify;
pub mod model;

pub use classify::{FlowPatterns, UrlMatch};
pub use model::{FlowRequest, FlowResponse, LocalOrigin, RewriteDecision};
