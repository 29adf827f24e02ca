pub mod config;
pub mod flow;
pub mod logger;
pub mod server;

pub use config::*;
pub use flow::*;
pub use logger::*;
pub use server::ProxyApplicationServer;
pub use server::*;
