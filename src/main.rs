use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use unada_edge::{AppConfig, Logger, ProxyApplicationServer};

// main function for the interception hop - no state, only the two collaborators
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // init logger and sentry, guards are kept alive to flush logs and maintain sentry connection
    let _guards = Logger::init(config.cargo_env, config.sentry_dsn.clone());

    // logging is up to you, I like to use info! for general information on what to do
    info!("logger and env prepped, starting interception hop...");

    ProxyApplicationServer::serve(config)
        .await
        .context("interception hop failed to start")?;

    Ok(())
}
