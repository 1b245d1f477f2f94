// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::default_trait_access,
    clippy::let_and_return,
    clippy::let_unit_value,
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::too_many_lines
)]

use std::{error::Error as StdError, path::PathBuf, sync::Arc};

use broker_api::Api;
use broker_config::{Config, CredentialsConfig};
use clap::Parser;
use error::Error;

mod error;

/// Open Service Broker endpoint
#[derive(Parser)]
#[command(name = "brokerd")]
#[command(version, about, long_about = None)]
struct Options {
    /// Configuration file path
    #[arg(short, long, default_value = "Config.toml")]
    config: PathBuf,

    /// Report asynchronous completion to callers that accept it, regardless of the config
    #[arg(long = "async")]
    async_operations: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();

    log::info!("Starting OSB broker");
    if let Err(err) = main_inner(options).await {
        log::error!("{}", err);

        let mut source = std::error::Error::source(&*err);
        while let Some(err) = source {
            log::error!("caused by: {}", err);
            source = std::error::Error::source(err);
        }

        std::process::exit(1);
    }
}

async fn main_inner(options: Options) -> Result<(), Box<dyn StdError>> {
    let mut config = Config::load_config(&options.config).map_err(Error::ErrorParsingConfig)?;
    config.async_operations |= options.async_operations;

    let issuer = match &config.credentials {
        CredentialsConfig::Disk(disk) => credential_issuer::disk::Issuer::load(disk)
            .await
            .map_err(Error::LoadCredentials)?,
    };
    let registry = instance_registry::inmemory::Registry::new();

    let api = Api::new(Arc::new(registry), Arc::new(issuer), config.async_operations);

    let server = broker_api::start_broker_api(&config, api)
        .await
        .map_err(Error::BrokerApi)?;
    log::info!(
        "Listening on {} (async operations: {})",
        server.local_addr(),
        config.async_operations
    );

    tokio::signal::ctrl_c().await.map_err(Error::WaitForSignal)?;
    log::info!("Shutting down");

    server.shutdown().await.map_err(Error::BrokerApi)?;

    Ok(())
}
