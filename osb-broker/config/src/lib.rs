// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::default_trait_access,
    clippy::let_unit_value,
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::too_many_lines
)]

use std::{fs, io, path::Path};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Report asynchronous completion to callers that set `accepts_incomplete`.
    #[serde(alias = "async", default)]
    pub async_operations: bool,
    #[serde(alias = "broker-api")]
    pub broker_api: BrokerApi,
    pub credentials: CredentialsConfig,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct BrokerApi {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", content = "args")]
pub enum CredentialsConfig {
    Disk(CredentialsConfigDisk),
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct CredentialsConfigDisk {
    /// Backend endpoint handed out to bound applications.
    pub base_url: String,
    pub ca_path: String,
    pub cert_path: String,
    pub key_path: String,
}

impl Config {
    pub fn load_config(filename: impl AsRef<Path>) -> Result<Config, io::Error> {
        let config = fs::read_to_string(&filename)?;

        let config = toml::from_str(&config)?;

        Ok(config)
    }
}
