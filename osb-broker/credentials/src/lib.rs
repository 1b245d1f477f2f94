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

pub mod disk;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "tests"))]
pub mod test_material;

pub use error::Error;

/// Connection material handed to applications bound to an instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub base_url: String,
    pub ca: String,
    pub cert: String,
    pub key: String,
}

#[async_trait::async_trait]
pub trait Issuer: Sync + Send {
    /// Produces the credentials for `instance_id`. Repeated calls for the same
    /// instance must return identical material.
    async fn issue(&self, instance_id: &str) -> Result<Credentials, Error>;
}
