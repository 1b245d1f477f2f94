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

use osb_api::{last_operation::State, Parameters};

pub mod error;
pub mod inmemory;
pub mod matching;

pub use error::Error;

/// A provisioned service instance.
#[derive(Clone, Debug)]
pub struct ServiceInstance {
    pub id: String,
    pub service_id: String,
    pub plan_id: String,
    pub parameters: Parameters,
}

impl ServiceInstance {
    /// Field-by-field comparison used to tell an idempotent re-provision from a conflicting one.
    #[must_use]
    pub fn matches(&self, other: &ServiceInstance) -> bool {
        self.id == other.id
            && self.service_id == other.service_id
            && self.plan_id == other.plan_id
            && matching::parameters_match(&self.parameters, &other.parameters)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    Provision,
    Deprovision,
    Update,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Provision => "provision",
            OperationKind::Deprovision => "deprovision",
            OperationKind::Update => "update",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the most recent state-changing operation on an instance.
#[derive(Clone, Debug, PartialEq)]
pub struct LastOperation {
    pub kind: OperationKind,
    pub state: State,
    pub description: Option<String>,
}

impl LastOperation {
    #[must_use]
    pub fn succeeded(kind: OperationKind) -> Self {
        LastOperation {
            kind,
            state: State::Succeeded,
            description: Some(format!("{} succeeded", kind)),
        }
    }
}

/// Instance store shared by all request handlers.
///
/// Every call is atomic: the instance map and the operation table are only
/// touched while holding the registry's exclusive lock.
#[async_trait::async_trait]
pub trait Registry: Sync + Send {
    /// Stores `instance` if its id is unused. An identical record already stored under
    /// the same id yields `AlreadyExists`, a different one `Error::InstanceConflict`.
    async fn provision(&self, instance: ServiceInstance) -> Result<ProvisionOutcome, Error>;

    /// Removes the instance and its operation record if present. Absent ids are not an
    /// error. With `track_operation` a succeeded `deprovision` is recorded for the id,
    /// whether or not it was known, so a caller can poll for it.
    async fn deprovision(&self, id: &str, track_operation: bool) -> Option<ServiceInstance>;

    async fn get_instance(&self, id: &str) -> Result<ServiceInstance, Error>;

    /// Records a succeeded `kind` operation for the id. Returns false when no instance
    /// is stored under it.
    async fn track_operation(&self, id: &str, kind: OperationKind) -> bool;

    /// Reads the recorded operation. Records of ids without an instance are dropped
    /// once read.
    async fn last_operation(&self, id: &str) -> Result<LastOperation, Error>;
}
