// Copyright (c) Microsoft. All rights reserved.

use std::io;

use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("InstanceID in use")]
    Conflict(String),
    #[error("Instance {0} does not exist")]
    InstanceNotFound(String),
    #[error("No operation recorded for instance {0}")]
    OperationNotFound(String),
    #[error("Could not issue credentials for instance {0}")]
    IssueCredentials(String, #[source] credential_issuer::Error),
    #[error("Could not resolve bind address {0}")]
    ResolveAddress(String, #[source] io::Error),
    #[error("Bind address {0} did not resolve to any socket address")]
    NoAddress(String),
    #[error("Could not bind broker API")]
    Bind(#[source] hyper::Error),
    #[error("Broker API stopped with an error")]
    Serve(#[source] hyper::Error),
    #[error("Broker API task failed")]
    Join(#[source] tokio::task::JoinError),
}

impl Error {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InstanceNotFound(_) | Error::OperationNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<instance_registry::Error> for Error {
    fn from(err: instance_registry::Error) -> Self {
        match err {
            instance_registry::Error::InstanceConflict(id) => Error::Conflict(id),
            instance_registry::Error::InstanceNotFound(id) => Error::InstanceNotFound(id),
            instance_registry::Error::OperationNotFound(id) => Error::OperationNotFound(id),
        }
    }
}
