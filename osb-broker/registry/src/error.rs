// Copyright (c) Microsoft. All rights reserved.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Instance {0} already exists with a different configuration")]
    InstanceConflict(String),
    #[error("Instance {0} does not exist")]
    InstanceNotFound(String),
    #[error("No operation recorded for instance {0}")]
    OperationNotFound(String),
}
