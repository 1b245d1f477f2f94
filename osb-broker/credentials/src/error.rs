// Copyright (c) Microsoft. All rights reserved.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read {0}")]
    FileRead(String, #[source] io::Error),
    #[error("{0} does not contain a valid PEM certificate")]
    InvalidCertificate(String, #[source] openssl::error::ErrorStack),
    #[error("{0} does not contain a valid PEM private key")]
    InvalidPrivateKey(String, #[source] openssl::error::ErrorStack),
    #[error("Client certificate does not belong to the client private key")]
    KeyMismatch(),
    #[error("Client certificate is not signed by the CA certificate")]
    UntrustedCertificate(),
    #[error("Openssl Error")]
    OpenSSL(#[source] openssl::error::ErrorStack),
}

impl From<openssl::error::ErrorStack> for Error {
    fn from(err: openssl::error::ErrorStack) -> Self {
        log::error!("{}", err);
        Error::OpenSSL(err)
    }
}
