// Copyright (c) Microsoft. All rights reserved.

#[derive(Debug)]
pub enum Error {
    ErrorParsingConfig(std::io::Error),
    LoadCredentials(credential_issuer::Error),
    BrokerApi(broker_api::Error),
    WaitForSignal(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ErrorParsingConfig(_) => f.write_str("Error parsing config"),
            Error::LoadCredentials(_) => f.write_str("Error loading client credentials"),
            Error::BrokerApi(_) => f.write_str("Error running broker API"),
            Error::WaitForSignal(_) => f.write_str("Error waiting for shutdown signal"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ErrorParsingConfig(err) | Error::WaitForSignal(err) => Some(err),
            Error::LoadCredentials(err) => Some(err),
            Error::BrokerApi(err) => Some(err),
        }
    }
}
