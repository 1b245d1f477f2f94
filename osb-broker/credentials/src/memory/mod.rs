// Copyright (c) Microsoft. All rights reserved.

use crate::{Credentials, Error, Issuer as IssuerTrait};

/// Hands out credentials supplied at construction.
pub struct Issuer {
    credentials: Credentials,
}

impl Issuer {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Issuer { credentials }
    }
}

#[async_trait::async_trait]
impl IssuerTrait for Issuer {
    async fn issue(&self, _instance_id: &str) -> Result<Credentials, Error> {
        Ok(self.credentials.clone())
    }
}
