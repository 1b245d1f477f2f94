// Copyright (c) Microsoft. All rights reserved.

use credential_issuer::Credentials;
use instance_registry::{OperationKind, ProvisionOutcome, ServiceInstance};
use osb_api::{
    bind, catalog, deprovision, last_operation, provision, unbind, update, Parameters,
};
use serde_json::Value;

use crate::{error::Error, Api, Completion, Reply};

pub const BASE_URL_KEY: &str = "baseurl";
pub const CA_KEY: &str = "ca";
pub const KEY_KEY: &str = "key";
pub const CERT_KEY: &str = "cert";

impl Api {
    pub fn get_catalog(&self) -> catalog::Response {
        let response = catalog::Response::clone(&self.catalog);
        log::debug!("catalog response: {:?}", response);

        response
    }

    pub async fn provision(
        &self,
        instance_id: String,
        accepts_incomplete: bool,
        req: provision::Request,
    ) -> Result<Reply<provision::Response>, Error> {
        let credentials = self
            .issuer
            .issue(&instance_id)
            .await
            .map_err(|err| Error::IssueCredentials(instance_id.clone(), err))?;

        let mut parameters = req.parameters.unwrap_or_default();
        inject_credentials(&mut parameters, credentials);

        let instance = ServiceInstance {
            id: instance_id,
            service_id: req.service_id,
            plan_id: req.plan_id,
            parameters,
        };
        let id = instance.id.clone();

        let reply = match self.registry.provision(instance).await? {
            ProvisionOutcome::AlreadyExists => {
                log::info!("Instance {} already provisioned", id);

                Reply {
                    completion: Completion::Exists,
                    body: provision::Response::default(),
                }
            }
            ProvisionOutcome::Created => {
                log::info!("Provisioned instance {}", id);

                if self.completes_async(accepts_incomplete) {
                    Reply {
                        completion: Completion::Accepted,
                        body: provision::Response {
                            dashboard_url: None,
                            operation: Some(OperationKind::Provision.to_string()),
                        },
                    }
                } else {
                    Reply {
                        completion: Completion::Created,
                        body: provision::Response::default(),
                    }
                }
            }
        };

        Ok(reply)
    }

    pub async fn deprovision(
        &self,
        instance_id: &str,
        accepts_incomplete: bool,
        params: deprovision::Params,
    ) -> Reply<deprovision::Response> {
        let asynchronous = self.completes_async(accepts_incomplete);
        let removed = self.registry.deprovision(instance_id, asynchronous).await;

        if removed.is_some() {
            log::info!("Deprovisioned instance {}", instance_id);
        } else {
            log::debug!(
                "Deprovision of unknown instance {} (service {:?}, plan {:?})",
                instance_id,
                params.service_id,
                params.plan_id
            );
        }

        if asynchronous {
            Reply {
                completion: Completion::Accepted,
                body: deprovision::Response {
                    operation: Some(OperationKind::Deprovision.to_string()),
                },
            }
        } else {
            Reply {
                completion: Completion::Done,
                body: deprovision::Response::default(),
            }
        }
    }

    pub async fn last_operation(
        &self,
        instance_id: &str,
        params: last_operation::Params,
    ) -> Result<last_operation::Response, Error> {
        let operation = self.registry.last_operation(instance_id).await?;

        if let Some(requested) = &params.operation {
            if requested != operation.kind.as_str() {
                log::debug!(
                    "Polled operation {} for instance {}, last recorded is {}",
                    requested,
                    instance_id,
                    operation.kind
                );
            }
        }

        Ok(last_operation::Response {
            state: operation.state,
            description: operation.description,
        })
    }

    pub async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        _req: bind::Request,
    ) -> Result<Reply<bind::Response>, Error> {
        let instance = self.registry.get_instance(instance_id).await?;

        log::info!("Bound {} to instance {}", binding_id, instance_id);

        Ok(Reply {
            completion: Completion::Created,
            body: bind::Response {
                credentials: instance.parameters,
            },
        })
    }

    pub fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        _params: unbind::Params,
    ) -> Reply<unbind::Response> {
        log::info!("Unbound {} from instance {}", binding_id, instance_id);

        Reply {
            completion: Completion::Done,
            body: unbind::Response {},
        }
    }

    pub async fn update(
        &self,
        instance_id: &str,
        accepts_incomplete: bool,
        req: update::Request,
    ) -> Reply<update::Response> {
        if !self.completes_async(accepts_incomplete) {
            log::info!("Update of instance {} to plan {:?}", instance_id, req.plan_id);

            return Reply {
                completion: Completion::Done,
                body: update::Response::default(),
            };
        }

        let known = self
            .registry
            .track_operation(instance_id, OperationKind::Update)
            .await;
        log::info!(
            "Update of instance {} to plan {:?} (known instance: {})",
            instance_id,
            req.plan_id,
            known
        );

        Reply {
            completion: Completion::Accepted,
            body: update::Response {
                dashboard_url: None,
                operation: Some(OperationKind::Update.to_string()),
            },
        }
    }

    /// Every broker API version is accepted.
    #[allow(clippy::unnecessary_wraps)]
    pub fn validate_broker_api_version(&self, version: &str) -> Result<(), Error> {
        log::debug!("Broker API version {}", version);

        Ok(())
    }

    fn completes_async(&self, accepts_incomplete: bool) -> bool {
        accepts_incomplete && self.async_operations
    }
}

fn inject_credentials(parameters: &mut Parameters, credentials: Credentials) {
    parameters.insert(BASE_URL_KEY.to_string(), Value::String(credentials.base_url));
    parameters.insert(CA_KEY.to_string(), Value::String(credentials.ca));
    parameters.insert(KEY_KEY.to_string(), Value::String(credentials.key));
    parameters.insert(CERT_KEY.to_string(), Value::String(credentials.cert));
}
