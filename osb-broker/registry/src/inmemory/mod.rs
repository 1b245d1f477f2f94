// Copyright (c) Microsoft. All rights reserved.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::{
    Error, LastOperation, OperationKind, ProvisionOutcome, Registry as RegistryTrait,
    ServiceInstance,
};

#[derive(Default)]
struct Inner {
    instances: BTreeMap<String, ServiceInstance>,
    operations: BTreeMap<String, LastOperation>,
}

/// Process-memory registry. Nothing survives a restart.
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Registry {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RegistryTrait for Registry {
    async fn provision(&self, instance: ServiceInstance) -> Result<ProvisionOutcome, Error> {
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.instances.get(&instance.id) {
            return if existing.matches(&instance) {
                Ok(ProvisionOutcome::AlreadyExists)
            } else {
                Err(Error::InstanceConflict(instance.id))
            };
        }

        log::debug!("Storing instance {}", instance.id);
        inner.operations.insert(
            instance.id.clone(),
            LastOperation::succeeded(OperationKind::Provision),
        );
        inner.instances.insert(instance.id.clone(), instance);

        Ok(ProvisionOutcome::Created)
    }

    async fn deprovision(&self, id: &str, track_operation: bool) -> Option<ServiceInstance> {
        let mut inner = self.inner.lock();

        let removed = inner.instances.remove(id);
        inner.operations.remove(id);
        if removed.is_some() {
            log::debug!("Removed instance {}", id);
        }

        if track_operation {
            inner.operations.insert(
                id.to_string(),
                LastOperation::succeeded(OperationKind::Deprovision),
            );
        }

        removed
    }

    async fn get_instance(&self, id: &str) -> Result<ServiceInstance, Error> {
        let inner = self.inner.lock();

        inner
            .instances
            .get(id)
            .cloned()
            .ok_or_else(|| Error::InstanceNotFound(id.to_string()))
    }

    async fn track_operation(&self, id: &str, kind: OperationKind) -> bool {
        let mut inner = self.inner.lock();

        inner
            .operations
            .insert(id.to_string(), LastOperation::succeeded(kind));

        inner.instances.contains_key(id)
    }

    async fn last_operation(&self, id: &str) -> Result<LastOperation, Error> {
        let mut inner = self.inner.lock();

        let operation = if inner.instances.contains_key(id) {
            inner.operations.get(id).cloned()
        } else {
            // Nothing will update this record again.
            inner.operations.remove(id)
        };

        operation.ok_or_else(|| Error::OperationNotFound(id.to_string()))
    }
}
