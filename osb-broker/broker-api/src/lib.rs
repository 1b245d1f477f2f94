// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::default_trait_access,
    clippy::let_and_return,
    clippy::let_unit_value,
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::too_many_lines
)]

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use broker_config::Config;
use credential_issuer::Issuer;
use hyper::service::{make_service_fn, service_fn};
use instance_registry::Registry;
use osb_api::catalog;
use tokio::{sync::oneshot, task::JoinHandle};

pub use error::Error;

mod broker_api;
mod catalog_content;
mod error;
mod http;

pub mod uri {
    pub const CATALOG: &str = "/v2/catalog";
    pub const SERVICE_INSTANCES: &str = "/v2/service_instances/";
    pub const LAST_OPERATION: &str = "last_operation";
    pub const SERVICE_BINDINGS: &str = "service_bindings";
}

/// Running broker endpoint.
pub struct BrokerServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<(), hyper::Error>>,
}

impl BrokerServer {
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for in-flight requests to finish.
    pub async fn shutdown(self) -> Result<(), Error> {
        // The server may already have stopped on its own, which drops the receiver.
        let _ = self.shutdown_tx.send(());

        self.task.await.map_err(Error::Join)?.map_err(Error::Serve)
    }
}

pub async fn start_broker_api(config: &Config, api: Api) -> Result<BrokerServer, Error> {
    let address = format!(
        "{}:{}",
        config.broker_api.bind_address, config.broker_api.bind_port
    );
    let addr = tokio::net::lookup_host(address.as_str())
        .await
        .map_err(|err| Error::ResolveAddress(address.clone(), err))?
        .next()
        .ok_or_else(|| Error::NoAddress(address.clone()))?;

    let service = http::Service { api };
    let make_service = make_service_fn(move |_conn| {
        let service = service.clone();

        async move { Ok::<_, Infallible>(service_fn(move |req| service.clone().call(req))) }
    });

    let server = hyper::Server::try_bind(&addr)
        .map_err(Error::Bind)?
        .serve(make_service);
    let local_addr = server.local_addr();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server = server.with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });

    let task = tokio::spawn(async move {
        log::info!("Starting broker API on {}", local_addr);
        let res = server.await;
        if let Err(err) = &res {
            log::error!("Closing broker API: {:?}", err);
        } else {
            log::info!("Closing broker API");
        }

        res
    });

    Ok(BrokerServer {
        local_addr,
        shutdown_tx,
        task,
    })
}

/// How a successful operation completed. Decides the HTTP status of the reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Completion {
    Created,
    Exists,
    Done,
    Accepted,
}

#[derive(Debug)]
pub struct Reply<T> {
    pub completion: Completion,
    pub body: T,
}

/// The broker's request handler.
#[derive(Clone)]
pub struct Api {
    catalog: Arc<catalog::Response>,
    registry: Arc<dyn Registry>,
    issuer: Arc<dyn Issuer>,
    async_operations: bool,
}

impl Api {
    #[must_use]
    pub fn new(
        registry: Arc<dyn Registry>,
        issuer: Arc<dyn Issuer>,
        async_operations: bool,
    ) -> Self {
        Api {
            catalog: Arc::new(catalog_content::starter_pack()),
            registry,
            issuer,
            async_operations,
        }
    }
}
