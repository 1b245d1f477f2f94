// Copyright (c) Microsoft. All rights reserved.

use std::sync::Arc;

use broker_api::BrokerServer;
use broker_config::CredentialsConfig;
use credential_issuer::{disk, test_material};
use hyper::{client::HttpConnector, Body, Client, Method, Request, StatusCode};
use osb_api::{bind, BROKER_API_VERSION_HEADER};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

struct TestServer {
    _dir: TempDir,
    server: BrokerServer,
    material: test_material::Material,
    client: Client<HttpConnector>,
}

impl TestServer {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let uri = format!("http://{}{}", self.server.local_addr(), path);
        let body = body.map_or_else(Body::empty, |body| Body::from(body.to_string()));
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(BROKER_API_VERSION_HEADER, "2.13")
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap();

        let res = self.client.request(req).await.expect("Broker API is reachable");
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("Broker API answers JSON")
        };

        (status, body)
    }
}

async fn start_test_server(async_operations: bool) -> TestServer {
    let tmp_dir = tempdir().unwrap();
    let material = test_material::generate();
    let disk_config = test_material::write(tmp_dir.path(), &material);

    let mut config =
        broker_config::Config::load_config("../../osb-broker/config/tests/Config.toml").unwrap();
    config.async_operations = async_operations;
    config.broker_api.bind_address = "127.0.0.1".to_string();
    config.broker_api.bind_port = 0;
    config.credentials = CredentialsConfig::Disk(disk_config.clone());

    let issuer = Arc::new(disk::Issuer::load(&disk_config).await.unwrap());
    let registry = Arc::new(instance_registry::inmemory::Registry::new());
    let api = broker_api::Api::new(registry, issuer, config.async_operations);

    let server = broker_api::start_broker_api(&config, api).await.unwrap();

    TestServer {
        _dir: tmp_dir,
        server,
        material,
        client: Client::new(),
    }
}

fn provision_body(plan_id: &str) -> Option<Value> {
    Some(json!({
        "service_id": "s1",
        "plan_id": plan_id,
        "organization_guid": "org",
        "space_guid": "space",
        "parameters": { "color": "Grey" },
    }))
}

fn bind_body() -> Option<Value> {
    Some(json!({ "service_id": "s1", "plan_id": "p1", "app_guid": "app" }))
}

#[tokio::test]
async fn provision_bind_deprovision() {
    let server = start_test_server(false).await;

    // ======= provision =========================================================================
    let (status, _) = server
        .send(Method::PUT, "/v2/service_instances/i1", provision_body("p1"))
        .await;
    assert_eq!(StatusCode::CREATED, status);

    let (status, _) = server
        .send(Method::PUT, "/v2/service_instances/i1", provision_body("p1"))
        .await;
    assert_eq!(StatusCode::OK, status);

    let (status, body) = server
        .send(Method::PUT, "/v2/service_instances/i1", provision_body("p2"))
        .await;
    assert_eq!(StatusCode::CONFLICT, status);
    assert_eq!("InstanceID in use", body["description"]);

    // ======= bind ==============================================================================
    let (status, body) = server
        .send(
            Method::PUT,
            "/v2/service_instances/i1/service_bindings/b1",
            bind_body(),
        )
        .await;
    assert_eq!(StatusCode::CREATED, status);

    let body: bind::Response = serde_json::from_value(body).unwrap();
    assert_eq!(test_material::BASE_URL, body.credentials["baseurl"]);
    assert_eq!(server.material.ca, body.credentials["ca"]);
    assert_eq!(server.material.cert, body.credentials["cert"]);
    assert_eq!(server.material.key, body.credentials["key"]);
    assert_eq!("Grey", body.credentials["color"]);

    // ======= deprovision =======================================================================
    let (status, _) = server
        .send(
            Method::DELETE,
            "/v2/service_instances/i1?service_id=s1&plan_id=p1",
            None,
        )
        .await;
    assert_eq!(StatusCode::OK, status);

    let (status, _) = server
        .send(
            Method::PUT,
            "/v2/service_instances/i1/service_bindings/b1",
            bind_body(),
        )
        .await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    server.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn async_operations_are_polled() {
    let server = start_test_server(true).await;

    let (status, body) = server
        .send(
            Method::PUT,
            "/v2/service_instances/i1?accepts_incomplete=true",
            provision_body("p1"),
        )
        .await;
    assert_eq!(StatusCode::ACCEPTED, status);
    assert_eq!("provision", body["operation"]);

    let (status, body) = server
        .send(
            Method::GET,
            "/v2/service_instances/i1/last_operation?operation=provision",
            None,
        )
        .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("succeeded", body["state"]);

    let (status, body) = server
        .send(
            Method::DELETE,
            "/v2/service_instances/i1?service_id=s1&plan_id=p1&accepts_incomplete=true",
            None,
        )
        .await;
    assert_eq!(StatusCode::ACCEPTED, status);
    assert_eq!("deprovision", body["operation"]);

    let (status, body) = server
        .send(
            Method::GET,
            "/v2/service_instances/i1/last_operation",
            None,
        )
        .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("succeeded", body["state"]);

    // A finished deprovision is reported once.
    let (status, _) = server
        .send(
            Method::GET,
            "/v2/service_instances/i1/last_operation",
            None,
        )
        .await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    let (status, body) = server
        .send(
            Method::PATCH,
            "/v2/service_instances/unknown?accepts_incomplete=true",
            Some(json!({ "service_id": "s1", "plan_id": "p2" })),
        )
        .await;
    assert_eq!(StatusCode::ACCEPTED, status);
    assert_eq!("update", body["operation"]);

    server.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn catalog_is_stable() {
    let server = start_test_server(false).await;

    let (status, first) = server.send(Method::GET, "/v2/catalog", None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(1, first["services"].as_array().unwrap().len());

    let (_, second) = server.send(Method::GET, "/v2/catalog", None).await;
    assert_eq!(first, second);

    server.server.shutdown().await.unwrap();
}

#[tokio::test]
async fn version_header_is_required() {
    let server = start_test_server(false).await;

    let req = Request::builder()
        .method(Method::GET)
        .uri(format!("http://{}/v2/catalog", server.server.local_addr()))
        .body(Body::empty())
        .unwrap();
    let res = server.client.request(req).await.unwrap();
    assert_eq!(StatusCode::PRECONDITION_FAILED, res.status());

    server.server.shutdown().await.unwrap();
}
