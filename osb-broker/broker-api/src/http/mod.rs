// Copyright (c) Microsoft. All rights reserved.

mod catalog;
mod last_operation;
pub(crate) mod server;
mod service_binding;
mod service_instance;

use std::{borrow::Cow, convert::Infallible};

use http::{request::Parts, StatusCode};
use hyper::{Body, Request, Response};
use osb_api::BROKER_API_VERSION_HEADER;
use percent_encoding::percent_decode_str;

use self::server::{dispatch, RouteResponse};
use crate::{uri, Api, Completion};

#[derive(Clone)]
pub(crate) struct Service {
    pub(crate) api: Api,
}

impl Service {
    pub(crate) async fn call(self, req: Request<Body>) -> Result<Response<Body>, Infallible> {
        let (parts, body) = req.into_parts();
        log::info!("{} {}", parts.method, parts.uri.path());

        let res = match self.handle(&parts, body).await {
            Ok(res) => res,
            Err(err) => {
                if err.status_code.is_server_error() {
                    log::error!("{} {}: {}", parts.method, parts.uri.path(), err.message);
                }
                err.into_response()
            }
        };
        log::debug!("{} {} -> {}", parts.method, parts.uri.path(), res.status());

        Ok(res)
    }

    async fn handle(&self, parts: &Parts, body: Body) -> RouteResponse {
        let version = parts
            .headers
            .get(BROKER_API_VERSION_HEADER)
            .ok_or_else(|| server::Error {
                status_code: StatusCode::PRECONDITION_FAILED,
                message: format!("{} header is required", BROKER_API_VERSION_HEADER).into(),
            })?
            .to_str()
            .map_err(|_| server::Error {
                status_code: StatusCode::PRECONDITION_FAILED,
                message: format!("{} header is not valid text", BROKER_API_VERSION_HEADER)
                    .into(),
            })?;

        self.api
            .validate_broker_api_version(version)
            .map_err(|err| server::Error {
                status_code: StatusCode::PRECONDITION_FAILED,
                message: err.to_string().into(),
            })?;

        let body = server::read_body(body, server::MAX_BODY_SIZE).await?;

        let query: Vec<(Cow<'_, str>, Cow<'_, str>)> =
            url::form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes())
                .collect();
        let path = parts.uri.path();
        let method = &parts.method;

        if let Some(res) = dispatch::<catalog::Route>(self, method, path, &query, &body).await {
            return res;
        }
        if let Some(res) =
            dispatch::<service_instance::Route>(self, method, path, &query, &body).await
        {
            return res;
        }
        if let Some(res) =
            dispatch::<last_operation::Route>(self, method, path, &query, &body).await
        {
            return res;
        }
        if let Some(res) =
            dispatch::<service_binding::Route>(self, method, path, &query, &body).await
        {
            return res;
        }

        Err(server::Error {
            status_code: StatusCode::NOT_FOUND,
            message: format!("no route for {}", path).into(),
        })
    }
}

/// Percent-decoded segments below `/v2/service_instances/`, if the path is under it.
fn instance_path(path: &str) -> Option<Vec<String>> {
    let rest = path.strip_prefix(uri::SERVICE_INSTANCES)?;

    rest.split('/')
        .map(|segment| {
            let segment = percent_decode_str(segment).decode_utf8().ok()?;
            (!segment.is_empty()).then(|| segment.into_owned())
        })
        .collect()
}

fn query_value(query: &[(Cow<'_, str>, Cow<'_, str>)], name: &str) -> Option<String> {
    query
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.to_string())
}

fn accepts_incomplete(query: &[(Cow<'_, str>, Cow<'_, str>)]) -> bool {
    query_value(query, "accepts_incomplete").map_or(false, |value| value == "true")
}

fn status_code(completion: Completion) -> StatusCode {
    match completion {
        Completion::Created => StatusCode::CREATED,
        Completion::Exists | Completion::Done => StatusCode::OK,
        Completion::Accepted => StatusCode::ACCEPTED,
    }
}
