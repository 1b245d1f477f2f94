// Copyright (c) Microsoft. All rights reserved.

use std::borrow::Cow;

use http::{Method, StatusCode};
use hyper::{body::HttpBody, Body, Response};
use osb_api::ErrorBody;
use serde::de::DeserializeOwned;

pub(crate) type RouteResponse = Result<Response<Body>, Error>;

/// Largest request body the broker reads. OSB bodies are a few kilobytes.
pub(crate) const MAX_BODY_SIZE: usize = 64 * 1024;

#[derive(Debug)]
pub(crate) struct Error {
    pub status_code: StatusCode,
    pub message: Cow<'static, str>,
}

impl Error {
    pub(crate) fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Error {
            status_code: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub(crate) fn missing_body() -> Self {
        Error::bad_request("missing request body")
    }

    pub(crate) fn body_too_large(limit: usize) -> Self {
        Error {
            status_code: StatusCode::PAYLOAD_TOO_LARGE,
            message: format!("request body exceeds {} bytes", limit).into(),
        }
    }

    pub(crate) fn into_response(self) -> Response<Body> {
        let body = ErrorBody {
            error: None,
            description: Some(self.message.into_owned()),
        };

        response::json(self.status_code, &body)
    }
}

impl From<crate::Error> for Error {
    fn from(err: crate::Error) -> Self {
        Error {
            status_code: err.status_code(),
            message: err.to_string().into(),
        }
    }
}

fn method_not_allowed() -> RouteResponse {
    Err(Error {
        status_code: StatusCode::METHOD_NOT_ALLOWED,
        message: "method not allowed".into(),
    })
}

/// One URI of the broker API. Methods a route does not override answer 405.
#[async_trait::async_trait]
pub(crate) trait Route: Sized + Send + 'static {
    type PutBody: DeserializeOwned + Send;
    type PatchBody: DeserializeOwned + Send;

    fn from_uri(
        service: &super::Service,
        path: &str,
        query: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> Option<Self>;

    async fn get(self) -> RouteResponse {
        method_not_allowed()
    }

    async fn delete(self) -> RouteResponse {
        method_not_allowed()
    }

    async fn put(self, _body: Option<Self::PutBody>) -> RouteResponse {
        method_not_allowed()
    }

    async fn patch(self, _body: Option<Self::PatchBody>) -> RouteResponse {
        method_not_allowed()
    }
}

/// Runs `R` if it claims the request path. `None` lets the caller try the next route.
pub(crate) async fn dispatch<R: Route>(
    service: &super::Service,
    method: &Method,
    path: &str,
    query: &[(Cow<'_, str>, Cow<'_, str>)],
    body: &[u8],
) -> Option<RouteResponse> {
    let route = R::from_uri(service, path, query)?;

    let res = match *method {
        Method::GET => route.get().await,
        Method::DELETE => route.delete().await,
        Method::PUT => match parse_body(body) {
            Ok(body) => route.put(body).await,
            Err(err) => Err(err),
        },
        Method::PATCH => match parse_body(body) {
            Ok(body) => route.patch(body).await,
            Err(err) => Err(err),
        },
        _ => method_not_allowed(),
    };

    Some(res)
}

/// Collects `body`, failing as soon as it grows past `limit` bytes.
pub(crate) async fn read_body(mut body: Body, limit: usize) -> Result<Vec<u8>, Error> {
    let announced = usize::try_from(body.size_hint().lower()).unwrap_or(usize::MAX);
    if announced > limit {
        return Err(Error::body_too_large(limit));
    }

    let mut buf = Vec::with_capacity(announced);
    while let Some(chunk) = body.data().await {
        let chunk =
            chunk.map_err(|err| Error::bad_request(format!("could not read body: {}", err)))?;

        if buf.len() + chunk.len() > limit {
            return Err(Error::body_too_large(limit));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, Error> {
    if body.is_empty() {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|err| Error::bad_request(format!("malformed request body: {}", err)))
}

pub(crate) mod response {
    use http::{header, HeaderValue, StatusCode};
    use hyper::{Body, Response};

    pub(crate) fn json(status_code: StatusCode, body: &impl serde::Serialize) -> Response<Body> {
        let mut res = match serde_json::to_vec(body) {
            Ok(body) => Response::new(Body::from(body)),
            Err(err) => {
                log::error!("Could not serialize response: {}", err);

                let mut res = Response::new(Body::empty());
                *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                return res;
            }
        };

        *res.status_mut() = status_code;
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        res
    }
}
