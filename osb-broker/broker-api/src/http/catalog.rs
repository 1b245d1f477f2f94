// Copyright (c) Microsoft. All rights reserved.

use std::borrow::Cow;

use http::StatusCode;
use serde::de::IgnoredAny;

use super::server::{self, response, RouteResponse};
use crate::{uri, Api};

pub(super) struct Route {
    api: Api,
}

#[async_trait::async_trait]
impl server::Route for Route {
    type PutBody = IgnoredAny;
    type PatchBody = IgnoredAny;

    fn from_uri(
        service: &super::Service,
        path: &str,
        _query: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> Option<Self> {
        if path != uri::CATALOG {
            return None;
        }

        Some(Route {
            api: service.api.clone(),
        })
    }

    async fn get(self) -> RouteResponse {
        let res = self.api.get_catalog();

        let res = response::json(StatusCode::OK, &res);

        Ok(res)
    }
}
