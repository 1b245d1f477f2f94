// Copyright (c) Microsoft. All rights reserved.

use std::borrow::Cow;

use http::StatusCode;
use osb_api::last_operation;
use serde::de::IgnoredAny;

use super::server::{self, response, RouteResponse};
use crate::{uri, Api};

pub(super) struct Route {
    api: Api,
    instance_id: String,
    params: last_operation::Params,
}

#[async_trait::async_trait]
impl server::Route for Route {
    type PutBody = IgnoredAny;
    type PatchBody = IgnoredAny;

    fn from_uri(
        service: &super::Service,
        path: &str,
        query: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> Option<Self> {
        let mut segments = super::instance_path(path)?;
        if segments.len() != 2 || segments[1] != uri::LAST_OPERATION {
            return None;
        }

        Some(Route {
            api: service.api.clone(),
            instance_id: segments.swap_remove(0),
            params: last_operation::Params {
                service_id: super::query_value(query, "service_id"),
                plan_id: super::query_value(query, "plan_id"),
                operation: super::query_value(query, "operation"),
            },
        })
    }

    async fn get(self) -> RouteResponse {
        let res = self
            .api
            .last_operation(&self.instance_id, self.params)
            .await?;

        let res = response::json(StatusCode::OK, &res);

        Ok(res)
    }
}
