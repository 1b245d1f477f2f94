// Copyright (c) Microsoft. All rights reserved.

use std::borrow::Cow;

use osb_api::{bind, unbind};
use serde::de::IgnoredAny;

use super::server::{self, response, RouteResponse};
use crate::{uri, Api};

pub(super) struct Route {
    api: Api,
    instance_id: String,
    binding_id: String,
    service_id: Option<String>,
    plan_id: Option<String>,
}

#[async_trait::async_trait]
impl server::Route for Route {
    type PutBody = bind::Request;
    type PatchBody = IgnoredAny;

    fn from_uri(
        service: &super::Service,
        path: &str,
        query: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> Option<Self> {
        let segments = super::instance_path(path)?;
        let (instance_id, binding_id) = match segments.as_slice() {
            [instance_id, bindings, binding_id] if bindings == uri::SERVICE_BINDINGS => {
                (instance_id.clone(), binding_id.clone())
            }
            _ => return None,
        };

        Some(Route {
            api: service.api.clone(),
            instance_id,
            binding_id,
            service_id: super::query_value(query, "service_id"),
            plan_id: super::query_value(query, "plan_id"),
        })
    }

    async fn put(self, body: Option<Self::PutBody>) -> RouteResponse {
        let body = body.ok_or_else(server::Error::missing_body)?;

        let reply = self
            .api
            .bind(&self.instance_id, &self.binding_id, body)
            .await?;

        let res = response::json(super::status_code(reply.completion), &reply.body);

        Ok(res)
    }

    async fn delete(self) -> RouteResponse {
        let params = unbind::Params {
            service_id: self.service_id,
            plan_id: self.plan_id,
        };

        let reply = self.api.unbind(&self.instance_id, &self.binding_id, params);

        let res = response::json(super::status_code(reply.completion), &reply.body);

        Ok(res)
    }
}
