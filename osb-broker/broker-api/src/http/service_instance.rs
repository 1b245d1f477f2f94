// Copyright (c) Microsoft. All rights reserved.

// Provision (PUT), update (PATCH) and deprovision (DELETE) of one instance.

use std::borrow::Cow;

use osb_api::{deprovision, provision, update};

use super::server::{self, response, RouteResponse};
use crate::Api;

pub(super) struct Route {
    api: Api,
    instance_id: String,
    accepts_incomplete: bool,
    service_id: Option<String>,
    plan_id: Option<String>,
}

#[async_trait::async_trait]
impl server::Route for Route {
    type PutBody = provision::Request;
    type PatchBody = update::Request;

    fn from_uri(
        service: &super::Service,
        path: &str,
        query: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> Option<Self> {
        let mut segments = super::instance_path(path)?;
        if segments.len() != 1 {
            return None;
        }

        Some(Route {
            api: service.api.clone(),
            instance_id: segments.remove(0),
            accepts_incomplete: super::accepts_incomplete(query),
            service_id: super::query_value(query, "service_id"),
            plan_id: super::query_value(query, "plan_id"),
        })
    }

    async fn put(self, body: Option<Self::PutBody>) -> RouteResponse {
        let body = body.ok_or_else(server::Error::missing_body)?;

        let reply = self
            .api
            .provision(self.instance_id, self.accepts_incomplete, body)
            .await?;

        let res = response::json(super::status_code(reply.completion), &reply.body);

        Ok(res)
    }

    async fn patch(self, body: Option<Self::PatchBody>) -> RouteResponse {
        let body = body.ok_or_else(server::Error::missing_body)?;

        let reply = self
            .api
            .update(&self.instance_id, self.accepts_incomplete, body)
            .await;

        let res = response::json(super::status_code(reply.completion), &reply.body);

        Ok(res)
    }

    async fn delete(self) -> RouteResponse {
        let params = deprovision::Params {
            service_id: self.service_id,
            plan_id: self.plan_id,
        };

        let reply = self
            .api
            .deprovision(&self.instance_id, self.accepts_incomplete, params)
            .await;

        let res = response::json(super::status_code(reply.completion), &reply.body);

        Ok(res)
    }
}
