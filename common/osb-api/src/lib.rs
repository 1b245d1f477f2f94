// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::default_trait_access,
    clippy::let_unit_value,
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::too_many_lines
)]

//! Wire types of the Open Service Broker API.

use std::fmt;

/// Free-form key/value bag carried by provision, update and bind requests.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Header every platform request must carry.
pub const BROKER_API_VERSION_HEADER: &str = "X-Broker-API-Version";

pub mod catalog {
    use crate::Parameters;

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Response {
        pub services: Vec<Service>,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Service {
        pub name: String,
        pub id: String,
        pub description: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub tags: Vec<String>,
        pub bindable: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub plan_updateable: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub metadata: Option<Parameters>,
        pub plans: Vec<Plan>,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Plan {
        pub id: String,
        pub name: String,
        pub description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub free: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub bindable: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub metadata: Option<Parameters>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub schemas: Option<Schemas>,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Schemas {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub service_instance: Option<ServiceInstanceSchema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub service_binding: Option<ServiceBindingSchema>,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct ServiceInstanceSchema {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub create: Option<InputParametersSchema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub update: Option<InputParametersSchema>,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct ServiceBindingSchema {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub create: Option<InputParametersSchema>,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct InputParametersSchema {
        pub parameters: serde_json::Value,
    }
}

pub mod provision {
    use crate::Parameters;

    #[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
    pub struct Request {
        pub service_id: String,
        pub plan_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub organization_guid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub space_guid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parameters: Option<Parameters>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub context: Option<serde_json::Value>,
    }

    #[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
    pub struct Response {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub dashboard_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub operation: Option<String>,
    }
}

pub mod update {
    use crate::Parameters;

    #[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
    pub struct Request {
        pub service_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub plan_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parameters: Option<Parameters>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub previous_values: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub context: Option<serde_json::Value>,
    }

    #[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
    pub struct Response {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub dashboard_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub operation: Option<String>,
    }
}

pub mod deprovision {
    /// Deprovision carries its arguments in the query string.
    #[derive(Clone, Debug, Default)]
    pub struct Params {
        pub service_id: Option<String>,
        pub plan_id: Option<String>,
    }

    #[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
    pub struct Response {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub operation: Option<String>,
    }
}

pub mod last_operation {
    #[derive(Clone, Debug, Default)]
    pub struct Params {
        pub service_id: Option<String>,
        pub plan_id: Option<String>,
        pub operation: Option<String>,
    }

    #[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
    pub enum State {
        #[serde(rename = "in progress")]
        InProgress,
        #[serde(rename = "succeeded")]
        Succeeded,
        #[serde(rename = "failed")]
        Failed,
    }

    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Response {
        pub state: State,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }
}

pub mod bind {
    use crate::Parameters;

    #[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
    pub struct Request {
        pub service_id: String,
        pub plan_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub app_guid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub bind_resource: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parameters: Option<Parameters>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub context: Option<serde_json::Value>,
    }

    #[derive(Debug, serde::Deserialize, serde::Serialize)]
    pub struct Response {
        pub credentials: Parameters,
    }
}

pub mod unbind {
    #[derive(Clone, Debug, Default)]
    pub struct Params {
        pub service_id: Option<String>,
        pub plan_id: Option<String>,
    }

    #[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
    pub struct Response {}
}

/// Body of every non-2xx broker response.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.description) {
            (Some(error), Some(description)) => write!(f, "{}: {}", error, description),
            (Some(message), None) | (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_operation_state_uses_osb_spelling() {
        let response = last_operation::Response {
            state: last_operation::State::InProgress,
            description: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "in progress" }));

        let parsed: last_operation::Response =
            serde_json::from_str(r#"{"state":"failed","description":"boom"}"#).unwrap();
        assert_eq!(parsed.state, last_operation::State::Failed);
        assert_eq!(parsed.description.as_deref(), Some("boom"));
    }

    #[test]
    fn provision_request_optional_fields() {
        let request: provision::Request =
            serde_json::from_str(r#"{"service_id":"s1","plan_id":"p1"}"#).unwrap();

        assert_eq!(request.service_id, "s1");
        assert_eq!(request.plan_id, "p1");
        assert!(request.parameters.is_none());
        assert!(request.context.is_none());
    }

    #[test]
    fn empty_responses_serialize_to_empty_objects() {
        let json = serde_json::to_string(&provision::Response::default()).unwrap();
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&unbind::Response {}).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn error_body_display() {
        let body = ErrorBody {
            error: None,
            description: Some("InstanceID in use".to_string()),
        };
        assert_eq!(body.to_string(), "InstanceID in use");

        let body = ErrorBody {
            error: Some("AsyncRequired".to_string()),
            description: Some("async only".to_string()),
        };
        assert_eq!(body.to_string(), "AsyncRequired: async only");
    }
}
