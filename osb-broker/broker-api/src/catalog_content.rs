// Copyright (c) Microsoft. All rights reserved.

use osb_api::{
    catalog::{InputParametersSchema, Plan, Response, Schemas, Service, ServiceInstanceSchema},
    Parameters,
};
use serde_json::json;

pub const SERVICE_ID: &str = "4f6e6cf6-ffdd-425f-a2c7-3c9258ad246a";
pub const PLAN_ID: &str = "86064792-7ea2-467b-af93-ac9694d96d5b";

/// The one service and plan this broker offers.
pub(crate) fn starter_pack() -> Response {
    let mut metadata = Parameters::new();
    metadata.insert(
        "displayName".to_string(),
        json!("Example starter pack service"),
    );
    metadata.insert(
        "imageUrl".to_string(),
        json!("https://avatars2.githubusercontent.com/u/19862012?s=200&v=4"),
    );

    let create_parameters = json!({
        "type": "object",
        "properties": {
            "color": {
                "type": "string",
                "default": "Clear",
                "enum": ["Clear", "Beige", "Grey"],
            },
        },
    });

    let plan = Plan {
        id: PLAN_ID.to_string(),
        name: "default".to_string(),
        description: "The default plan for the starter pack example service".to_string(),
        free: Some(true),
        bindable: None,
        metadata: None,
        schemas: Some(Schemas {
            service_instance: Some(ServiceInstanceSchema {
                create: Some(InputParametersSchema {
                    parameters: create_parameters,
                }),
                update: None,
            }),
            service_binding: None,
        }),
    };

    let service = Service {
        name: "example-starter-pack-service".to_string(),
        id: SERVICE_ID.to_string(),
        description: "The example service from the osb starter pack!".to_string(),
        tags: Vec::new(),
        bindable: true,
        plan_updateable: Some(true),
        metadata: Some(metadata),
        plans: vec![plan],
    };

    Response {
        services: vec![service],
    }
}
