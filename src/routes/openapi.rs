use axum::Json;
use serde_json::{json, Map, Value};

use crate::params::{ParamSpec, RouteParams};
use crate::routes::products::PRODUCT_ITEM;

pub async fn handler() -> Json<Value> {
    Json(document(&[&*PRODUCT_ITEM]))
}

/// OpenAPI 3 document for the given routes, all served with GET.
pub fn document(routes: &[&RouteParams]) -> Value {
    let mut paths = Map::new();

    for route in routes {
        let parameters: Vec<Value> = route.specs.iter().map(parameter).collect();
        paths.insert(
            route.path.to_string(),
            json!({
                "get": {
                    "operationId": route.operation_id,
                    "parameters": parameters,
                    "responses": {
                        "200": { "description": "Successful Response" },
                        "422": { "description": "Validation Error" },
                    },
                }
            }),
        );
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
    })
}

fn parameter(spec: &ParamSpec) -> Value {
    let mut schema = json!({ "type": spec.kind.schema_type() });
    if let Some(default) = &spec.default {
        schema["default"] = default.to_json();
    }

    json!({
        "name": spec.name,
        "in": spec.source,
        "required": spec.is_required(),
        "schema": schema,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_product_item_parameters() {
        let doc = document(&[&*PRODUCT_ITEM]);
        let operation = &doc["paths"]["/products/{category}/items/{item_id}"]["get"];

        assert_eq!(operation["operationId"], "read_product_item");
        assert_eq!(
            operation["parameters"][1],
            json!({
                "name": "item_id",
                "in": "path",
                "required": true,
                "schema": { "type": "integer" },
            })
        );
        assert_eq!(
            operation["parameters"][3],
            json!({
                "name": "discount",
                "in": "query",
                "required": false,
                "schema": { "type": "number", "default": 0.0 },
            })
        );
    }

    #[tokio::test]
    async fn test_handler_serves_document() {
        let Json(doc) = handler().await;
        assert_eq!(doc["openapi"], "3.1.0");
        assert_eq!(doc["paths"].as_object().unwrap().len(), 1);
    }
}
