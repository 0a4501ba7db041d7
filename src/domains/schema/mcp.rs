//! Input schema of a tool as published over the stdio transport.

use rmcp::model::JsonObject;
use serde_json::{Map, Value, json};

use crate::domains::tools::ToolDescriptor;

/// JSON Schema object describing a tool's parameters.
///
/// Object parameters with an attached schema publish it in full; every other
/// parameter is described by its type tag.
pub fn input_schema(descriptor: &ToolDescriptor) -> JsonObject {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in descriptor.parameters() {
        let mut property = match &param.schema {
            Some(Value::Object(schema)) => schema.clone(),
            _ => Map::new(),
        };
        property.insert("type".into(), json!(param.kind.as_str()));
        property.insert("description".into(), json!(param.description));
        properties.insert(param.name.into(), Value::Object(property));

        if param.required {
            required.push(json!(param.name));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}
