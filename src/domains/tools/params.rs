//! Tool parameter declarations and coercion.
//!
//! Callers hand the gateway an untyped JSON object. Each tool declares its
//! parameters as [`ParameterSpec`]s; [`ToolArguments::decode`] checks the
//! required ones and converts every present value into a [`ParamValue`]
//! according to the declared [`ParamType`]. A value that cannot be converted
//! counts as absent.

use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use super::error::{ToolError, ToolResult};

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Object,
}

impl ParamType {
    /// JSON Schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object => "object",
        }
    }

    /// Convert an untyped value into this type, if possible.
    pub fn coerce(self, value: &Value) -> Option<ParamValue> {
        match self {
            Self::String => match value {
                Value::String(s) => Some(ParamValue::Text(s.clone())),
                Value::Number(n) => Some(ParamValue::Text(n.to_string())),
                Value::Bool(b) => Some(ParamValue::Text(b.to_string())),
                _ => None,
            },
            Self::Integer => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                            .map(|f| f as i64)
                    })
                    .map(ParamValue::Integer),
                Value::String(s) => s.trim().parse().ok().map(ParamValue::Integer),
                _ => None,
            },
            Self::Number => match value {
                Value::Number(n) => n.as_f64().map(ParamValue::Number),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(ParamValue::Number),
                _ => None,
            },
            // Objects may also arrive JSON-encoded inside a string.
            Self::Object => match value {
                Value::Object(map) => Some(ParamValue::Object(map.clone())),
                Value::String(s) => match serde_json::from_str(s) {
                    Ok(Value::Object(map)) => Some(ParamValue::Object(map)),
                    _ => None,
                },
                _ => None,
            },
        }
    }
}

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Object(Map<String, Value>),
}

/// Declaration of one tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: ParamType,
    /// Detailed JSON Schema for object parameters.
    pub schema: Option<Value>,
}

impl ParameterSpec {
    pub fn required(name: &'static str, description: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            description,
            required: true,
            kind,
            schema: None,
        }
    }

    pub fn optional(name: &'static str, description: &'static str, kind: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, kind)
        }
    }

    /// Attach the JSON Schema of `T` to an object parameter.
    pub fn with_schema_of<T: JsonSchema>(mut self) -> Self {
        let mut schema = schemars::schema_for!(T).to_value();
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
            obj.remove("title");
        }
        self.schema = Some(schema);
        self
    }
}

/// Coerced arguments for a single tool invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: HashMap<&'static str, ParamValue>,
}

impl ToolArguments {
    /// Validate and coerce a raw parameter bag against the tool's declarations.
    ///
    /// The first required parameter that is absent, null or not convertible
    /// aborts with [`ToolError::MissingParameter`]. Undeclared keys are ignored.
    pub fn decode(specs: &[ParameterSpec], raw: &Map<String, Value>) -> ToolResult<Self> {
        let present = |name: &str| raw.get(name).filter(|v| !v.is_null());

        if let Some(missing) = specs.iter().find(|s| s.required && present(s.name).is_none()) {
            return Err(ToolError::missing_parameter(missing.name));
        }

        let mut values = HashMap::new();
        for spec in specs {
            let Some(value) = present(spec.name) else {
                continue;
            };
            match spec.kind.coerce(value) {
                Some(coerced) => {
                    values.insert(spec.name, coerced);
                }
                None if spec.required => return Err(ToolError::missing_parameter(spec.name)),
                None => debug!("Ignoring unconvertible optional parameter '{}'", spec.name),
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn optional_text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> ToolResult<&str> {
        self.optional_text(name)
            .ok_or_else(|| ToolError::missing_parameter(name))
    }

    pub fn optional_integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ParamValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> ToolResult<i64> {
        self.optional_integer(name)
            .ok_or_else(|| ToolError::missing_parameter(name))
    }

    pub fn optional_number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ParamValue::Number(f)) => Some(*f),
            Some(ParamValue::Integer(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// Rebuild a typed value from an object parameter.
    ///
    /// A shape mismatch is reported like a missing parameter.
    pub fn object<T: DeserializeOwned>(&self, name: &str) -> ToolResult<T> {
        match self.get(name) {
            Some(ParamValue::Object(map)) => serde_json::from_value(Value::Object(map.clone()))
                .map_err(|e| {
                    debug!("Parameter '{}' has the wrong shape: {}", name, e);
                    ToolError::missing_parameter(name)
                }),
            _ => Err(ToolError::missing_parameter(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(
            ParamType::String.coerce(&json!("x")),
            Some(ParamValue::Text("x".into()))
        );
        assert_eq!(
            ParamType::String.coerce(&json!(12)),
            Some(ParamValue::Text("12".into()))
        );
        assert_eq!(ParamType::String.coerce(&json!({"a": 1})), None);
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(ParamType::Integer.coerce(&json!(7)), Some(ParamValue::Integer(7)));
        assert_eq!(ParamType::Integer.coerce(&json!(7.0)), Some(ParamValue::Integer(7)));
        assert_eq!(ParamType::Integer.coerce(&json!(" 42 ")), Some(ParamValue::Integer(42)));
        assert_eq!(ParamType::Integer.coerce(&json!(7.5)), None);
        assert_eq!(ParamType::Integer.coerce(&json!("abc")), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(ParamType::Number.coerce(&json!(0.7)), Some(ParamValue::Number(0.7)));
        assert_eq!(ParamType::Number.coerce(&json!("0.25")), Some(ParamValue::Number(0.25)));
        assert_eq!(ParamType::Number.coerce(&json!("NaN")), None);
    }

    #[test]
    fn test_coerce_object_from_string() {
        let coerced = ParamType::Object.coerce(&json!(r#"{"titulo": "Dune"}"#));
        assert_eq!(
            coerced,
            Some(ParamValue::Object(bag(json!({"titulo": "Dune"}))))
        );
        assert_eq!(ParamType::Object.coerce(&json!("[1, 2]")), None);
        assert_eq!(ParamType::Object.coerce(&json!(3)), None);
    }

    #[test]
    fn test_decode_reports_first_missing_required() {
        let specs = vec![
            ParameterSpec::required("model", "", ParamType::String),
            ParameterSpec::required("prompt", "", ParamType::String),
        ];
        let err = ToolArguments::decode(&specs, &bag(json!({"prompt": "hi"}))).unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(ref name) if name == "model"));

        let err = ToolArguments::decode(&specs, &bag(json!({"model": null, "prompt": "hi"})))
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(ref name) if name == "model"));
    }

    #[test]
    fn test_decode_unconvertible_required_is_missing() {
        let specs = vec![ParameterSpec::required("id", "", ParamType::Integer)];
        let err = ToolArguments::decode(&specs, &bag(json!({"id": "seven"}))).unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(ref name) if name == "id"));
    }

    #[test]
    fn test_decode_drops_unconvertible_optional() {
        let specs = vec![
            ParameterSpec::optional("temperature", "", ParamType::Number),
            ParameterSpec::optional("titulo", "", ParamType::String),
        ];
        let args = ToolArguments::decode(
            &specs,
            &bag(json!({"temperature": [1], "titulo": "Dune", "extra": 1})),
        )
        .unwrap();
        assert_eq!(args.optional_number("temperature"), None);
        assert_eq!(args.optional_text("titulo"), Some("Dune"));
        assert!(args.get("extra").is_none());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Book {
        titulo: String,
        autor: String,
    }

    #[test]
    fn test_object_shape_mismatch_is_missing() {
        let specs = vec![ParameterSpec::required("livro", "", ParamType::Object)];

        let args =
            ToolArguments::decode(&specs, &bag(json!({"livro": {"titulo": "Dune", "autor": "Herbert"}})))
                .unwrap();
        let book: Book = args.object("livro").unwrap();
        assert_eq!(book.autor, "Herbert");

        let args = ToolArguments::decode(&specs, &bag(json!({"livro": {"titulo": "Dune"}}))).unwrap();
        let err = args.object::<Book>("livro").unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(ref name) if name == "livro"));
    }

    #[test]
    fn test_with_schema_of_strips_metadata() {
        #[derive(JsonSchema)]
        #[allow(dead_code)]
        struct Sample {
            name: String,
        }

        let spec = ParameterSpec::required("sample", "", ParamType::Object).with_schema_of::<Sample>();
        let schema = spec.schema.unwrap();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("$schema").is_none());
        assert!(schema["properties"].get("name").is_some());
    }
}
