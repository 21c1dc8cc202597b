//! Typed tool registry
//!
//! Each tool is registered once at startup with a strongly typed parameter
//! struct. The registry derives the parameter schema from that struct,
//! deserializes the incoming params into it and only then invokes the handler.
//! Deserialization honours serde aliases; when it fails, absent required
//! parameters are named in the error.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = ToolRegistry::new("filesystem", env!("CARGO_PKG_VERSION"))
//!     .tool("read_file", "Read a file", move |params: ReadFileParams| {
//!         let sandbox = sandbox.clone();
//!         async move { handlers::read_file(&sandbox, params).await }
//!     });
//!
//! let result = registry.call("read_file", Some(json!({"path": "/tmp/a"}))).await?;
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{ProtocolError, ToolError, ToolResult};
use crate::protocol::PROTOCOL_VERSION;

type HandlerFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;
type Handler = Arc<dyn Fn(Value) -> Result<HandlerFuture, serde_json::Error> + Send + Sync>;

/// Parameters for tools that take none
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// One entry of a tool's parameter catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub required: bool,
}

/// A registered tool
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParamSpec>,
    pub input_schema: Value,
    handler: Handler,
}

impl ToolDefinition {
    /// Catalog view of this tool, as returned by `initialize` and `tools/list`
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters,
            "inputSchema": self.input_schema,
        })
    }

    fn required_params(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
    }

    /// Params must be an object; absent params count as an empty one
    fn validate(&self, params: Option<Value>) -> Result<Value, ProtocolError> {
        let params = match params {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(Value::Object(map)) => Value::Object(map),
            Some(other) => {
                return Err(ProtocolError::invalid_params(format!(
                    "params for `{}` must be an object, got {}",
                    self.name,
                    json_type_name(&other)
                )))
            }
        };

        Ok(params)
    }

    /// Error for params that failed to deserialize
    ///
    /// Only consulted after deserialization failed, so a parameter supplied
    /// under a serde alias is never reported as missing.
    fn rejection(&self, params: &Value, err: serde_json::Error) -> ProtocolError {
        let missing: Vec<&str> = self
            .required_params()
            .filter(|name| params.get(*name).is_none())
            .collect();
        if missing.is_empty() {
            ProtocolError::invalid_params(format!("invalid params for `{}`: {}", self.name, err))
        } else {
            ProtocolError::invalid_params(format!(
                "missing required parameter(s) for `{}`: {}",
                self.name,
                missing.join(", ")
            ))
        }
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Process-wide table of tools keyed by name
#[derive(Debug)]
pub struct ToolRegistry {
    name: String,
    version: String,
    instructions: Option<String>,
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            instructions: None,
            tools: Vec::new(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Register a tool with a typed parameter struct
    ///
    /// Panics if a tool with the same name is already registered.
    pub fn tool<P, F, Fut>(mut self, name: &str, description: &str, handler: F) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        assert!(self.get(name).is_none(), "tool `{}` registered twice", name);

        let input_schema = serde_json::to_value(schemars::schema_for!(P))
            .unwrap_or_else(|_| json!({ "type": "object" }));
        let parameters = param_specs(&input_schema);

        let handler: Handler = Arc::new(
            move |value: Value| -> Result<HandlerFuture, serde_json::Error> {
                let params = serde_json::from_value::<P>(value)?;
                Ok(Box::pin(handler(params)))
            },
        );

        self.tools.push(ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            input_schema,
            handler,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    /// `{"tools": [...]}` in registration order
    pub fn catalog(&self) -> Value {
        json!({
            "tools": self.tools.iter().map(ToolDefinition::describe).collect::<Vec<_>>(),
        })
    }

    /// Result of the reserved `initialize` method
    pub fn initialize_result(&self) -> Value {
        let mut result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.name,
                "version": self.version,
            },
            "capabilities": {
                "tools": {},
            },
            "tools": self.catalog()["tools"],
        });
        if let Some(instructions) = &self.instructions {
            result["instructions"] = Value::String(instructions.clone());
        }
        result
    }

    /// Invoke a tool in-process
    ///
    /// Expected tool failures come back as `Ok({"error": {...}})`. Unknown
    /// tools, bad parameters and unexpected I/O failures are protocol errors.
    pub async fn call(&self, name: &str, params: Option<Value>) -> Result<Value, ProtocolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ProtocolError::method_not_found(name))?;
        let params = tool.validate(params)?;
        let future = match (tool.handler)(params.clone()) {
            Ok(future) => future,
            Err(e) => {
                let err = tool.rejection(&params, e);
                tracing::warn!(tool = name, error = %err, "invalid parameters");
                return Err(err);
            }
        };

        tracing::debug!(tool = name, "dispatching");
        match future.await {
            Ok(value) => Ok(value),
            Err(err) if err.is_expected() => {
                tracing::warn!(tool = name, error = %err, "tool call rejected");
                Ok(err.to_payload())
            }
            Err(err @ ToolError::InvalidParameters(_)) => {
                tracing::warn!(tool = name, error = %err, "invalid parameters");
                Err(err.into())
            }
            Err(err) => {
                tracing::error!(tool = name, error = %err, "tool call failed");
                Err(err.into())
            }
        }
    }
}

/// A tool server that can hand over its registry to the transport
pub trait ToolServer {
    fn into_registry(self) -> ToolRegistry;
}

/// Flatten a derived JSON schema into `name -> {type, description, required}`
fn param_specs(schema: &Value) -> BTreeMap<String, ParamSpec> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return BTreeMap::new();
    };

    properties
        .iter()
        .map(|(name, prop)| {
            let spec = ParamSpec {
                kind: schema_type_name(prop),
                description: prop
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                required: required.contains(&name.as_str()),
            };
            (name.clone(), spec)
        })
        .collect()
}

fn schema_type_name(prop: &Value) -> String {
    match prop.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        // Option<T> comes out as ["T", "null"]
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|k| *k != "null")
            .unwrap_or("null")
            .to_string(),
        _ if prop.get("$ref").is_some() => "object".to_string(),
        _ => "any".to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accepts `true`/`false` as booleans or strings
pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got \"{}\"",
                other
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        #[schemars(description = "Text to echo")]
        text: String,
        #[serde(default, deserialize_with = "deserialize_lenient_bool")]
        shout: bool,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    struct AliasedParams {
        #[serde(alias = "script")]
        path: String,
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new("test", "0.0.0")
            .tool("echo", "Echo text back", |params: EchoParams| async move {
                let text = if params.shout {
                    params.text.to_uppercase()
                } else {
                    params.text
                };
                Ok(Value::String(text))
            })
            .tool("deny", "Always denied", |_: NoParams| async move {
                Err(ToolError::AccessDenied("/nope".to_string()))
            })
            .tool("explode", "Always fails", |_: NoParams| async move {
                Err(ToolError::IoFailure("disk gone".to_string()))
            })
    }

    #[tokio::test]
    async fn test_call_typed_handler() {
        let result = registry()
            .call("echo", Some(json!({"text": "hi", "shout": "true"})))
            .await
            .unwrap();
        assert_eq!(result, json!("HI"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = registry().call("nope", None).await.unwrap_err();
        assert_eq!(err.code, codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_required_param_rejected_before_handler() {
        let err = registry().call("echo", Some(json!({}))).await.unwrap_err();
        assert_eq!(err.code, codes::INVALID_PARAMS);
        assert!(err.message.contains("text"));
    }

    #[tokio::test]
    async fn test_param_accepted_under_serde_alias() {
        let registry = ToolRegistry::new("alias", "0.0.0").tool(
            "open",
            "Open a path",
            |params: AliasedParams| async move { Ok(Value::String(params.path)) },
        );

        let result = registry
            .call("open", Some(json!({"script": "/tmp/run.py"})))
            .await
            .unwrap();
        assert_eq!(result, json!("/tmp/run.py"));

        let err = registry.call("open", Some(json!({}))).await.unwrap_err();
        assert_eq!(err.code, codes::INVALID_PARAMS);
        assert!(err.message.contains("path"));
    }

    #[tokio::test]
    async fn test_wrong_param_type_rejected() {
        let err = registry()
            .call("echo", Some(json!({"text": 12})))
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::INVALID_PARAMS);

        let err = registry()
            .call("echo", Some(json!(["text"])))
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_expected_error_is_result_payload() {
        let result = registry().call("deny", None).await.unwrap();
        assert_eq!(result["error"]["code"], "AccessDenied");
    }

    #[tokio::test]
    async fn test_io_failure_is_protocol_error() {
        let err = registry().call("explode", None).await.unwrap_err();
        assert_eq!(err.code, codes::IO_FAILURE);
    }

    #[test]
    fn test_catalog_describes_parameters() {
        let registry = registry();
        let echo = registry.get("echo").unwrap();
        let text = &echo.parameters["text"];
        assert_eq!(text.kind, "string");
        assert_eq!(text.description, "Text to echo");
        assert!(text.required);
        assert!(!echo.parameters["shout"].required);

        let catalog = registry.catalog();
        let names: Vec<&str> = catalog["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["echo", "deny", "explode"]);
    }

    #[test]
    fn test_initialize_result() {
        let init = registry().initialize_result();
        assert_eq!(init["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(init["serverInfo"]["name"], "test");
        assert_eq!(init["tools"].as_array().unwrap().len(), 3);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let _ = ToolRegistry::new("dup", "0.0.0")
            .tool("a", "", |_: NoParams| async move { Ok(Value::Null) })
            .tool("a", "", |_: NoParams| async move { Ok(Value::Null) });
    }
}
