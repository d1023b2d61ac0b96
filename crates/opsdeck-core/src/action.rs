//! Named actions and the result objects they return.
//!
//! An action is the unit an outer dispatcher invokes by name with a JSON
//! object of arguments. Every invocation yields an [`ActionOutcome`]; expected
//! failures (unknown action, unknown target, bad input) are ordinary return
//! values rather than errors.

use crate::cancel::CancellationSignal;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Categorized failure reasons for action execution.
///
/// This enum provides structured error information instead of plain strings,
/// making it easier for callers to tell "unknown target" apart from
/// "the action ran and failed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureReason {
    /// Invalid or malformed input provided to the action
    InvalidInput {
        /// Description of what was invalid
        message: String,
    },
    /// Requested action, service, plan or resource does not exist
    NotFound {
        /// What was not found
        resource: String,
    },
    /// Network-related failure
    NetworkError {
        /// Description of the network issue
        message: String,
    },
    /// Timeout exceeded
    Timeout {
        /// What operation timed out
        operation: String,
    },
    /// Caller abandoned the invocation
    Cancelled {
        /// What was cancelled
        operation: String,
    },
    /// Internal error or unexpected state
    InternalError {
        /// Description of the internal error
        message: String,
    },
}

impl FailureReason {
    /// Shorthand for a [`FailureReason::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        FailureReason::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for a [`FailureReason::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FailureReason::InvalidInput {
            message: message.into(),
        }
    }

    /// Get a human-readable error message
    pub fn message(&self) -> String {
        match self {
            FailureReason::InvalidInput { message } => format!("Invalid input: {}", message),
            FailureReason::NotFound { resource } => format!("Not found: {}", resource),
            FailureReason::NetworkError { message } => format!("Network error: {}", message),
            FailureReason::Timeout { operation } => format!("Timeout: {}", operation),
            FailureReason::Cancelled { operation } => format!("Cancelled: {}", operation),
            FailureReason::InternalError { message } => format!("Internal error: {}", message),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The result of invoking an action.
///
/// Either a JSON payload specific to the action, or a structured failure.
/// Serializes as `{"status":"ok","output":...}` or
/// `{"status":"error","reason":{...}}` so that dispatch layers can forward it
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Action completed; `output` is its result object.
    #[serde(rename = "ok")]
    Success { output: Value },
    /// Action could not be carried out.
    #[serde(rename = "error")]
    Failure { reason: FailureReason },
}

impl ActionOutcome {
    /// Create a successful outcome.
    pub fn success(output: Value) -> Self {
        ActionOutcome::Success { output }
    }

    /// Serialize any result object into a successful outcome.
    ///
    /// Serialization of the plain data types used by opsdeck cannot fail in
    /// practice; if it does, the error is surfaced as an internal failure.
    pub fn from_serializable<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(output) => ActionOutcome::Success { output },
            Err(e) => ActionOutcome::failed(FailureReason::InternalError {
                message: format!("failed to serialize result: {}", e),
            }),
        }
    }

    /// Create a failed outcome with a structured reason.
    pub fn failed(reason: FailureReason) -> Self {
        ActionOutcome::Failure { reason }
    }

    /// Outcome returned for names no registry knows about.
    pub fn unknown_action(name: &str) -> Self {
        ActionOutcome::failed(FailureReason::not_found(format!("action '{}'", name)))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::Failure { .. })
    }

    /// Get the success output if available.
    pub fn output(&self) -> Option<&Value> {
        match self {
            ActionOutcome::Success { output } => Some(output),
            ActionOutcome::Failure { .. } => None,
        }
    }

    /// Get the failure reason if available.
    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            ActionOutcome::Success { .. } => None,
            ActionOutcome::Failure { reason } => Some(reason),
        }
    }
}

/// Arguments passed to an action: a JSON object keyed by argument name.
///
/// Accessors are lenient. A missing or mistyped argument reads as `None`, and
/// each action decides whether that means "use a default" or "not found".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionArgs(Map<String, Value>);

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build arguments from an arbitrary JSON value.
    ///
    /// Objects are taken as-is, `null` becomes an empty argument set, and any
    /// other value is rejected.
    pub fn from_value(value: Value) -> Result<Self, FailureReason> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(FailureReason::invalid_input(format!(
                "arguments must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Add an argument using the builder pattern.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String argument, `None` if absent or not a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// String argument, empty if absent.
    ///
    /// Used for required identifiers: an empty id flows into the component
    /// and comes back as a not-found result instead of an input error.
    pub fn str_or_empty(&self, key: &str) -> &str {
        self.str(key).unwrap_or_default()
    }

    /// Boolean argument. Accepts JSON booleans and the strings "true"/"false".
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ActionArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A request to invoke a named action with arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCall {
    /// Action name, e.g. `ops.service.restart`.
    pub name: String,
    /// Action arguments.
    #[serde(default)]
    pub arguments: ActionArgs,
}

impl ActionCall {
    pub fn new(name: impl Into<String>, arguments: ActionArgs) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Call an action without arguments.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, ActionArgs::new())
    }
}

/// Static metadata describing an action for discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

/// A named operation an outer dispatcher can invoke.
///
/// Implementations hold `Arc` handles to the components they drive and must
/// never panic on bad input; every expected failure is an
/// [`ActionOutcome::Failure`].
#[async_trait]
pub trait Action: Send + Sync {
    /// Unique name the action is registered under.
    fn name(&self) -> &str;

    /// Short human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// JSON schema of the accepted arguments, if the action publishes one.
    fn input_schema(&self) -> Option<Value> {
        None
    }

    /// Execute the action.
    ///
    /// `cancel` is triggered when the caller abandons the request; actions
    /// performing I/O should honor it, in-memory actions may ignore it.
    async fn invoke(&self, args: &ActionArgs, cancel: &CancellationSignal) -> ActionOutcome;

    /// Descriptor built from the metadata methods.
    fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}
