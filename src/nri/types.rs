//! NRI v1 request and result documents.
//!
//! The runtime sends one [`Request`] per lifecycle event on the plugin's
//! stdin and expects one [`PluginResult`] back on stdout. Field names follow
//! the runtime's camelCase JSON; every field defaults when absent and
//! unknown fields are ignored, so newer runtimes can talk to this plugin.
//! The runtime encodes empty maps and lists as `null`, which also decodes
//! to the default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Decodes `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lifecycle event a request is sent for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum State {
    #[default]
    Create,
    Delete,
    Update,
    Pause,
    Resume,
    /// A state this plugin does not know about, kept verbatim.
    Other(String),
}

impl State {
    pub fn as_str(&self) -> &str {
        match self {
            State::Create => "create",
            State::Delete => "delete",
            State::Update => "update",
            State::Pause => "pause",
            State::Resume => "resume",
            State::Other(s) => s,
        }
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        match s.as_str() {
            "create" => State::Create,
            "delete" => State::Delete,
            "update" => State::Update,
            "pause" => State::Pause,
            "resume" => State::Resume,
            _ => State::Other(s),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subset of the OCI spec the runtime forwards to plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spec {
    /// Linux resources, passed through untouched.
    pub resources: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub cgroups_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub namespaces: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
}

/// One invocation event sent by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    /// Protocol version, echoed back in the result.
    pub version: String,
    /// Container (or sandbox) id.
    pub id: String,
    #[serde(rename = "sandboxID", skip_serializing_if = "Option::is_none")]
    pub sandbox_id: Option<String>,
    pub pid: i64,
    pub state: State,
    pub spec: Option<Spec>,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    /// Results of plugins that ran earlier in the chain.
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<PluginResult>,
    /// Plugin-specific configuration from the runtime's NRI config.
    pub conf: Value,
}

impl Request {
    /// Builds the result for this request on behalf of `plugin`.
    pub fn new_result(&self, plugin: &str) -> PluginResult {
        PluginResult {
            version: self.version.clone(),
            plugin: plugin.to_string(),
            metadata: HashMap::new(),
        }
    }

    /// Whether the request targets the pod sandbox itself.
    pub fn is_sandbox(&self) -> bool {
        self.sandbox_id.as_deref() == Some(self.id.as_str())
    }
}

/// What a plugin hands back for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginResult {
    pub version: String,
    /// Name of the plugin that produced this result.
    pub plugin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
}
