//! Type definitions for the [OpenAI Chat Completions API](https://platform.openai.com/docs/api-reference/chat).
//!
//! This is the canonical shape the gateway exposes. Azure OpenAI speaks the
//! same shape natively, so its request payload and response reuse these types.
//! Nothing is required: a field that is absent on the way in stays absent on
//! the way out, and fields the gateway does not interpret are carried in
//! flattened maps so they survive translation untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Request types (what clients send TO us)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Azure picks the deployment from the URL, so this may be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
    // temperature, max_tokens, stop, tools, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    // content, name, tool_calls, tool_call_id, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("content".to_string(), Value::String(content.into()));
        Self {
            role: Some(role.into()),
            extra,
        }
    }

    /// Usually a string; multi-part arrays and `null` are kept as-is.
    pub fn content(&self) -> Option<&Value> {
        self.extra.get("content")
    }

    pub fn is_system(&self) -> bool {
        self.role.as_deref() == Some("system")
    }
}

// ---------------------------------------------------------------------------
// Response types (Azure's native response, and what we send back)
// ---------------------------------------------------------------------------

/// Keeps an explicit `null` as `Some(Value::Null)` so only truly absent
/// fields are skipped on output.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Azure OpenAI's success body. Only `choices` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub usage: Option<Value>,
    pub choices: Vec<AzureChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureChoice {
    #[serde(default, deserialize_with = "present")]
    pub message: Option<Value>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Epoch seconds when the backend supplies it, epoch milliseconds when the
    /// gateway stamps it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    pub finish_reason: Option<String>,
    pub index: u32,
}
