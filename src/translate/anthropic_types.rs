//! Type definitions for the [Anthropic Messages API](https://docs.anthropic.com/en/api/messages).
//!
//! Only the fields the gateway rewrites are typed; the rest ride along in
//! flattened maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::openai_types::{present, ChatMessage};

// ---------------------------------------------------------------------------
// Request types (what we send TO Anthropic)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicRequest {
    pub system: Value,
    pub messages: Vec<ChatMessage>,
    // model, max_tokens, temperature, ... copied from the inbound request
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Response types (what Anthropic sends back)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub usage: Option<Value>,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// A response content block. Non-text blocks (e.g. `tool_use`) have no `text`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
