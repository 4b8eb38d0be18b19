//! Translate backend success responses into the canonical (OpenAI) response.
//!
//! Absent backend fields stay absent in the output. Anthropic responses are
//! folded into a single assistant choice.

use serde_json::json;

use super::anthropic_types::AnthropicResponse;
use super::openai_types::{AzureChatResponse, ChatCompletionResponse, Choice};

/// Translate an Azure OpenAI response into the canonical response. Azure is
/// already canonical, so every field is copied and choice order is kept.
pub fn azure_to_openai(resp: AzureChatResponse) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: resp.id,
        object: resp.object,
        created: resp.created,
        model: resp.model,
        usage: resp.usage,
        choices: resp
            .choices
            .into_iter()
            .map(|c| Choice {
                message: c.message,
                finish_reason: c.finish_reason,
                index: c.index,
            })
            .collect(),
    }
}

/// Translate an Anthropic Messages response into the canonical response.
/// Anthropic has no creation time, so the caller supplies `created_ms`.
/// Text blocks are joined with `\n`; blocks without text contribute "".
pub fn anthropic_to_openai(resp: AnthropicResponse, created_ms: i64) -> ChatCompletionResponse {
    let content = resp
        .content
        .iter()
        .map(|block| block.text.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");

    ChatCompletionResponse {
        id: resp.id,
        object: resp.response_type,
        created: Some(created_ms),
        model: resp.model,
        usage: resp.usage,
        choices: vec![Choice {
            message: Some(json!({
                "role": "assistant",
                "content": content,
            })),
            finish_reason: resp.stop_reason,
            index: 0,
        }],
    }
}
