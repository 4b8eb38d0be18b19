//! Translate canonical (OpenAI) chat requests into each backend's payload.
//!
//! Azure takes the canonical shape as-is. Anthropic wants the system prompt
//! lifted out of `messages` into a top-level `system` field; everything else
//! is forwarded unchanged.

use serde_json::Value;

use super::anthropic_types::AnthropicRequest;
use super::openai_types::{ChatCompletionRequest, ChatMessage};

/// Azure payload: a shallow copy of the canonical request.
pub fn openai_to_azure(req: &ChatCompletionRequest) -> ChatCompletionRequest {
    req.clone()
}

/// Anthropic payload: every canonical field, with `system` and `messages`
/// overridden.
///
/// If several system messages are present the last one wins and all of them
/// are removed from `messages`. A missing or `null` system content becomes `""`.
/// A request without `messages` is sent with an empty list.
pub fn openai_to_anthropic(req: &ChatCompletionRequest) -> AnthropicRequest {
    let (system, messages) = split_system(req.messages.as_deref().unwrap_or_default());

    let mut rest = req.extra.clone();
    // Overridden fields must not also appear in the flattened map.
    rest.remove("system");
    if let Some(ref model) = req.model {
        rest.insert("model".to_string(), Value::String(model.clone()));
    }

    AnthropicRequest {
        system: system.unwrap_or_else(|| Value::String(String::new())),
        messages,
        rest,
    }
}

fn split_system(messages: &[ChatMessage]) -> (Option<Value>, Vec<ChatMessage>) {
    let mut system = None;
    let mut rest = Vec::with_capacity(messages.len());

    for msg in messages {
        if msg.is_system() {
            system = msg.content().cloned();
        } else {
            rest.push(msg.clone());
        }
    }

    let system = system.filter(|content| !is_falsy(content));
    (system, rest)
}

fn is_falsy(content: &Value) -> bool {
    match content {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn request(messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        let mut extra = Map::new();
        extra.insert("max_tokens".to_string(), json!(256));
        extra.insert("temperature".to_string(), json!(0.2));
        ChatCompletionRequest {
            model: Some("claude-3-5-sonnet-20241022".to_string()),
            messages: Some(messages),
            extra,
        }
    }

    #[test]
    fn test_system_lifted_out_of_messages() {
        let req = request(vec![
            ChatMessage::new("user", "one"),
            ChatMessage::new("system", "be terse"),
            ChatMessage::new("assistant", "two"),
            ChatMessage::new("user", "three"),
        ]);

        let result = openai_to_anthropic(&req);

        assert_eq!(result.system, json!("be terse"));
        let contents: Vec<&Value> = result.messages.iter().filter_map(|m| m.content()).collect();
        assert_eq!(contents, vec![&json!("one"), &json!("two"), &json!("three")]);
        assert!(result.messages.iter().all(|m| !m.is_system()));
    }

    #[test]
    fn test_missing_system_becomes_empty_string() {
        let req = request(vec![ChatMessage::new("user", "hi")]);
        let result = openai_to_anthropic(&req);
        assert_eq!(result.system, json!(""));
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn test_last_system_message_wins() {
        let req = request(vec![
            ChatMessage::new("system", "first"),
            ChatMessage::new("user", "hi"),
            ChatMessage::new("system", "second"),
        ]);

        let result = openai_to_anthropic(&req);

        assert_eq!(result.system, json!("second"));
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_null_system_content_becomes_empty_string() {
        let mut system = ChatMessage::new("system", "");
        system.extra.insert("content".to_string(), Value::Null);
        let req = request(vec![system, ChatMessage::new("user", "hi")]);

        assert_eq!(openai_to_anthropic(&req).system, json!(""));
    }

    #[test]
    fn test_system_without_content_becomes_empty_string() {
        let mut system = ChatMessage::new("system", "");
        system.extra.remove("content");
        let req = request(vec![system, ChatMessage::new("user", "hi")]);

        let result = openai_to_anthropic(&req);
        assert_eq!(result.system, json!(""));
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn test_missing_messages_sent_as_empty_list() {
        let mut req = request(vec![]);
        req.messages = None;

        let value = serde_json::to_value(openai_to_anthropic(&req)).unwrap();
        assert_eq!(value["messages"], json!([]));
        assert_eq!(value["system"], "");
    }

    #[test]
    fn test_pass_through_fields_forwarded() {
        let mut req = request(vec![ChatMessage::new("user", "hi")]);
        req.extra.insert("metadata".to_string(), json!({"user_id": "u-1"}));
        req.extra.insert("system".to_string(), json!("stale top-level system"));

        let value = serde_json::to_value(openai_to_anthropic(&req)).unwrap();

        assert_eq!(value["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(value["max_tokens"], 256);
        assert_eq!(value["temperature"], 0.2);
        assert_eq!(value["metadata"]["user_id"], "u-1");
        assert_eq!(value["system"], "");
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_multi_part_content_forwarded_verbatim() {
        let parts = json!([
            {"type": "text", "text": "look at this"},
            {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}}
        ]);
        let mut msg = ChatMessage::new("user", "");
        msg.extra.insert("content".to_string(), parts.clone());
        msg.extra.insert("name".to_string(), json!("alice"));
        let req = request(vec![msg]);

        let result = openai_to_anthropic(&req);
        assert_eq!(result.messages[0].content(), Some(&parts));
        assert_eq!(result.messages[0].extra["name"], "alice");
    }

    #[test]
    fn test_azure_payload_is_unchanged() {
        let raw = json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "hi"}
            ],
            "temperature": 0.7,
            "n": 2,
            "response_format": {"type": "json_object"}
        });
        let req: ChatCompletionRequest = serde_json::from_value(raw.clone()).unwrap();

        let payload = serde_json::to_value(openai_to_azure(&req)).unwrap();
        assert_eq!(payload, raw);
    }

    #[test]
    fn test_azure_payload_without_model_is_unchanged() {
        let raw = json!({"messages": [{"role": "user", "content": "hi"}], "max_tokens": 5});
        let req: ChatCompletionRequest = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(openai_to_azure(&req)).unwrap(), raw);
    }

    #[test]
    fn test_azure_message_without_content_gains_no_null() {
        let raw = json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "user", "content": "weather?"},
                {
                    "role": "assistant",
                    "tool_calls": [{"id": "call_1", "type": "function", "function": {"name": "w", "arguments": "{}"}}]
                },
                {"role": "tool", "tool_call_id": "call_1", "content": "sunny"}
            ]
        });
        let req: ChatCompletionRequest = serde_json::from_value(raw.clone()).unwrap();

        let payload = serde_json::to_value(openai_to_azure(&req)).unwrap();
        assert_eq!(payload, raw);
        assert!(payload["messages"][1].get("content").is_none());
    }
}
