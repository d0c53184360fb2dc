pub mod anthropic;
pub mod http;
pub mod mistral;
pub mod openai;
pub mod types;
pub mod unified;

pub use anthropic::AnthropicWire;
pub use http::HttpProvider;
pub use mistral::MistralWire;
pub use openai::OpenAiWire;
pub use types::{
    ChatRequest, ChatResponse, Credential, GenerationParams, LlmError, LlmProvider,
    MistralOptions, ProviderKind, Role, Turn,
};
pub use unified::AnyProvider;

use serde_json::Value;
use std::time::Duration;

/// Per-provider request/response mapping. Each implementation owns the
/// endpoint path, auth headers, payload shape and reply path of one API.
pub trait WireFormat: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn path(&self) -> &'static str;

    fn auth_headers(&self, credential: &Credential) -> Vec<(&'static str, String)>;

    fn build_request(&self, req: &ChatRequest) -> Value;

    fn parse_response(&self, body: &Value) -> Result<ChatResponse, LlmError>;
}

pub(crate) fn build_llm_http_client(
    timeout: Duration,
    proxy: Option<&str>,
) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)));

    if let Some(raw) = proxy {
        let t = raw.trim();
        if !t.is_empty() {
            let url = if t.contains("://") {
                t.to_string()
            } else {
                format!("socks5h://{}", t)
            };
            let proxy = reqwest::Proxy::all(&url)
                .map_err(|e| LlmError::InvalidConfig(format!("LLM_PROXY: {e}")))?;
            builder = builder.proxy(proxy);
        }
    }

    builder.build().map_err(|e| LlmError::Transport(e.to_string()))
}

/// Text of a message `content` field: either a plain string or an array of
/// parts carrying `text`, joined by newlines.
pub(crate) fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(arr) => {
            let mut parts = Vec::new();
            for it in arr {
                if let Some(t) = it.get("text").and_then(|x| x.as_str()) {
                    parts.push(t.to_string());
                } else if let Some(t) = it.as_str() {
                    parts.push(t.to_string());
                }
            }
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("\n"))
            }
        }
        _ => None,
    }
}

/// `choices[0].message.content`, shared by the OpenAI-style APIs.
pub(crate) fn first_choice_text(body: &Value) -> Result<String, LlmError> {
    let choice0 = body
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| LlmError::MalformedResponse(format!("missing choices[0], raw={body}")))?;
    let content = choice0
        .get("message")
        .and_then(|m| m.get("content"))
        .ok_or_else(|| {
            LlmError::MalformedResponse(format!("missing choices[0].message.content, raw={body}"))
        })?;
    content_text(content).ok_or_else(|| {
        LlmError::MalformedResponse(format!("unexpected message.content type, raw={body}"))
    })
}

pub(crate) fn usage_tokens(body: &Value, field: &str) -> Option<u64> {
    body.get("usage")
        .and_then(|u| u.get(field))
        .and_then(|n| n.as_u64())
}

pub(crate) fn turns_json(system: Option<&str>, turns: &[Turn]) -> Vec<Value> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    if let Some(system) = system {
        messages.push(serde_json::json!({"role": "system", "content": system}));
    }
    messages.extend(
        turns
            .iter()
            .map(|t| serde_json::json!({"role": t.role, "content": t.content})),
    );
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_text_joins_parts() {
        let v = json!([{"type": "text", "text": "a"}, "b", {"type": "image"}]);
        assert_eq!(content_text(&v).as_deref(), Some("a\nb"));
    }

    #[test]
    fn content_text_rejects_non_text() {
        assert_eq!(content_text(&json!(42)), None);
        assert_eq!(content_text(&json!([])), None);
        assert_eq!(content_text(&json!(null)), None);
    }

    #[test]
    fn first_choice_ignores_unrelated_fields() {
        let body = json!({
            "id": "x",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hello"}, "logprobs": null}],
            "system_fingerprint": "fp"
        });
        assert_eq!(first_choice_text(&body).unwrap(), "hello");
    }

    #[test]
    fn first_choice_missing_is_malformed() {
        let err = first_choice_text(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
        let err = first_choice_text(&json!({"choices": [{"message": {}}]})).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[test]
    fn turns_json_prepends_system() {
        let turns = vec![Turn::user("hi"), Turn::assistant("hey")];
        let msgs = turns_json(Some("be brief"), &turns);
        assert_eq!(
            msgs,
            vec![
                json!({"role": "system", "content": "be brief"}),
                json!({"role": "user", "content": "hi"}),
                json!({"role": "assistant", "content": "hey"}),
            ]
        );
        assert_eq!(turns_json(None, &turns).len(), 2);
    }

    #[test]
    fn proxy_without_scheme_is_accepted() {
        assert!(build_llm_http_client(Duration::from_secs(5), Some("127.0.0.1:1080")).is_ok());
        assert!(build_llm_http_client(Duration::from_secs(5), Some("  ")).is_ok());
    }
}
