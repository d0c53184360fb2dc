use crate::ai::types::{ChatRequest, ChatResponse, Credential, LlmError, ProviderKind};
use crate::ai::{turns_json, usage_tokens, WireFormat};
use serde_json::Value;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone, Copy, Debug, Default)]
pub struct AnthropicWire;

impl WireFormat for AnthropicWire {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn path(&self) -> &'static str {
        "/messages"
    }

    fn auth_headers(&self, credential: &Credential) -> Vec<(&'static str, String)> {
        vec![
            ("x-api-key", credential.expose().to_string()),
            ("anthropic-version", ANTHROPIC_VERSION.to_string()),
        ]
    }

    fn build_request(&self, req: &ChatRequest) -> Value {
        let p = &req.params;
        let mut body = serde_json::json!({
            "model": req.model,
            "temperature": p.temperature,
            "max_tokens": p.max_tokens,
            "top_p": p.top_p,
            "messages": turns_json(None, &req.turns)
        });
        // system prompt is a top-level field here, not a message
        if let Some(system) = &req.system {
            body["system"] = Value::String(system.clone());
        }
        body
    }

    fn parse_response(&self, body: &Value) -> Result<ChatResponse, LlmError> {
        let text = body
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|b| b.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                LlmError::MalformedResponse(format!("missing content[0].text, raw={body}"))
            })?;
        Ok(ChatResponse {
            text: text.to_string(),
            completion_tokens: usage_tokens(body, "output_tokens"),
        })
    }
}
