use crate::ai::types::{ChatRequest, ChatResponse, Credential, LlmError, ProviderKind};
use crate::ai::{first_choice_text, turns_json, usage_tokens, WireFormat};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default)]
pub struct MistralWire;

impl WireFormat for MistralWire {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mistral
    }

    fn path(&self) -> &'static str {
        "/chat/completions"
    }

    fn auth_headers(&self, credential: &Credential) -> Vec<(&'static str, String)> {
        vec![("Authorization", format!("Bearer {}", credential.expose()))]
    }

    fn build_request(&self, req: &ChatRequest) -> Value {
        let p = &req.params;
        let m = &p.mistral;
        let mut body = serde_json::json!({
            "model": req.model,
            "messages": turns_json(req.system.as_deref(), &req.turns),
            "temperature": p.temperature,
            "top_p": p.top_p,
            "max_tokens": p.max_tokens,
            "stream": false,
            "tool_choice": m.tool_choice,
            "safe_prompt": m.safe_prompt
        });
        if let Some(n) = m.min_tokens {
            body["min_tokens"] = n.into();
        }
        if let Some(stop) = &m.stop {
            body["stop"] = serde_json::json!(stop);
        }
        if let Some(seed) = m.random_seed {
            body["random_seed"] = seed.into();
        }
        if let Some(fmt) = &m.response_format {
            body["response_format"] = fmt.clone();
        }
        if let Some(tools) = &m.tools {
            body["tools"] = tools.clone();
        }
        body
    }

    fn parse_response(&self, body: &Value) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse {
            text: first_choice_text(body)?,
            completion_tokens: usage_tokens(body, "completion_tokens"),
        })
    }
}
