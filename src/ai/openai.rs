use crate::ai::types::{ChatRequest, ChatResponse, Credential, LlmError, ProviderKind};
use crate::ai::{first_choice_text, turns_json, usage_tokens, WireFormat};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default)]
pub struct OpenAiWire;

impl WireFormat for OpenAiWire {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn path(&self) -> &'static str {
        "/chat/completions"
    }

    fn auth_headers(&self, credential: &Credential) -> Vec<(&'static str, String)> {
        vec![("Authorization", format!("Bearer {}", credential.expose()))]
    }

    fn build_request(&self, req: &ChatRequest) -> Value {
        let p = &req.params;
        serde_json::json!({
            "model": req.model,
            "messages": turns_json(req.system.as_deref(), &req.turns),
            "temperature": p.temperature,
            "max_tokens": p.max_tokens,
            "top_p": p.top_p,
            "frequency_penalty": p.frequency_penalty,
            "presence_penalty": p.presence_penalty
        })
    }

    fn parse_response(&self, body: &Value) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse {
            text: first_choice_text(body)?,
            completion_tokens: usage_tokens(body, "completion_tokens"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::{GenerationParams, Turn};
    use serde_json::json;

    fn request() -> ChatRequest {
        ChatRequest {
            model: "m1".into(),
            system: None,
            turns: vec![Turn::user("hi"), Turn::assistant("hello"), Turn::user("again")],
            params: GenerationParams::default(),
        }
    }

    #[test]
    fn bearer_auth_header() {
        let h = OpenAiWire.auth_headers(&Credential::new("k1"));
        assert_eq!(h, vec![("Authorization", "Bearer k1".to_string())]);
    }

    #[test]
    fn payload_carries_full_history_and_params() {
        let body = OpenAiWire.build_request(&request());
        assert_eq!(body["model"], "m1");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][2], json!({"role": "user", "content": "again"}));
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["frequency_penalty"], 0.0);
        assert_eq!(body["presence_penalty"], 0.0);
        assert!(body.get("stream").is_none());
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["top_p"], 0.9);
    }

    #[test]
    fn float_params_keep_their_decimal_text() {
        let text = serde_json::to_string(&OpenAiWire.build_request(&request())).unwrap();
        assert!(text.contains("\"temperature\":0.7,"), "{text}");
        assert!(text.contains("\"top_p\":0.9"), "{text}");
        assert!(!text.contains("0.699"), "{text}");
        assert!(!text.contains("0.899"), "{text}");
    }

    #[test]
    fn system_prompt_becomes_first_message() {
        let mut req = request();
        req.system = Some("terse".into());
        let body = OpenAiWire.build_request(&req);
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "terse"}));
        assert_eq!(body["messages"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn parses_reply_and_usage() {
        let body = json!({
            "choices": [{"message": {"content": "hello"}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 12}
        });
        let r = OpenAiWire.parse_response(&body).unwrap();
        assert_eq!(r.text, "hello");
        assert_eq!(r.completion_tokens, Some(12));
    }

    #[test]
    fn usage_is_optional() {
        let body = json!({"choices": [{"message": {"content": "hello"}}]});
        let r = OpenAiWire.parse_response(&body).unwrap();
        assert_eq!(r.completion_tokens, None);
    }
}
