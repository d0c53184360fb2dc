use crate::ai::types::{ChatRequest, ChatResponse, Credential, LlmError, LlmProvider, ProviderKind};
use crate::ai::{build_llm_http_client, WireFormat};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

/// Sends one chat request per call over HTTPS using a provider's wire format.
pub struct HttpProvider<W: WireFormat> {
    client: reqwest::Client,
    credential: Credential,
    base_url: String,
    wire: W,
}

impl<W: WireFormat> HttpProvider<W> {
    pub fn new(
        wire: W,
        credential: Credential,
        base_url: Option<String>,
        timeout: Duration,
        proxy: Option<&str>,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.unwrap_or_else(|| wire.kind().default_base_url().to_string());
        Ok(Self {
            client: build_llm_http_client(timeout, proxy)?,
            credential,
            base_url,
            wire,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.wire.path())
    }
}

#[async_trait]
impl<W: WireFormat> LlmProvider for HttpProvider<W> {
    fn kind(&self) -> ProviderKind {
        self.wire.kind()
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = self.endpoint();
        let body = self.wire.build_request(&req);
        debug!(
            "{} POST {} model={} turns={}",
            self.wire.kind(),
            url,
            req.model,
            req.turns.len()
        );

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        for (name, value) in self.wire.auth_headers(&self.credential) {
            builder = builder.header(name, value);
        }

        let resp = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            warn!("{} returned {}", self.wire.kind(), status.as_u16());
            return Err(LlmError::ProviderRequest {
                status: status.as_u16(),
                body: raw,
            });
        }

        let v: Value = serde_json::from_str(&raw)
            .map_err(|e| LlmError::MalformedResponse(format!("json parse failed: {e}, raw={raw}")))?;
        self.wire.parse_response(&v)
    }
}
