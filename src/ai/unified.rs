use crate::ai::types::{ChatRequest, ChatResponse, Credential, LlmError, LlmProvider, ProviderKind};
use crate::ai::{AnthropicWire, HttpProvider, MistralWire, OpenAiWire};
use async_trait::async_trait;
use std::time::Duration;

pub enum InnerProvider {
    OpenAi(HttpProvider<OpenAiWire>),
    Anthropic(HttpProvider<AnthropicWire>),
    Mistral(HttpProvider<MistralWire>),
}

/// HTTP provider for whichever API was selected, chosen once at construction.
pub struct AnyProvider {
    inner: InnerProvider,
}

impl AnyProvider {
    pub fn connect(
        kind: ProviderKind,
        credential: Credential,
        base_url: Option<String>,
        timeout: Duration,
        proxy: Option<&str>,
    ) -> Result<Self, LlmError> {
        let inner = match kind {
            ProviderKind::OpenAi => InnerProvider::OpenAi(HttpProvider::new(
                OpenAiWire, credential, base_url, timeout, proxy,
            )?),
            ProviderKind::Anthropic => InnerProvider::Anthropic(HttpProvider::new(
                AnthropicWire,
                credential,
                base_url,
                timeout,
                proxy,
            )?),
            ProviderKind::Mistral => InnerProvider::Mistral(HttpProvider::new(
                MistralWire, credential, base_url, timeout, proxy,
            )?),
        };
        Ok(Self { inner })
    }

    pub fn endpoint(&self) -> String {
        match &self.inner {
            InnerProvider::OpenAi(p) => p.endpoint(),
            InnerProvider::Anthropic(p) => p.endpoint(),
            InnerProvider::Mistral(p) => p.endpoint(),
        }
    }
}

#[async_trait]
impl LlmProvider for AnyProvider {
    fn kind(&self) -> ProviderKind {
        match &self.inner {
            InnerProvider::OpenAi(p) => p.kind(),
            InnerProvider::Anthropic(p) => p.kind(),
            InnerProvider::Mistral(p) => p.kind(),
        }
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        match &self.inner {
            InnerProvider::OpenAi(p) => p.chat(req).await,
            InnerProvider::Anthropic(p) => p.chat(req).await,
            InnerProvider::Mistral(p) => p.chat(req).await,
        }
    }
}
