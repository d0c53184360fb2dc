use crate::ai::{
    AnyProvider, ChatRequest, ChatResponse, Credential, GenerationParams, LlmError, LlmProvider,
    ProviderKind, Role, Turn,
};
use crate::chat::format::render_markdown;
use crate::config::ChatConfig;
use log::{debug, info, warn};
use std::time::Instant;

/// A conversation with one provider and model.
///
/// The bot exclusively owns its history. `get_response` takes `&mut self`, so
/// calls on one instance are serialized and each exchange (append, request,
/// append) runs as a single unit.
pub struct ChatBot {
    provider: Box<dyn LlmProvider>,
    model: String,
    params: GenerationParams,
    system_prompt: Option<String>,
    max_history_turns: Option<usize>,
    history: Vec<Turn>,
}

impl ChatBot {
    pub fn new(config: ChatConfig, credential: Credential) -> Result<Self, LlmError> {
        config.validate()?;
        let provider = AnyProvider::connect(
            config.provider,
            credential,
            config.base_url.clone(),
            config.timeout,
            config.proxy.as_deref(),
        )?;
        info!(
            "chatbot ready: provider={} model={} endpoint={}",
            config.provider,
            config.model,
            provider.endpoint()
        );
        Self::with_provider(config, Box::new(provider))
    }

    /// Resolves the credential from the provider's key variable.
    pub fn from_env(config: ChatConfig) -> Result<Self, LlmError> {
        let credential = Credential::from_env(config.provider)?;
        Self::new(config, credential)
    }

    /// Builds a bot over any transport. The transport must speak the
    /// configured provider's API.
    pub fn with_provider(
        config: ChatConfig,
        provider: Box<dyn LlmProvider>,
    ) -> Result<Self, LlmError> {
        config.validate()?;
        if provider.kind() != config.provider {
            return Err(LlmError::InvalidConfig(format!(
                "transport speaks {} but config selects {}",
                provider.kind(),
                config.provider
            )));
        }
        Ok(Self {
            provider,
            model: config.model,
            params: config.params,
            system_prompt: config.system_prompt,
            max_history_turns: config.max_history_turns,
            history: Vec::new(),
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Sends `user_text` with the whole history and returns the reply text.
    ///
    /// The user turn stays recorded even when the call fails.
    pub async fn get_response(&mut self, user_text: &str) -> Result<String, LlmError> {
        self.exchange(user_text).await.map(|r| r.text)
    }

    /// Same as [`get_response`](Self::get_response) but framed for Markdown
    /// display with provider, model and token usage.
    pub async fn get_markdown_response(&mut self, user_text: &str) -> Result<String, LlmError> {
        let resp = self.exchange(user_text).await?;
        Ok(render_markdown(
            self.provider.kind(),
            &self.model,
            &resp.text,
            resp.completion_tokens,
        ))
    }

    async fn exchange(&mut self, user_text: &str) -> Result<ChatResponse, LlmError> {
        self.push(Turn::user(user_text));

        let req = ChatRequest {
            model: self.model.clone(),
            system: self.system_prompt.clone(),
            turns: self.history.clone(),
            params: self.params.clone(),
        };

        let started = Instant::now();
        let resp = match self.provider.chat(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    "{} call failed after {} ms: {}",
                    self.provider.kind(),
                    started.elapsed().as_millis(),
                    e
                );
                return Err(e);
            }
        };
        info!(
            "{} replied in {} ms ({} chars)",
            self.provider.kind(),
            started.elapsed().as_millis(),
            resp.text.len()
        );

        self.push(Turn::assistant(resp.text.clone()));
        Ok(resp)
    }

    fn push(&mut self, turn: Turn) {
        self.history.push(turn);
        let Some(cap) = self.max_history_turns else {
            return;
        };
        if self.history.len() <= cap {
            return;
        }
        let mut evict = self.history.len() - cap;
        // keep the window starting on a user turn when one remains
        while evict < self.history.len() - 1 && self.history[evict].role == Role::Assistant {
            evict += 1;
        }
        self.history.drain(..evict);
        debug!("evicted {} turns, {} kept", evict, self.history.len());
    }
}
