use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Mistral,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Mistral,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Mistral => "mistral",
        }
    }

    /// Human-facing name used in rendered replies.
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Mistral => "Mistral",
        }
    }

    pub fn credential_env(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Mistral => "MISTRAL_API_KEY",
        }
    }

    pub fn base_url_env(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_BASE_URL",
            ProviderKind::Anthropic => "ANTHROPIC_BASE_URL",
            ProviderKind::Mistral => "MISTRAL_BASE_URL",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Mistral => "https://api.mistral.ai/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "mistral" => Ok(ProviderKind::Mistral),
            _ => Err(LlmError::UnsupportedProvider(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// API key for one provider. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Surrounding whitespace, such as a trailing newline from a `.env`
    /// file, is stripped.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().trim().to_string())
    }

    /// Reads the provider's key variable. Empty values count as missing.
    pub fn from_env(kind: ProviderKind) -> Result<Self, LlmError> {
        Self::resolve(kind, |k| std::env::var(k).ok())
    }

    pub fn resolve<F>(kind: ProviderKind, lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = kind.credential_env();
        match lookup(var) {
            Some(v) if !v.trim().is_empty() => Ok(Self::new(v)),
            _ => Err(LlmError::MissingCredential(var)),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Knobs that only the Mistral endpoint understands.
#[derive(Clone, Debug, PartialEq)]
pub struct MistralOptions {
    pub min_tokens: Option<u32>,
    pub stop: Option<Vec<String>>,
    pub random_seed: Option<u64>,
    pub response_format: Option<serde_json::Value>,
    pub tools: Option<serde_json::Value>,
    pub tool_choice: String,
    pub safe_prompt: bool,
}

impl Default for MistralOptions {
    fn default() -> Self {
        Self {
            min_tokens: None,
            stop: None,
            random_seed: None,
            response_format: None,
            tools: None,
            tool_choice: "auto".to_string(),
            safe_prompt: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub mistral: MistralOptions,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1500,
            top_p: 0.9,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            mistral: MistralOptions::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub params: GenerationParams,
}

#[derive(Clone, Debug)]
pub struct ChatResponse {
    pub text: String,
    /// Completion token count as reported by the provider, if any.
    pub completion_tokens: Option<u64>,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("missing env {0}")]
    MissingCredential(&'static str),
    #[error("unsupported provider {0:?}, expected one of openai, anthropic, mistral")]
    UnsupportedProvider(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned {status}: {body}")]
    ProviderRequest { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ProviderRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError>;
}
