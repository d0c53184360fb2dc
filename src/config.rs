use crate::ai::{GenerationParams, LlmError, ProviderKind};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Everything needed to build a `ChatBot` except the credential.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub params: GenerationParams,
    pub system_prompt: Option<String>,
    /// Oldest turns are evicted beyond this many. `None` keeps everything.
    pub max_history_turns: Option<usize>,
    pub timeout: Duration,
    pub base_url: Option<String>,
    pub proxy: Option<String>,
}

impl ChatConfig {
    pub fn new(provider: &str, model: impl Into<String>) -> Result<Self, LlmError> {
        let provider = ProviderKind::from_str(provider)?;
        let model = model.into();
        if model.trim().is_empty() {
            return Err(LlmError::InvalidConfig("model must not be empty".into()));
        }
        Ok(Self {
            provider,
            model,
            params: GenerationParams::default(),
            system_prompt: None,
            max_history_turns: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: None,
            proxy: None,
        })
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.params.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.params.top_p = top_p;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_history_turns(mut self, cap: usize) -> Self {
        self.max_history_turns = Some(cap);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Reads `LLM_*` and `<PROVIDER>_BASE_URL` from the process environment.
    /// `model` overrides `LLM_MODEL` when given.
    pub fn from_env(model: Option<String>) -> Result<Self, LlmError> {
        Self::from_lookup(model, |k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(model: Option<String>, lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = get("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
        let model = model
            .or_else(|| get("LLM_MODEL"))
            .ok_or_else(|| LlmError::InvalidConfig("LLM_MODEL is not set".into()))?;
        let mut cfg = Self::new(&provider, model)?;

        if let Some(v) = parse_var::<f64, _>(&get, "LLM_TEMPERATURE")? {
            cfg.params.temperature = v;
        }
        if let Some(v) = parse_var::<u32, _>(&get, "LLM_MAX_TOKENS")? {
            cfg.params.max_tokens = v;
        }
        if let Some(v) = parse_var::<f64, _>(&get, "LLM_TOP_P")? {
            cfg.params.top_p = v;
        }
        if let Some(secs) = parse_var::<u64, _>(&get, "LLM_TIMEOUT_SECS")? {
            cfg.timeout = Duration::from_secs(secs);
        }
        cfg.max_history_turns = parse_var::<usize, _>(&get, "LLM_MAX_HISTORY_TURNS")?;
        cfg.system_prompt = get("LLM_SYSTEM_PROMPT");
        cfg.base_url = get(cfg.provider.base_url_env());
        cfg.proxy = get("LLM_PROXY");
        Ok(cfg)
    }

    pub(crate) fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::InvalidConfig("model must not be empty".into()));
        }
        if self.max_history_turns == Some(0) {
            return Err(LlmError::InvalidConfig(
                "max_history_turns must be at least 1".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(LlmError::InvalidConfig("timeout must be non-zero".into()));
        }
        Ok(())
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>, LlmError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| LlmError::InvalidConfig(format!("{key}={raw}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn new_applies_defaults() {
        let cfg = ChatConfig::new("openai", "m1").unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAi);
        assert_eq!(cfg.params, GenerationParams::default());
        assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.max_history_turns, None);
    }

    #[test]
    fn new_rejects_unknown_provider_and_empty_model() {
        assert!(matches!(
            ChatConfig::new("cohere", "m1"),
            Err(LlmError::UnsupportedProvider(_))
        ));
        assert!(matches!(
            ChatConfig::new("openai", "  "),
            Err(LlmError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_setters() {
        let cfg = ChatConfig::new("mistral", "m")
            .unwrap()
            .temperature(0.1)
            .max_tokens(64)
            .top_p(0.5)
            .system_prompt("sys")
            .max_history_turns(4);
        assert_eq!(cfg.params.temperature, 0.1);
        assert_eq!(cfg.params.max_tokens, 64);
        assert_eq!(cfg.params.top_p, 0.5);
        assert_eq!(cfg.system_prompt.as_deref(), Some("sys"));
        assert_eq!(cfg.max_history_turns, Some(4));
    }

    #[test]
    fn from_lookup_reads_all_knobs() {
        let cfg = ChatConfig::from_lookup(
            None,
            lookup(&[
                ("LLM_PROVIDER", "Anthropic"),
                ("LLM_MODEL", "claude-x"),
                ("LLM_TEMPERATURE", "0.2"),
                ("LLM_MAX_TOKENS", "256"),
                ("LLM_TOP_P", "1"),
                ("LLM_TIMEOUT_SECS", "30"),
                ("LLM_MAX_HISTORY_TURNS", "10"),
                ("LLM_SYSTEM_PROMPT", "be brief"),
                ("ANTHROPIC_BASE_URL", "http://localhost:1/v1"),
                ("OPENAI_BASE_URL", "http://ignored"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.provider, ProviderKind::Anthropic);
        assert_eq!(cfg.model, "claude-x");
        assert_eq!(cfg.params.temperature, 0.2);
        assert_eq!(cfg.params.max_tokens, 256);
        assert_eq!(cfg.params.top_p, 1.0);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_history_turns, Some(10));
        assert_eq!(cfg.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:1/v1"));
    }

    #[test]
    fn from_lookup_defaults_to_openai_and_prefers_explicit_model() {
        let cfg =
            ChatConfig::from_lookup(Some("gpt-x".into()), lookup(&[("LLM_MODEL", "other")]))
                .unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAi);
        assert_eq!(cfg.model, "gpt-x");
    }

    #[test]
    fn from_lookup_requires_model() {
        let err = ChatConfig::from_lookup(None, lookup(&[])).unwrap_err();
        assert!(matches!(err, LlmError::InvalidConfig(_)));
    }

    #[test]
    fn from_lookup_reports_bad_numbers() {
        let err = ChatConfig::from_lookup(
            None,
            lookup(&[("LLM_MODEL", "m"), ("LLM_MAX_TOKENS", "lots")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("LLM_MAX_TOKENS=lots"));
    }

    #[test]
    fn validate_rejects_zero_cap() {
        let cfg = ChatConfig::new("openai", "m").unwrap().max_history_turns(0);
        assert!(cfg.validate().is_err());
    }
}
