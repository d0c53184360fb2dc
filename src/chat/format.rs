use crate::ai::ProviderKind;

/// Reply framed for a Markdown renderer. The reply text itself is untouched.
pub fn render_markdown(
    provider: ProviderKind,
    model: &str,
    reply: &str,
    completion_tokens: Option<u64>,
) -> String {
    let tokens = completion_tokens.unwrap_or_else(|| estimate_tokens(reply));
    format!(
        "**Provider:** {} | **Model:** {}  \n**Tokens Used:** {}  \n\n**Assistant:**\n\n{}\n",
        provider.label(),
        model,
        tokens,
        reply
    )
}

/// Rough count used when the provider does not report usage.
pub fn estimate_tokens(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
