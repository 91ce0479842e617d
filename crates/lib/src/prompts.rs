//! # Prompt Templates
//!
//! The default grounding prompt and the helpers that turn similarity
//! search results into the `{context}` block it expects.

use crate::types::MatchDocumentResult;

/// The default system prompt for retrieval-augmented answers.
///
/// It instructs the model to answer strictly from the supplied context
/// and to decline when the context is insufficient. Callers may supply
/// their own template; any template must contain a `{context}`
/// placeholder.
pub const DEFAULT_RAG_SYSTEM_PROMPT: &str = r#"You are a professional and helpful AI knowledge assistant.
Your task is to answer user queries using ONLY the provided context below.
If the answer is not contained within the context, politely state that you do not have enough information to answer.
STRICTLY avoid hallucinations and outside knowledge.

Context:
{context}"#;

/// Renders search matches into the context block fed to the chat model.
///
/// Each match becomes `[i] Source: <source>\nContent: <content>` with a
/// 1-based index, joined by blank lines, preserving the search order
/// (descending similarity). A missing source renders as "Unknown".
/// An empty match list yields an empty string.
pub fn build_context(matches: &[MatchDocumentResult]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "[{}] Source: {}\nContent: {}",
                i + 1,
                m.source.as_deref().unwrap_or("Unknown"),
                m.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Substitutes the context block into a system prompt template.
pub fn render_system_prompt(template: &str, context: &str) -> String {
    template.replace("{context}", context)
}
