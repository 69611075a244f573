//! Grounding prompt builder.
//!
//! Assembles the generation request from the full knowledge corpus, an
//! optional bounded window of conversation history, and the user query.
//! The instruction block is the only enforcement mechanism preventing the
//! generation service from fabricating information: it requires answers to
//! come exclusively from the embedded corpus, and names the exact sentence to
//! emit when the answer is not derivable.

use parley_types::chat::{ChatMessage, Sender};

/// The sentence the generation service must emit verbatim when the answer is
/// not derivable from the corpus.
pub const GROUNDING_FALLBACK: &str = "Sorry, I can't answer this question. \
Our customer support team will contact you soon. \
Would you like to ask any other question?";

/// Builds grounded prompts for free-text turns.
pub struct GroundedPrompt;

impl GroundedPrompt {
    /// Assemble the full prompt.
    ///
    /// `history` is the bounded recent window, oldest first; empty history
    /// states that the conversation is beginning.
    pub fn build(user_query: &str, corpus: &serde_json::Value, history: &[ChatMessage]) -> String {
        let corpus_block =
            serde_json::to_string_pretty(corpus).unwrap_or_else(|_| corpus.to_string());

        let context_block = if history.is_empty() {
            "This is the start of our conversation.".to_string()
        } else {
            history
                .iter()
                .map(|m| {
                    let role = match m.sender {
                        Sender::User => "User",
                        Sender::Bot => "Assistant",
                    };
                    format!("{role}: {}", m.content.trim())
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "You are a customer-support assistant. You help visitors understand and \
choose the right service based on their needs.\n\
\n\
You are provided with structured company data below. You must ONLY use this \
data to respond.\n\
\n\
COMPANY DATA:\n\
{corpus_block}\n\
\n\
CONVERSATION CONTEXT:\n\
{context_block}\n\
\n\
YOUR OBJECTIVE:\n\
1. Help the user identify which service fits their goal or query.\n\
2. Ask clarifying questions if the request is vague.\n\
3. If the user describes an idea, recommend the service(s) from the data that \
best fit, explaining each briefly.\n\
4. If the question is unrelated or cannot be answered from the data, respond \
with exactly this sentence:\n\
   \"{GROUNDING_FALLBACK}\"\n\
\n\
IMPORTANT RULES:\n\
- Never make up services or answers not grounded in the data.\n\
- Be polite, concise, and focused on helping the user take the next step.\n\
- Use the conversation context to keep continuity across turns.\n\
\n\
CURRENT USER MESSAGE:\n\
{user_query}\n"
        )
    }
}
