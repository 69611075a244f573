//! FAQ entry types.

use serde::{Deserialize, Serialize};

/// One question/answer pair belonging to a single category document.
///
/// The question text doubles as the question id; presentation order is
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_document_is_an_entry_array() {
        let raw = r#"[
            { "question": "How do I pay?", "answer": "Card or invoice." },
            { "question": "Do you offer refunds?", "answer": "Within 30 days." }
        ]"#;
        let entries: Vec<FaqEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "How do I pay?");
    }
}
