//! FAQ session tracker.
//!
//! Per active category, filters already-answered questions out of the
//! rendered options and injects the reserved `back` and `purchase` actions.
//! The asked-set itself is session-scoped state owned by the engine; the
//! tracker is a per-turn view over (entries, asked).

use parley_types::error::DataError;
use parley_types::faq::FaqEntry;

/// Reserved option id that pops one navigation level.
pub const BACK_ACTION: &str = "back";

/// Reserved option id that redirects to the purchase flow for the current
/// category.
pub const PURCHASE_ACTION: &str = "purchase";

/// Appended to the answer once every question in the category has been asked.
pub const NO_MORE_QUESTIONS: &str =
    "That covers all the questions for this topic. You can go back or type your own question.";

/// Source of FAQ documents, one per category.
///
/// Implementations live in `parley-infra` (filesystem catalog). A missing or
/// malformed category document surfaces as a `DataError`, which the engine
/// turns into an in-chat message rather than a crash.
pub trait FaqSource: Send + Sync {
    fn entries(
        &self,
        category: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FaqEntry>, DataError>> + Send;
}

/// Per-turn view over a category's entries and the session's asked-set.
///
/// `answer` only ever appends to the asked list, so the set grows
/// monotonically; the engine writes the list back into session state after
/// the turn.
pub struct FaqTracker {
    entries: Vec<FaqEntry>,
    asked: Vec<String>,
}

impl FaqTracker {
    pub fn new(entries: Vec<FaqEntry>, asked: Vec<String>) -> Self {
        Self { entries, asked }
    }

    /// Remaining question ids in document order, followed by the reserved
    /// actions. Question text is assumed never to equal a reserved id.
    pub fn options(&self) -> Vec<String> {
        let mut options: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !self.asked.iter().any(|a| a == &e.question))
            .map(|e| e.question.clone())
            .collect();
        options.push(PURCHASE_ACTION.to_string());
        options.push(BACK_ACTION.to_string());
        options
    }

    /// Answer a question by id, marking it asked.
    ///
    /// Returns `None` for an id that matches no entry; an already-asked
    /// question still answers (idempotent) without growing the asked list.
    pub fn answer(&mut self, question_id: &str) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.question == question_id)?;
        let answer = entry.answer.clone();
        if !self.asked.iter().any(|a| a == question_id) {
            self.asked.push(question_id.to_string());
        }
        Some(answer)
    }

    /// Whether every entry in the category has been asked.
    pub fn exhausted(&self) -> bool {
        self.entries
            .iter()
            .all(|e| self.asked.iter().any(|a| a == &e.question))
    }

    /// The (possibly grown) asked list, to write back into session state.
    pub fn into_asked(self) -> Vec<String> {
        self.asked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<FaqEntry> {
        vec![
            FaqEntry {
                question: "Q1".to_string(),
                answer: "A1".to_string(),
            },
            FaqEntry {
                question: "Q2".to_string(),
                answer: "A2".to_string(),
            },
        ]
    }

    #[test]
    fn options_include_reserved_actions() {
        let tracker = FaqTracker::new(entries(), Vec::new());
        assert_eq!(tracker.options(), vec!["Q1", "Q2", "purchase", "back"]);
    }

    #[test]
    fn answered_question_leaves_option_list() {
        let mut tracker = FaqTracker::new(entries(), Vec::new());
        assert_eq!(tracker.answer("Q1").as_deref(), Some("A1"));
        assert_eq!(tracker.options(), vec!["Q2", "purchase", "back"]);
        assert!(!tracker.exhausted());
    }

    #[test]
    fn asked_set_grows_monotonically() {
        let mut tracker = FaqTracker::new(entries(), vec!["Q1".to_string()]);
        tracker.answer("Q1");
        tracker.answer("Q2");
        let asked = tracker.into_asked();
        assert_eq!(asked, vec!["Q1", "Q2"]);
    }

    #[test]
    fn exhaustion_after_all_answered() {
        let mut tracker = FaqTracker::new(entries(), vec!["Q1".to_string()]);
        tracker.answer("Q2");
        assert!(tracker.exhausted());
        assert_eq!(tracker.options(), vec!["purchase", "back"]);
    }

    #[test]
    fn unknown_question_id_is_none() {
        let mut tracker = FaqTracker::new(entries(), Vec::new());
        assert!(tracker.answer("nope").is_none());
        assert!(tracker.answer(BACK_ACTION).is_none());
    }
}
