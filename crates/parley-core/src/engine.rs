//! Dialogue engine: the per-turn state machine.
//!
//! Orchestrates one conversational turn: reads the session's navigation
//! state, applies a transition (menu walk, FAQ answer, reserved action,
//! free-text generation, contact submission, or reset), persists both sides
//! of the exchange, and returns the response envelope.
//!
//! States: greeting -> category_list -> faq_list -> (terminal_redirect |
//! free_text). Free-text is reachable from any state and does not consume
//! menu state.
//!
//! Session state lives in a DashMap keyed by session id. Concurrent turns
//! for the same id are NOT serialized: the turn snapshots the state, mutates
//! the copy, and writes it back, so two simultaneous tabs race last-write-wins.
//! That is an accepted limitation of the design -- do not add locking here.

use dashmap::DashMap;
use serde::Serialize;

use parley_types::chat::{ChatMessage, ContactInfo, SessionId};
use parley_types::config::EngineConfig;
use parley_types::error::DataError;
use parley_types::generation::GenerationRequest;
use parley_types::menu::NavigationPath;

use crate::chat::ChatStore;
use crate::faq::{FaqSource, FaqTracker, BACK_ACTION, NO_MORE_QUESTIONS, PURCHASE_ACTION};
use crate::generation::{ResilientGenerator, TextGenerator};
use crate::menu::MenuTree;
use crate::prompt::GroundedPrompt;

/// Reply to an empty free-text submission; generation is not invoked.
pub const EMPTY_INPUT_REPLY: &str = "I didn't receive any input. Could you please try again?";

/// Fixed acknowledgement for a contact submission.
pub const CONTACT_THANK_YOU: &str =
    "Thank you! Our customer support team will contact you shortly.";

/// In-chat message when a category's FAQ document cannot be loaded.
pub const FAQ_UNAVAILABLE: &str = "Sorry, we couldn't load the questions for this topic right \
now. Please go back and pick another option, or type your question below.";

/// Gentle re-prompt when a selection matches no listed question.
const CHOOSE_QUESTION_PROMPT: &str = "Please choose one of the listed questions.";

/// Bot message accompanying a purchase redirect.
const PURCHASE_MESSAGE: &str = "Taking you to our purchase page.";

/// Transient per-session navigation state.
///
/// The asked-set is per category and monotonically growing: leaving a
/// category keeps it, and only [`DialogueEngine::reset`] clears it.
#[derive(Debug, Clone, Default)]
struct SessionState {
    path: NavigationPath,
    category: Option<String>,
    asked: std::collections::HashMap<String, Vec<String>>,
}

/// Response envelope for a scripted (menu/FAQ) turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub session_id: SessionId,
    pub options: Vec<String>,
    pub message: String,
    pub path: NavigationPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Response envelope for a free-text turn.
#[derive(Debug, Clone, Serialize)]
pub struct MessageReply {
    pub session_id: SessionId,
    pub response: String,
}

/// Response envelope for a contact submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactReply {
    pub session_id: SessionId,
    pub success: bool,
    pub message: String,
}

/// The hybrid dialogue engine.
///
/// Generic over the chat store, text generator, and FAQ source ports so the
/// core stays free of IO crates; `parley-api` pins the infra implementations.
pub struct DialogueEngine<S, G, F>
where
    S: ChatStore,
    G: TextGenerator,
    F: FaqSource,
{
    tree: MenuTree,
    corpus: serde_json::Value,
    store: S,
    generator: ResilientGenerator<G>,
    faq: F,
    config: EngineConfig,
    sessions: DashMap<SessionId, SessionState>,
}

impl<S, G, F> DialogueEngine<S, G, F>
where
    S: ChatStore,
    G: TextGenerator,
    F: FaqSource,
{
    pub fn new(
        tree: MenuTree,
        corpus: serde_json::Value,
        store: S,
        generator: G,
        faq: F,
        config: EngineConfig,
    ) -> Self {
        Self {
            tree,
            corpus,
            store,
            generator: ResilientGenerator::new(generator),
            faq,
            config,
            sessions: DashMap::new(),
        }
    }

    /// The configured generation model (used by health reporting).
    pub fn generation_model(&self) -> &str {
        &self.config.generation_model
    }

    /// Access the chat store (used by health reporting).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve or establish the session for a turn.
    ///
    /// A provided id is reused as-is (its state entry is created on first
    /// sight); otherwise a fresh session is created through the store.
    pub async fn ensure_session(&self, id: Option<SessionId>) -> SessionId {
        let sid = match id {
            Some(sid) => sid,
            None => self.create_session().await,
        };
        self.sessions.entry(sid.clone()).or_default();
        sid
    }

    /// First visitor turn: establish a session, return root options and the
    /// greeting. Does not disturb existing navigation state.
    pub async fn bootstrap(&self, id: Option<SessionId>) -> TurnReply {
        let sid = self.ensure_session(id).await;
        let resolved = self.tree.resolve(&NavigationPath::new());
        TurnReply {
            session_id: sid,
            options: resolved.options,
            message: resolved.message,
            path: NavigationPath::new(),
            redirect: None,
        }
    }

    /// One scripted transition: menu descent, FAQ answer, or reserved action.
    ///
    /// The client-supplied `path` is the source of truth for menu position
    /// (resolved leniently, truncating at the first invalid key); `back` pops
    /// the recorded path instead, which stays correct even when two different
    /// paths reach the same level.
    pub async fn advance_menu(
        &self,
        id: Option<SessionId>,
        key: &str,
        path: &NavigationPath,
    ) -> TurnReply {
        let sid = self.ensure_session(id).await;
        let mut state = self
            .sessions
            .get(&sid)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        let mut reply = if key == BACK_ACTION {
            self.go_back(&sid, &mut state)
        } else if let Some(category) = state.category.clone() {
            if key == PURCHASE_ACTION {
                self.purchase(&sid, &mut state, &category)
            } else {
                self.answer_faq(&sid, &mut state, &category, key).await
            }
        } else {
            self.descend(&sid, &mut state, key, path).await
        };

        self.persist(&sid, ChatMessage::user(format!("Selected menu option: {key}")))
            .await;
        if !reply.message.is_empty() {
            self.persist(&sid, ChatMessage::bot(reply.message.clone())).await;
        }

        reply.path = state.path.clone();
        self.sessions.insert(sid, state);
        reply
    }

    /// One free-text turn: grounded generation over the knowledge corpus.
    ///
    /// Does not consume or alter menu-tree state. History is read before the
    /// current input is appended, so the prompt's context window never
    /// duplicates the query carried in the current-message block.
    pub async fn free_text(&self, id: Option<SessionId>, input: &str) -> MessageReply {
        let sid = self.ensure_session(id).await;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return MessageReply {
                session_id: sid,
                response: EMPTY_INPUT_REPLY.to_string(),
            };
        }

        let history = match self.store.read_history(&sid, self.config.history_window).await {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(session_id = %sid, error = %err, "History read failed, prompting without context");
                Vec::new()
            }
        };

        self.persist(&sid, ChatMessage::user(trimmed)).await;

        let prompt = GroundedPrompt::build(trimmed, &self.corpus, &history);
        let request = GenerationRequest::new(self.config.generation_model.clone(), prompt);
        let response = self.generator.generate(&request).await;

        self.persist(&sid, ChatMessage::bot(response.clone())).await;

        MessageReply {
            session_id: sid,
            response,
        }
    }

    /// Persist contact details and acknowledge with the fixed thank-you.
    pub async fn submit_contact(
        &self,
        id: Option<SessionId>,
        contact: &ContactInfo,
    ) -> ContactReply {
        let sid = self.ensure_session(id).await;

        if let Err(err) = self.store.save_contact(&sid, contact).await {
            tracing::warn!(session_id = %sid, error = %err, "Contact save failed");
        }

        self.persist(
            &sid,
            ChatMessage::user(format!(
                "Contact information submitted: {} - {} - {}",
                contact.name, contact.email, contact.phone
            )),
        )
        .await;
        self.persist(&sid, ChatMessage::bot(CONTACT_THANK_YOU)).await;

        ContactReply {
            session_id: sid,
            success: true,
            message: CONTACT_THANK_YOU.to_string(),
        }
    }

    /// Clear navigation state and the asked-set, mint a fresh session, and
    /// return the root options with the greeting.
    pub async fn reset(&self, id: Option<SessionId>) -> TurnReply {
        if let Some(old) = id {
            self.sessions.remove(&old);
        }
        let sid = self.create_session().await;
        self.sessions.insert(sid.clone(), SessionState::default());

        let resolved = self.tree.resolve(&NavigationPath::new());
        TurnReply {
            session_id: sid,
            options: resolved.options,
            message: resolved.message,
            path: NavigationPath::new(),
            redirect: None,
        }
    }

    /// Recent persisted history for a session (debug surface).
    pub async fn history(&self, id: &SessionId, limit: usize) -> Vec<ChatMessage> {
        match self.store.read_history(id, limit).await {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(session_id = %id, error = %err, "History read failed");
                Vec::new()
            }
        }
    }

    // --- transition helpers ---

    fn go_back(&self, sid: &SessionId, state: &mut SessionState) -> TurnReply {
        state.path.pop();
        state.category = None;
        let resolved = self.tree.resolve(&state.path);
        TurnReply {
            session_id: sid.clone(),
            options: resolved.options,
            message: resolved.message,
            path: state.path.clone(),
            redirect: None,
        }
    }

    fn purchase(&self, sid: &SessionId, state: &mut SessionState, category: &str) -> TurnReply {
        let redirect = format!("{}?service={category}", self.config.purchase_url);
        // Exits FAQ browsing; the asked-set stays untouched.
        state.path.pop();
        state.category = None;
        let resolved = self.tree.resolve(&state.path);
        TurnReply {
            session_id: sid.clone(),
            options: resolved.options,
            message: PURCHASE_MESSAGE.to_string(),
            path: state.path.clone(),
            redirect: Some(redirect),
        }
    }

    async fn answer_faq(
        &self,
        sid: &SessionId,
        state: &mut SessionState,
        category: &str,
        key: &str,
    ) -> TurnReply {
        let entries = match self.faq.entries(category).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(category, error = %err, "FAQ document load failed");
                return TurnReply {
                    session_id: sid.clone(),
                    options: vec![BACK_ACTION.to_string()],
                    message: FAQ_UNAVAILABLE.to_string(),
                    path: state.path.clone(),
                    redirect: None,
                };
            }
        };

        let asked = state.asked.get(category).cloned().unwrap_or_default();
        let mut tracker = FaqTracker::new(entries, asked);

        let message = match tracker.answer(key) {
            Some(answer) => {
                if tracker.exhausted() {
                    format!("{answer}\n\n{NO_MORE_QUESTIONS}")
                } else {
                    answer
                }
            }
            // Same leniency as menu truncation: an unknown id re-renders the
            // remaining options instead of erroring the turn.
            None => CHOOSE_QUESTION_PROMPT.to_string(),
        };

        let options = tracker.options();
        state.asked.insert(category.to_string(), tracker.into_asked());

        TurnReply {
            session_id: sid.clone(),
            options,
            message,
            path: state.path.clone(),
            redirect: None,
        }
    }

    async fn descend(
        &self,
        sid: &SessionId,
        state: &mut SessionState,
        key: &str,
        client_path: &NavigationPath,
    ) -> TurnReply {
        let candidate = client_path.child(key);
        let resolved = self.tree.resolve(&candidate);
        let mut path = candidate;
        path.truncate(resolved.depth);
        let (node, _) = self.tree.node_at(&path);

        let reply = if node.is_terminal() {
            match path.last() {
                Some(category) => match self.faq.entries(category).await {
                    Ok(entries) => {
                        let category = category.to_string();
                        let asked = state.asked.get(&category).cloned().unwrap_or_default();
                        let tracker = FaqTracker::new(entries, asked);
                        let message = if node.message.is_empty() {
                            format!("What would you like to know about {category}?")
                        } else {
                            node.message.clone()
                        };
                        state.category = Some(category);
                        TurnReply {
                            session_id: sid.clone(),
                            options: tracker.options(),
                            message,
                            path: path.clone(),
                            redirect: None,
                        }
                    }
                    Err(DataError::Missing(_)) => {
                        // A leaf without an FAQ document is an informational
                        // terminal node.
                        state.category = None;
                        TurnReply {
                            session_id: sid.clone(),
                            options: Vec::new(),
                            message: node.message.clone(),
                            path: path.clone(),
                            redirect: None,
                        }
                    }
                    Err(err) => {
                        tracing::warn!(category, error = %err, "FAQ document load failed");
                        state.category = None;
                        TurnReply {
                            session_id: sid.clone(),
                            options: vec![BACK_ACTION.to_string()],
                            message: FAQ_UNAVAILABLE.to_string(),
                            path: path.clone(),
                            redirect: None,
                        }
                    }
                },
                None => {
                    // Truncated all the way to the root.
                    state.category = None;
                    TurnReply {
                        session_id: sid.clone(),
                        options: resolved.options,
                        message: resolved.message,
                        path: path.clone(),
                        redirect: None,
                    }
                }
            }
        } else {
            state.category = None;
            TurnReply {
                session_id: sid.clone(),
                options: resolved.options,
                message: resolved.message,
                path: path.clone(),
                redirect: None,
            }
        };

        state.path = path;
        reply
    }

    async fn create_session(&self) -> SessionId {
        match self.store.create_session().await {
            Ok(session) => session.id,
            Err(err) => {
                // Defensive only: the fallback store never errors here.
                tracing::warn!(error = %err, "Session creation failed, minting local id");
                SessionId::mint_fallback()
            }
        }
    }

    async fn persist(&self, id: &SessionId, message: ChatMessage) {
        if let Err(err) = self.store.append(id, &message).await {
            tracing::warn!(session_id = %id, error = %err, "Message persistence failed");
        }
    }
}
