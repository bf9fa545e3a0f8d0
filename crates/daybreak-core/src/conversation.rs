//! Conversation session machine for the chat panel.
//!
//! Owns the transcript, the session handle, and the pending-send flag. The
//! transcript is append-only and strictly chronological; it is replaced
//! wholesale only by an explicit clear. The machine is two-phase: `submit`
//! appends the user turn and hands back the outgoing body, `complete` appends
//! the assistant (or error) turn once the network call settles. An epoch
//! counter ties each in-flight send to the session generation it started in,
//! so a completion that races an explicit clear is dropped instead of
//! resurrecting the old handle.

use crate::commands::{dispatch, help_text, Dispatch};
use crate::widgets::ChatReply;
use serde::{Deserialize, Serialize};

/// Who authored a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    /// RFC3339, stamped when the turn is appended.
    pub timestamp: String,
}

impl ConversationTurn {
    fn now(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Body of an outgoing chat request. The session id key is absent from the
/// JSON until a handle has been adopted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingChat {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input; nothing appended, nothing sent.
    Rejected,
    /// A send is already in flight; further sends stay disabled until it
    /// settles.
    Busy,
    /// `/help` handled locally; no network dispatch.
    Help,
    /// Send `outgoing` upstream and report back via
    /// [`ChatSession::complete`] with this epoch.
    Dispatch { outgoing: OutgoingChat, epoch: u64 },
}

/// Synthetic assistant notice left after an explicit clear.
pub const SESSION_CLEARED_NOTICE: &str =
    "Session cleared. I'm starting fresh - what would you like to know?";

/// Fixed assistant-facing text for any failed send. Upstream detail goes to
/// the log, never the transcript.
pub const CHAT_ERROR_NOTICE: &str =
    "Sorry, I'm having trouble connecting to the AI service right now. Please try again later.";

/// The chat panel's state: transcript, session handle, pending flag.
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<ConversationTurn>,
    session_id: Option<String>,
    pending: bool,
    epoch: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose transcript opens with an assistant greeting.
    pub fn with_greeting(text: &str) -> Self {
        let mut session = Self::default();
        session.turns.push(ConversationTurn::now(Role::Assistant, text));
        session
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// True while a send is in flight. The UI must not dispatch another send
    /// until the current one settles.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Take one line of user input through the dispatcher. Appends the user
    /// turn (and, for `/help`, the local reply) and reports what the caller
    /// should do next.
    pub fn submit(&mut self, input: &str) -> Submission {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Submission::Rejected;
        }
        if self.pending {
            return Submission::Busy;
        }
        match dispatch(trimmed) {
            Dispatch::Help => {
                self.turns.push(ConversationTurn::now(Role::User, trimmed));
                self.turns
                    .push(ConversationTurn::now(Role::Assistant, help_text()));
                Submission::Help
            }
            // Recognized shortcuts still send the literal text; the command
            // table's prompt strings are documentation only.
            Dispatch::Message(text) | Dispatch::Command { literal: text, .. } => {
                self.turns.push(ConversationTurn::now(Role::User, text));
                self.pending = true;
                Submission::Dispatch {
                    outgoing: OutgoingChat {
                        message: text.to_string(),
                        session_id: self.session_id.clone(),
                    },
                    epoch: self.epoch,
                }
            }
        }
    }

    /// Settle the in-flight send started at `epoch`. A stale epoch means the
    /// session was cleared while the call was in flight: the result is
    /// dropped entirely and the handle stays gone.
    pub fn complete(&mut self, epoch: u64, result: Result<ChatReply, String>) {
        if epoch != self.epoch {
            tracing::debug!(
                target: "daybreak::chat",
                stale_epoch = epoch,
                "dropping completion from a cleared session"
            );
            return;
        }
        self.pending = false;
        match result {
            Ok(reply) => {
                // Server value wins: a changed id is an updated session.
                if !reply.session_id.is_empty() {
                    self.session_id = Some(reply.session_id);
                }
                self.turns
                    .push(ConversationTurn::now(Role::Assistant, reply.response));
            }
            Err(detail) => {
                tracing::warn!(target: "daybreak::chat", error = %detail, "chat send failed");
                self.turns
                    .push(ConversationTurn::now(Role::Assistant, CHAT_ERROR_NOTICE));
            }
        }
    }

    /// Explicit reset: drop the handle, replace the transcript with a single
    /// notice, and invalidate any in-flight send. No request is issued.
    pub fn clear(&mut self) {
        self.session_id = None;
        self.pending = false;
        self.epoch += 1;
        self.turns.clear();
        self.turns
            .push(ConversationTurn::now(Role::Assistant, SESSION_CLEARED_NOTICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandAction, SLASH_COMMANDS};

    fn reply(text: &str, session_id: &str, new_session: bool) -> ChatReply {
        ChatReply {
            response: text.to_string(),
            session_id: session_id.to_string(),
            new_session,
            timestamp: "2025-06-01T07:00:00Z".to_string(),
        }
    }

    fn dispatch_epoch(session: &mut ChatSession, input: &str) -> (OutgoingChat, u64) {
        match session.submit(input) {
            Submission::Dispatch { outgoing, epoch } => (outgoing, epoch),
            other => panic!("expected a dispatch, got {:?}", other),
        }
    }

    #[test]
    fn blank_input_is_rejected_without_side_effects() {
        let mut session = ChatSession::new();
        assert_eq!(session.submit("   "), Submission::Rejected);
        assert!(session.turns().is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn help_is_local_and_adds_exactly_one_assistant_turn() {
        let mut session = ChatSession::new();
        assert_eq!(session.submit("/help"), Submission::Help);
        assert!(!session.is_pending());
        let assistant_turns: Vec<_> = session
            .turns()
            .iter()
            .filter(|t| t.role == Role::Assistant)
            .collect();
        assert_eq!(assistant_turns.len(), 1);
        for command in SLASH_COMMANDS {
            if matches!(command.action, CommandAction::Help) {
                continue;
            }
            assert!(assistant_turns[0].text.contains(&format!("/{}", command.trigger)));
            assert!(assistant_turns[0].text.contains(command.description));
        }
    }

    #[test]
    fn first_send_omits_session_id_key() {
        let mut session = ChatSession::new();
        let (outgoing, _) = dispatch_epoch(&mut session, "/summary");
        assert_eq!(outgoing.message, "/summary");
        assert_eq!(outgoing.session_id, None);
        let wire = serde_json::to_value(&outgoing).unwrap();
        assert_eq!(wire, serde_json::json!({"message": "/summary"}));
    }

    #[test]
    fn adopted_session_rides_on_the_next_send() {
        let mut session = ChatSession::new();
        let (_, epoch) = dispatch_epoch(&mut session, "/summary");
        session.complete(epoch, Ok(reply("Here you go.", "abc123", true)));
        assert_eq!(session.session_id(), Some("abc123"));

        let (outgoing, _) = dispatch_epoch(&mut session, "hello");
        let wire = serde_json::to_value(&outgoing).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"message": "hello", "session_id": "abc123"})
        );
    }

    #[test]
    fn rotated_session_id_is_adopted_even_without_new_session_flag() {
        let mut session = ChatSession::new();
        let (_, epoch) = dispatch_epoch(&mut session, "hi");
        session.complete(epoch, Ok(reply("hello", "S1", true)));
        assert_eq!(session.session_id(), Some("S1"));

        let (_, epoch) = dispatch_epoch(&mut session, "again");
        session.complete(epoch, Ok(reply("still here", "S2", false)));
        assert_eq!(session.session_id(), Some("S2"));
    }

    #[test]
    fn send_failure_keeps_the_handle_and_appends_fixed_notice() {
        let mut session = ChatSession::new();
        let (_, epoch) = dispatch_epoch(&mut session, "hi");
        session.complete(epoch, Ok(reply("hello", "S1", true)));

        let (_, epoch) = dispatch_epoch(&mut session, "are you there?");
        session.complete(epoch, Err("connection refused".to_string()));
        assert_eq!(session.session_id(), Some("S1"));
        assert!(!session.is_pending());
        let last = session.turns().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.text, CHAT_ERROR_NOTICE);
        assert!(!last.text.contains("connection refused"));
    }

    #[test]
    fn pending_send_blocks_further_submits() {
        let mut session = ChatSession::new();
        let _ = dispatch_epoch(&mut session, "first");
        let before = session.turns().len();
        assert_eq!(session.submit("second"), Submission::Busy);
        assert_eq!(session.turns().len(), before);
    }

    #[test]
    fn clear_leaves_one_notice_and_ignores_stale_completion() {
        let mut session = ChatSession::new();
        let (_, old_epoch) = dispatch_epoch(&mut session, "hi");
        session.complete(old_epoch, Ok(reply("hello", "S1", true)));

        let (_, inflight_epoch) = dispatch_epoch(&mut session, "one more");
        session.clear();
        assert_eq!(session.session_id(), None);
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, Role::Assistant);
        assert_eq!(session.turns()[0].text, SESSION_CLEARED_NOTICE);

        // The in-flight call settles after the clear: its result must vanish.
        session.complete(inflight_epoch, Ok(reply("late", "S1", false)));
        assert_eq!(session.session_id(), None);
        assert_eq!(session.turns().len(), 1);
        assert!(!session.is_pending());
    }

    #[test]
    fn greeting_seeds_the_transcript() {
        let session = ChatSession::with_greeting("Good morning!");
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, Role::Assistant);
    }
}
