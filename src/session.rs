//! Conversation state behind the chat view.
//!
//! A [`ChatSession`] owns the transcript, the draft and the busy flag. The
//! view renders it and feeds it input; the submission lifecycle lives here so
//! it can be driven without a renderer.

use crate::ai::{ChatResult, Responder};
use crate::types::{Message, MessageId, Sender};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

pub const SEED_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
pub const FALLBACK_REPLY: &str = "Sorry, I can't reply right now. Please try again later.";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]");

fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Local `HH:MM`, falling back to UTC when the local offset is unknown.
pub fn format_message_time(timestamp: OffsetDateTime) -> String {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).unwrap_or_default()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    LineBreak,
    Ignore,
}

impl KeyAction {
    pub fn from_key(is_enter: bool, shift_held: bool) -> Self {
        match (is_enter, shift_held) {
            (true, false) => KeyAction::Submit,
            (true, true) => KeyAction::LineBreak,
            (false, _) => KeyAction::Ignore,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatSession {
    transcript: Vec<Message>,
    draft: String,
    busy: bool,
    focus_requested: bool,
    last_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A session seeded with the assistant's greeting.
    pub fn new() -> Self {
        let mut session = Self {
            transcript: Vec::new(),
            draft: String::new(),
            busy: false,
            focus_requested: false,
            last_id: 0,
        };
        session.push(Sender::Ai, SEED_GREETING.to_string());
        session
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the send control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.draft.trim().is_empty()
    }

    /// Appends the user's message, clears the draft and marks the session busy.
    ///
    /// Returns the text to hand to the responder, or `None` when the draft is
    /// blank or a reply is still pending.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }

        let text = self.draft.trim().to_string();
        self.push(Sender::User, text.clone());
        self.draft.clear();
        self.busy = true;
        tracing::debug!(chars = text.chars().count(), "submitting message");
        Some(text)
    }

    /// Appends the reply (or the fallback apology) and clears the busy flag.
    pub fn finish_submit(&mut self, outcome: ChatResult<String>) {
        if !self.busy {
            tracing::warn!("reply arrived with no submission pending; dropping it");
            return;
        }

        let content = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "reply failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        };
        self.push(Sender::Ai, content);
        self.busy = false;
        self.focus_requested = true;
    }

    /// Runs a whole submission against `responder`. Returns false if nothing was sent.
    pub async fn submit(&mut self, responder: &dyn Responder) -> bool {
        let Some(text) = self.begin_submit() else {
            return false;
        };
        let outcome = responder.reply(&text).await;
        self.finish_submit(outcome);
        true
    }

    /// Handles a key press in the draft field; Enter alone starts a submission.
    pub fn on_key(&mut self, is_enter: bool, shift_held: bool) -> Option<String> {
        match KeyAction::from_key(is_enter, shift_held) {
            KeyAction::Submit => self.begin_submit(),
            KeyAction::LineBreak | KeyAction::Ignore => None,
        }
    }

    /// Whether a settled submission is waiting to hand focus back to the draft field.
    pub fn wants_focus(&self) -> bool {
        self.focus_requested
    }

    /// True once after each settled submission.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    fn next_id(&mut self, now: OffsetDateTime) -> MessageId {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or_default();
        self.last_id = millis.max(self.last_id + 1);
        MessageId(self.last_id)
    }

    fn push(&mut self, sender: Sender, content: String) {
        let timestamp = current_time();
        let id = self.next_id(timestamp);
        self.transcript.push(Message {
            id,
            content,
            sender,
            timestamp,
        });
    }
}
