use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    #[default]
    Idle,
    InFlight,
    Completed,
}

/// Identifies one outstanding translation request and the buffer it was
/// issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationTicket {
    pub request_id: u64,
    pub generation: u64,
}

/// The editable state of the active artifact pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionBuffer {
    #[serde(default)]
    pub active_file_name: String,
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub translated_text: String,
    #[serde(default)]
    pub translation_visible: bool,
    #[serde(default)]
    pub translation_state: TranslationState,
    /// Bumped every time the buffer is switched to other content.
    #[serde(default)]
    pub generation: u64,
    #[serde(default)]
    pub pending: Option<TranslationTicket>,
    #[serde(default)]
    next_request_id: u64,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all content and start a new generation. Any request still in
    /// flight for the old generation becomes stale.
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            next_request_id: self.next_request_id,
            ..Self::default()
        };
    }

    pub fn is_in_flight(&self) -> bool {
        self.translation_state == TranslationState::InFlight
    }

    /// Allocate a ticket for a new request against the current generation.
    pub fn issue_ticket(&mut self) -> TranslationTicket {
        self.next_request_id += 1;
        let ticket = TranslationTicket {
            request_id: self.next_request_id,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        self.translation_state = TranslationState::InFlight;
        ticket
    }

    /// Whether a result for `ticket` still belongs to this buffer.
    pub fn accepts(&self, ticket: TranslationTicket) -> bool {
        self.is_in_flight() && ticket.generation == self.generation && self.pending == Some(ticket)
    }

    /// Return to idle, hiding the translated view.
    pub fn settle_idle(&mut self) {
        self.pending = None;
        self.translation_state = TranslationState::Idle;
        self.translation_visible = false;
    }

    /// A persisted buffer cannot still have a live request: whoever issued
    /// it is gone.
    pub fn normalize_after_load(&mut self) {
        if self.is_in_flight() {
            let had_translation = self.translation_visible && !self.translated_text.is_empty();
            self.pending = None;
            if had_translation {
                self.translation_state = TranslationState::Completed;
            } else {
                self.settle_idle();
            }
        }
        if self.translation_state == TranslationState::Idle {
            self.translation_visible = false;
        }
        self.pending = None;
    }

    /// `translation_visible` implies a non-idle state, and only an in-flight
    /// buffer holds a pending ticket.
    pub fn is_consistent(&self) -> bool {
        let visible_ok = !self.translation_visible || self.translation_state != TranslationState::Idle;
        let pending_ok = self.pending.is_some() == self.is_in_flight();
        visible_ok && pending_ok
    }
}
