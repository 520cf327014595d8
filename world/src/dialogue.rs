//! Conversation sequencing: a two-state machine that walks an NPC's lines.

use std::num::NonZeroUsize;

use thiserror::Error;
use wishwalk_core::NpcId;

/// Reasons a conversation cannot be opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DialogueError {
    /// Another conversation is already in progress.
    #[error("a conversation with NPC {} is already open", .npc.get())]
    AlreadyOpen {
        /// NPC whose conversation holds the controller.
        npc: NpcId,
    },
}

/// Active conversation: who is speaking and which line is on display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialogueSession {
    npc: NpcId,
    line_index: usize,
    line_count: NonZeroUsize,
}

impl DialogueSession {
    /// NPC delivering the conversation.
    #[must_use]
    pub const fn npc(&self) -> NpcId {
        self.npc
    }

    /// Zero-based index of the line on display. Always below the line count.
    #[must_use]
    pub const fn line_index(&self) -> usize {
        self.line_index
    }
}

/// Outcome of [`DialogueController::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueStep {
    /// No conversation was open; nothing changed.
    Idle,
    /// The conversation moved to another line.
    Line {
        /// NPC delivering the conversation.
        npc: NpcId,
        /// Zero-based index of the line now on display.
        line_index: usize,
    },
    /// The last line was dismissed and the conversation closed.
    Finished {
        /// NPC whose conversation finished.
        npc: NpcId,
    },
}

/// Closed/Open state machine for a single conversation at a time.
#[derive(Clone, Debug, Default)]
pub struct DialogueController {
    session: Option<DialogueSession>,
}

impl DialogueController {
    /// Opens a conversation at its first line.
    pub fn open(
        &mut self,
        npc: NpcId,
        line_count: NonZeroUsize,
    ) -> Result<DialogueSession, DialogueError> {
        if let Some(active) = self.session {
            return Err(DialogueError::AlreadyOpen { npc: active.npc });
        }

        let session = DialogueSession {
            npc,
            line_index: 0,
            line_count,
        };
        self.session = Some(session);
        Ok(session)
    }

    /// Moves to the next line, closing the conversation after the last one.
    ///
    /// Calling this while closed is a no-op that reports [`DialogueStep::Idle`].
    pub fn advance(&mut self) -> DialogueStep {
        let Some(session) = self.session.as_mut() else {
            return DialogueStep::Idle;
        };

        session.line_index += 1;
        if session.line_index >= session.line_count.get() {
            let npc = session.npc;
            self.session = None;
            return DialogueStep::Finished { npc };
        }

        DialogueStep::Line {
            npc: session.npc,
            line_index: session.line_index,
        }
    }

    /// Conversation currently in progress, if any.
    #[must_use]
    pub const fn session(&self) -> Option<DialogueSession> {
        self.session
    }

    /// Reports whether a conversation is in progress.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }
}
