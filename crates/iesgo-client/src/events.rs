//! Notifications pushed to whatever UI layer drives the session.

use serde::Serialize;

use iesgo_shared::types::{MatchId, MessageId, Theme, UserId};

pub const EVENT_LOGGED_IN: &str = "logged-in";
pub const EVENT_LOGGED_OUT: &str = "logged-out";
pub const EVENT_PROFILE_UPDATED: &str = "profile-updated";
pub const EVENT_MATCHED: &str = "matched";
pub const EVENT_MESSAGE_APPENDED: &str = "message-appended";
pub const EVENT_THEME_CHANGED: &str = "theme-changed";
pub const EVENT_VERIFICATION_FINISHED: &str = "verification-finished";

/// Capacity of the broadcast buffer; slow subscribers lag past this.
pub const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    LoggedIn {
        user_id: UserId,
    },
    LoggedOut,
    ProfileUpdated {
        user_id: UserId,
    },
    Matched {
        match_id: MatchId,
        with: UserId,
        study_date: bool,
    },
    MessageAppended {
        match_id: MatchId,
        message_id: MessageId,
        sender_id: UserId,
    },
    ThemeChanged {
        theme: Theme,
    },
    VerificationFinished {
        success: bool,
    },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoggedIn { .. } => EVENT_LOGGED_IN,
            Self::LoggedOut => EVENT_LOGGED_OUT,
            Self::ProfileUpdated { .. } => EVENT_PROFILE_UPDATED,
            Self::Matched { .. } => EVENT_MATCHED,
            Self::MessageAppended { .. } => EVENT_MESSAGE_APPENDED,
            Self::ThemeChanged { .. } => EVENT_THEME_CHANGED,
            Self::VerificationFinished { .. } => EVENT_VERIFICATION_FINISHED,
        }
    }
}
