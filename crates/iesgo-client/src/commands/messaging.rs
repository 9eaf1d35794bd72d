use tracing::{debug, info};

use iesgo_shared::constants::{AUTO_REPLY_TEXT, COUNTERPART_ID, LOCAL_USER_ID};
use iesgo_shared::types::{
    now_millis, Match, MatchId, Message, MessageId, MessageKind, SwipeAction, User, UserId,
};

use crate::events::SessionEvent;
use crate::session::Session;

impl Session {
    /// Append a message from the current user to `match_id`'s thread.
    ///
    /// Sent messages are born read. When the sender is the local demo user a
    /// scripted partner reply follows after the auto-reply delay. Returns
    /// `None` when signed out.
    pub fn send_message(
        &self,
        match_id: &MatchId,
        content: &str,
        kind: MessageKind,
    ) -> Option<Message> {
        let mut st = self.state();
        let me = st.current_user.as_ref()?.id.clone();

        let message = Message {
            id: MessageId::generate(),
            match_id: match_id.clone(),
            sender_id: me.clone(),
            content: content.to_string(),
            timestamp: now_millis(),
            is_read: true,
            kind,
        };

        st.messages
            .entry(match_id.clone())
            .or_default()
            .push(message.clone());
        if let Some(m) = st.matches.iter_mut().find(|m| &m.id == match_id) {
            m.last_message = Some(message.content.clone());
            m.last_message_time = Some(message.timestamp);
        }
        self.persist_messages(&st);
        self.persist_matches(&st);
        let epoch = st.epoch;
        drop(st);

        debug!(match_id = %match_id, message_id = %message.id, kind = ?kind, "Message sent");
        self.emit(SessionEvent::MessageAppended {
            match_id: match_id.clone(),
            message_id: message.id.clone(),
            sender_id: me.clone(),
        });

        if me.as_str() == LOCAL_USER_ID {
            let match_id = match_id.clone();
            self.schedule(self.inner.config.auto_reply_delay, move |session| async move {
                session.append_scripted_reply(&match_id, epoch);
            });
        }

        Some(message)
    }

    fn append_scripted_reply(&self, match_id: &MatchId, epoch: u64) {
        let mut st = self.state();
        if st.epoch != epoch || st.current_user.is_none() {
            return;
        }

        let reply = Message {
            id: MessageId::generate(),
            match_id: match_id.clone(),
            sender_id: UserId::new(COUNTERPART_ID),
            content: AUTO_REPLY_TEXT.to_string(),
            timestamp: now_millis(),
            is_read: false,
            kind: MessageKind::Text,
        };

        st.messages
            .entry(match_id.clone())
            .or_default()
            .push(reply.clone());
        if let Some(m) = st.matches.iter_mut().find(|m| &m.id == match_id) {
            m.last_message = Some(reply.content.clone());
            m.last_message_time = Some(reply.timestamp);
            m.unread_count += 1;
        }
        self.persist_messages(&st);
        self.persist_matches(&st);
        drop(st);

        debug!(match_id = %match_id, "Scripted reply delivered");
        self.emit(SessionEvent::MessageAppended {
            match_id: match_id.clone(),
            message_id: reply.id,
            sender_id: reply.sender_id,
        });
    }

    /// Mark the whole thread read and reset the match's unread badge.
    pub fn mark_thread_read(&self, match_id: &MatchId) {
        let mut st = self.state();
        let mut changed = false;

        if let Some(thread) = st.messages.get_mut(match_id) {
            for message in thread.iter_mut().filter(|m| !m.is_read) {
                message.is_read = true;
                changed = true;
            }
        }
        if let Some(m) = st.matches.iter_mut().find(|m| &m.id == match_id) {
            if m.unread_count > 0 {
                m.unread_count = 0;
                changed = true;
            }
        }

        if changed {
            self.persist_messages(&st);
            self.persist_matches(&st);
        }
    }

    /// Thread for `match_id`, oldest first.
    pub fn messages(&self, match_id: &MatchId) -> Vec<Message> {
        self.state()
            .messages
            .get(match_id)
            .cloned()
            .unwrap_or_default()
    }

    /// All matches, newest first.
    pub fn matches(&self) -> Vec<Match> {
        self.state().matches.clone()
    }

    pub fn swipes(&self) -> Vec<SwipeAction> {
        self.state().swipes.clone()
    }

    pub fn total_unread(&self) -> u32 {
        self.state().matches.iter().map(|m| m.unread_count).sum()
    }

    /// Catalog profile of the other participant in `match_id`.
    ///
    /// `None` when signed out or the match is unknown; a placeholder profile
    /// when the partner is no longer in the catalog.
    pub fn counterpart_profile(&self, match_id: &MatchId) -> Option<User> {
        let st = self.state();
        let me = &st.current_user.as_ref()?.id;
        let m = st.matches.iter().find(|m| &m.id == match_id)?;
        let other = m.counterpart(me)?;
        Some(self.inner.catalog.get_or_placeholder(other))
    }

    /// Ask the AI collaborator for an opener aimed at `match_id`'s partner.
    pub async fn suggest_icebreaker(&self, match_id: &MatchId) -> Option<String> {
        let me = self.current_user()?;
        let partner = self.counterpart_profile(match_id)?;

        let suggestion = self.inner.ai.generate_icebreaker(&me, &partner).await;
        info!(match_id = %match_id, partner = %partner.id, "Icebreaker suggested");
        Some(suggestion)
    }
}
