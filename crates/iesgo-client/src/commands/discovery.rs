use tracing::{debug, info};

use iesgo_shared::compat::{self, Compatibility};
use iesgo_shared::constants::STUDY_OPENER_TEXT;
use iesgo_shared::filter::potential_matches;
use iesgo_shared::types::{
    now_millis, Intention, Match, MatchId, MessageKind, SwipeAction, SwipeKind, User, UserId,
};

use crate::events::SessionEvent;
use crate::session::{lock, Session};

impl Session {
    pub fn toggle_filter(&self, interest: &str) {
        self.state().filters.toggle_interest(interest);
    }

    pub fn toggle_course_filter(&self, course: &str) {
        self.state().filters.toggle_course(course);
    }

    pub fn clear_filters(&self) {
        self.state().filters.clear();
    }

    pub fn active_filters(&self) -> Vec<String> {
        self.state().filters.interests.clone()
    }

    pub fn active_course_filters(&self) -> Vec<String> {
        self.state().filters.courses.clone()
    }

    /// The discovery feed, in catalog order. Empty when signed out.
    pub fn potential_matches(&self) -> Vec<User> {
        let st = self.state();
        let Some(ref me) = st.current_user else {
            return Vec::new();
        };
        potential_matches(self.inner.catalog.users(), me, &st.swipes, &st.filters)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Record a swipe on `target` and decide whether it turned into a match.
    ///
    /// The swipe is logged whatever the outcome. Only `like` and `study`
    /// consult the match decider. A study match also gets a canned opener
    /// sent shortly afterwards. Returns `true` when a match was created.
    pub fn swipe(&self, target: &UserId, kind: SwipeKind) -> bool {
        let mut st = self.state();
        let Some(me) = st.current_user.as_ref().map(|u| u.id.clone()) else {
            debug!(target = %target, "Swipe ignored: not signed in");
            return false;
        };

        let now = now_millis();
        st.swipes.push(SwipeAction {
            from_user_id: me.clone(),
            to_user_id: target.clone(),
            action: kind,
            timestamp: now,
        });
        self.persist_swipes(&st);

        if !kind.seeks_match() || !self.inner.decider.decide() {
            debug!(target = %target, action = ?kind, "Swipe recorded, no match");
            return false;
        }

        let study = kind == SwipeKind::Study;
        let created = Match {
            id: MatchId::generate(),
            users: [me, target.clone()],
            timestamp: now,
            last_message: None,
            last_message_time: None,
            unread_count: 0,
            kind: study.then_some(Intention::StudyDate),
        };
        let match_id = created.id.clone();

        st.matches.insert(0, created);
        st.messages.insert(match_id.clone(), Vec::new());
        self.persist_matches(&st);
        self.persist_messages(&st);
        let epoch = st.epoch;
        drop(st);

        info!(match_id = %match_id, with = %target, study, "Match created");
        self.emit(SessionEvent::Matched {
            match_id: match_id.clone(),
            with: target.clone(),
            study_date: study,
        });

        if study {
            self.schedule(self.inner.config.study_opener_delay, move |session| async move {
                if session.epoch() == epoch {
                    session.send_message(&match_id, STUDY_OPENER_TEXT, MessageKind::Text);
                }
            });
        }

        true
    }

    /// Cosmetic badge for a candidate card. Has no effect on matching.
    pub fn compatibility(&self, candidate: &User) -> Compatibility {
        let me = match self.state().current_user {
            Some(ref user) => user.clone(),
            None => return compat::mystery(),
        };
        let mut rng = lock(&self.inner.rng);
        compat::score(&me, candidate, &mut *rng)
    }
}
