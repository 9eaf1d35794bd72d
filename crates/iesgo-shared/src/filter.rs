//! Discovery feed derivation.
//!
//! [`potential_matches`] is a pure function of the catalog, the swipe log and
//! the active filters. It never reorders: candidates come out in catalog
//! order.

use serde::{Deserialize, Serialize};

use crate::types::{SwipeAction, User};

/// Toggle sets of interest tags and courses. Selection order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub interests: Vec<String>,
    pub courses: Vec<String>,
}

impl Filters {
    pub fn toggle_interest(&mut self, interest: &str) {
        toggle(&mut self.interests, interest);
    }

    pub fn toggle_course(&mut self, course: &str) {
        toggle(&mut self.courses, course);
    }

    pub fn clear(&mut self) {
        self.interests.clear();
        self.courses.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.interests.is_empty() && self.courses.is_empty()
    }

    /// OR within each set, AND across the two sets.
    pub fn accepts(&self, candidate: &User) -> bool {
        if !self.interests.is_empty() && !candidate.has_any_interest(&self.interests) {
            return false;
        }
        if !self.courses.is_empty() {
            match candidate.course {
                Some(ref course) if self.courses.contains(course) => {}
                _ => return false,
            }
        }
        true
    }
}

fn toggle(set: &mut Vec<String>, value: &str) {
    if let Some(pos) = set.iter().position(|v| v == value) {
        set.remove(pos);
    } else {
        set.push(value.to_string());
    }
}

/// Candidates still eligible for `me`.
///
/// Excludes `me`, anyone `me` already swiped on (any action), then applies
/// the filters.
pub fn potential_matches<'a>(
    candidates: &'a [User],
    me: &User,
    swipes: &[SwipeAction],
    filters: &Filters,
) -> Vec<&'a User> {
    candidates
        .iter()
        .filter(|u| u.id != me.id)
        .filter(|u| {
            !swipes
                .iter()
                .any(|s| s.from_user_id == me.id && s.to_user_id == u.id)
        })
        .filter(|u| filters.accepts(u))
        .collect()
}
