use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Identifiers are opaque strings: seed profiles use `user_N`, the local
// profile uses `me`, generated records use a prefixed UUID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn generate() -> Self {
        Self(format!("match_{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn generate() -> Self {
        Self(format!("msg_{}", Uuid::new_v4()))
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Teacher,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Matutino,
    Vespertino,
    Noturno,
    Integral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intention {
    #[serde(rename = "Study Date")]
    StudyDate,
    Barzinho,
    Match,
}

impl Intention {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StudyDate => "Study Date",
            Self::Barzinho => "Barzinho",
            Self::Match => "Match",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeKind {
    Like,
    Pass,
    Study,
}

impl SwipeKind {
    /// Whether this action asks for a match at all.
    pub fn seeks_match(&self) -> bool {
        matches!(self, Self::Like | Self::Study)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Icebreaker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// A campus profile. The first photo is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
    pub role: UserRole,
    pub bio: String,
    pub photos: Vec<String>,
    pub interests: Vec<String>,
    pub gender: Gender,
    pub verified: bool,
    pub shift: Shift,
    pub intention: Intention,
}

impl User {
    pub fn primary_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }

    pub fn has_any_interest(&self, tags: &[String]) -> bool {
        self.interests.iter().any(|i| tags.contains(i))
    }
}

/// Partial profile edit. Present fields overwrite, absent ones are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub course: Option<String>,
    pub semester: Option<u32>,
    pub role: Option<UserRole>,
    pub bio: Option<String>,
    pub photos: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub gender: Option<Gender>,
    pub verified: Option<bool>,
    pub shift: Option<Shift>,
    pub intention: Option<Intention>,
}

impl ProfileUpdate {
    pub fn verified() -> Self {
        Self {
            verified: Some(true),
            ..Self::default()
        }
    }

    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.name {
            user.name = v;
        }
        if let Some(v) = self.age {
            user.age = v;
        }
        if let Some(v) = self.course {
            user.course = Some(v);
        }
        if let Some(v) = self.semester {
            user.semester = Some(v);
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = self.bio {
            user.bio = v;
        }
        if let Some(v) = self.photos {
            user.photos = v;
        }
        if let Some(v) = self.interests {
            user.interests = v;
        }
        if let Some(v) = self.gender {
            user.gender = v;
        }
        if let Some(v) = self.verified {
            user.verified = v;
        }
        if let Some(v) = self.shift {
            user.shift = v;
        }
        if let Some(v) = self.intention {
            user.intention = v;
        }
    }
}

/// One recorded swipe. The swipe log is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeAction {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub action: SwipeKind,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub users: [UserId; 2],
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<i64>,
    pub unread_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<Intention>,
}

impl Match {
    pub fn involves(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }

    /// The participant that is not `me`. `None` when `me` is not in the
    /// match at all.
    pub fn counterpart(&self, me: &UserId) -> Option<&UserId> {
        if !self.involves(me) {
            return None;
        }
        self.users.iter().find(|u| *u != me)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub match_id: MatchId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp: i64,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
