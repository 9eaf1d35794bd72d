//! Navigation guard for the app's screens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Root,
    Login,
    Feed,
    Matches,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Feed => "/feed",
            Self::Matches => "/matches",
            Self::Profile => "/profile",
        }
    }

    /// Map a path to a route. Unknown paths land on the root.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/login" | "login" => Self::Login,
            "/feed" | "feed" => Self::Feed,
            "/matches" | "matches" => Self::Matches,
            "/profile" | "profile" => Self::Profile,
            _ => Self::Root,
        }
    }

    /// Screens that need a signed-in user.
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Feed | Self::Matches | Self::Profile)
    }

    /// Where a request for this route actually ends up.
    pub fn resolve(self, authenticated: bool) -> Self {
        let route = match self {
            Self::Root => Self::Feed,
            other => other,
        };
        match route {
            Self::Login if authenticated => Self::Feed,
            r if r.requires_session() && !authenticated => Self::Login,
            r => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse("/matches/"), Route::Matches);
        assert_eq!(Route::parse("/profile?tab=photos"), Route::Profile);
        assert_eq!(Route::parse("/nowhere"), Route::Root);
    }

    #[test]
    fn test_signed_out_is_sent_to_login() {
        for route in [Route::Root, Route::Feed, Route::Matches, Route::Profile] {
            assert_eq!(route.resolve(false), Route::Login);
        }
        assert_eq!(Route::Login.resolve(false), Route::Login);
    }

    #[test]
    fn test_signed_in_skips_login() {
        assert_eq!(Route::Login.resolve(true), Route::Feed);
        assert_eq!(Route::Root.resolve(true), Route::Feed);
        assert_eq!(Route::Matches.resolve(true), Route::Matches);
        assert_eq!(Route::Profile.resolve(true), Route::Profile);
    }
}
