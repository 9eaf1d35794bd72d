//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the demo runs with zero
//! configuration; without a Gemini key the AI features fall back to their
//! offline behaviour.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use iesgo_shared::constants::{
    AUTO_REPLY_DELAY_MS, DEFAULT_MATCH_PROBABILITY, LOGIN_DELAY_MS, STUDY_OPENER_DELAY_MS,
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct ClientConfig {
    /// Gemini API key. `None` selects the offline collaborator.
    /// Env: `GEMINI_API_KEY`, then `API_KEY`
    pub gemini_api_key: Option<String>,

    /// Env: `GEMINI_MODEL`
    /// Default: `gemini-2.5-flash`
    pub gemini_model: String,

    /// Env: `GEMINI_BASE_URL`
    pub gemini_base_url: String,

    /// Directory holding `iesgo.db`. `None` uses the platform data dir.
    /// Env: `IESGO_DATA_DIR`
    pub data_dir: Option<PathBuf>,

    /// Chance that a like/study swipe matches, in `[0, 1]`.
    /// Env: `IESGO_MATCH_PROBABILITY`
    /// Default: `0.6`
    pub match_probability: f64,

    /// Env: `IESGO_LOGIN_DELAY_MS`
    pub login_delay: Duration,

    /// Env: `IESGO_STUDY_OPENER_DELAY_MS`
    pub study_opener_delay: Duration,

    /// Env: `IESGO_AUTO_REPLY_DELAY_MS`
    pub auto_reply_delay: Duration,

    /// Clear the whole store on logout instead of only this app's keys.
    /// Env: `IESGO_WIPE_ALL_ON_LOGOUT` (true/false)
    /// Default: `false`
    pub wipe_all_on_logout: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            data_dir: None,
            match_probability: DEFAULT_MATCH_PROBABILITY,
            login_delay: Duration::from_millis(LOGIN_DELAY_MS),
            study_opener_delay: Duration::from_millis(STUDY_OPENER_DELAY_MS),
            auto_reply_delay: Duration::from_millis(AUTO_REPLY_DELAY_MS),
            wipe_all_on_logout: false,
        }
    }
}

// The API key never ends up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("data_dir", &self.data_dir)
            .field("match_probability", &self.match_probability)
            .field("login_delay", &self.login_delay)
            .field("study_opener_delay", &self.study_opener_delay)
            .field("auto_reply_delay", &self.auto_reply_delay)
            .field("wipe_all_on_logout", &self.wipe_all_on_logout)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.gemini_model = model.trim().to_string();
        }

        if let Some(url) = lookup("GEMINI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.gemini_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(dir) = lookup("IESGO_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(val) = lookup("IESGO_MATCH_PROBABILITY") {
            match parse_probability(&val) {
                Ok(p) => config.match_probability = p,
                Err(e) => tracing::warn!(
                    value = %val,
                    error = %e,
                    "Invalid IESGO_MATCH_PROBABILITY, using default"
                ),
            }
        }

        if let Some(d) = duration_var(&lookup, "IESGO_LOGIN_DELAY_MS") {
            config.login_delay = d;
        }
        if let Some(d) = duration_var(&lookup, "IESGO_STUDY_OPENER_DELAY_MS") {
            config.study_opener_delay = d;
        }
        if let Some(d) = duration_var(&lookup, "IESGO_AUTO_REPLY_DELAY_MS") {
            config.auto_reply_delay = d;
        }

        if let Some(val) = lookup("IESGO_WIPE_ALL_ON_LOGOUT") {
            config.wipe_all_on_logout = val == "true" || val == "1";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }

    pub fn has_ai_credentials(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn duration_var<F>(lookup: &F, name: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(name)?;
    match val.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(var = name, value = %val, "Invalid millisecond value, using default");
            None
        }
    }
}

fn parse_probability(val: &str) -> Result<f64, String> {
    let p: f64 = val
        .trim()
        .parse()
        .map_err(|e| format!("not a number: {e}"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is outside [0, 1]"))
    }
}
