//! Generative-AI collaborators: icebreaker suggestions and selfie checks.
//!
//! Both calls are infallible from the caller's point of view. Transport or
//! parsing problems are absorbed by the implementation and replaced with a
//! fixed fallback value.

pub mod gemini;
pub mod offline;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use iesgo_shared::types::User;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

pub use gemini::GeminiClient;
pub use offline::OfflineCollaborator;

/// Suggestion used when no API key is configured.
pub const ICEBREAKER_OFFLINE: &str = "Oi! Vi que temos interesses em comum. Como está seu semestre?";
/// Suggestion used when the model call fails.
pub const ICEBREAKER_ON_ERROR: &str =
    "Oi! Achei seu perfil muito legal. O que você gosta de fazer no tempo livre?";
/// Suggestion used when the model answers with nothing.
pub const ICEBREAKER_EMPTY: &str = "Oi! Tudo bem?";

pub const VERIFY_SIMULATED_REASON: &str = "Verificação simulada (sem API Key)";
pub const VERIFY_ERROR_REASON: &str = "Erro ao processar imagem. Tente novamente.";

/// Outcome of an identity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub verified: bool,
    pub reason: String,
}

impl Verdict {
    pub fn new(verified: bool, reason: impl Into<String>) -> Self {
        Self {
            verified,
            reason: reason.into(),
        }
    }
}

/// A selfie image to compare against the profile photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selfie {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Selfie {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL as produced by a browser
    /// file reader. A bare base64 payload is accepted as JPEG.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let (mime_type, payload) = match url.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| ClientError::InvalidSelfie("missing ',' separator".into()))?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| ClientError::InvalidSelfie("payload is not base64".into()))?;
                let mime = if mime.is_empty() { "image/jpeg" } else { mime };
                (mime.to_string(), payload)
            }
            None => ("image/jpeg".to_string(), url),
        };

        let data = STANDARD
            .decode(payload)
            .map_err(|e| ClientError::InvalidSelfie(e.to_string()))?;
        if data.is_empty() {
            return Err(ClientError::InvalidSelfie("empty image".into()));
        }

        Ok(Self { mime_type, data })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

pub trait AiCollaborator: Send + Sync {
    /// One short opening line for `me` to send to `candidate`.
    fn generate_icebreaker<'a>(&'a self, me: &'a User, candidate: &'a User)
        -> BoxFuture<'a, String>;

    /// Does `selfie` show the person in the profile photo at `profile_photo_url`?
    fn verify_identity<'a>(
        &'a self,
        profile_photo_url: &'a str,
        selfie: &'a Selfie,
    ) -> BoxFuture<'a, Verdict>;
}

/// Gemini when a key is configured, the offline stand-in otherwise.
pub fn collaborator_from_config(config: &ClientConfig) -> Arc<dyn AiCollaborator> {
    match config.gemini_api_key {
        Some(ref key) => {
            tracing::info!(model = %config.gemini_model, "using Gemini collaborator");
            Arc::new(GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            ))
        }
        None => {
            tracing::info!("no Gemini API key configured, AI features run offline");
            Arc::new(OfflineCollaborator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selfie_from_data_url() {
        let encoded = STANDARD.encode(b"\xFF\xD8fake-jpeg");
        let selfie = Selfie::from_data_url(&format!("data:image/png;base64,{encoded}")).unwrap();
        assert_eq!(selfie.mime_type, "image/png");
        assert_eq!(selfie.data, b"\xFF\xD8fake-jpeg");
        assert_eq!(selfie.to_base64(), encoded);
    }

    #[test]
    fn test_selfie_bare_base64_defaults_to_jpeg() {
        let selfie = Selfie::from_data_url(&STANDARD.encode(b"abc")).unwrap();
        assert_eq!(selfie.mime_type, "image/jpeg");
    }

    #[test]
    fn test_selfie_rejects_garbage() {
        assert!(Selfie::from_data_url("data:image/png;base64").is_err());
        assert!(Selfie::from_data_url("data:text/plain,hello").is_err());
        assert!(Selfie::from_data_url("***").is_err());
        assert!(Selfie::from_data_url("").is_err());
    }

    #[test]
    fn test_offline_without_key() {
        let config = ClientConfig::default();
        // just make sure construction does not need a network
        let _ = collaborator_from_config(&config);
    }
}
