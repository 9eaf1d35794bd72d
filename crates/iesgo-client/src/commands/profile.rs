use serde::Serialize;
use tracing::{info, warn};

use iesgo_shared::types::{ProfileUpdate, User};

use crate::ai::Selfie;
use crate::commands::{BusyFlag, BusyGuard};
use crate::events::SessionEvent;
use crate::session::Session;

pub const VERIFY_OK_MESSAGE: &str = "Verificado com sucesso!";
pub const VERIFY_FAILED_MESSAGE: &str = "Falha na verificação.";
pub const VERIFY_BUSY_MESSAGE: &str = "Verificação já em andamento.";
pub const NOT_SIGNED_IN_MESSAGE: &str = "Usuário não logado";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub success: bool,
    pub message: String,
}

impl VerificationOutcome {
    fn success() -> Self {
        Self {
            success: true,
            message: VERIFY_OK_MESSAGE.to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl Session {
    pub fn current_user(&self) -> Option<User> {
        self.state().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn is_verifying(&self) -> bool {
        self.state().is_verifying
    }

    /// Merge `update` into the current user. Values are taken as-is.
    /// Returns the updated profile, or `None` when signed out.
    pub fn update_profile(&self, update: ProfileUpdate) -> Option<User> {
        let user = {
            let mut st = self.state();
            let user = st.current_user.as_mut()?;
            update.apply(user);
            let user = user.clone();
            self.persist_user(&st);
            user
        };

        info!(user = %user.id, "Profile updated");
        self.emit(SessionEvent::ProfileUpdated {
            user_id: user.id.clone(),
        });
        Some(user)
    }

    /// Compare a selfie against the profile photo and mark the profile
    /// verified on success.
    ///
    /// Only one attempt runs at a time; a second call while one is in flight
    /// returns immediately without contacting the collaborator.
    pub async fn verify_profile(&self, selfie: &Selfie) -> VerificationOutcome {
        let (photo, epoch) = {
            let mut st = self.state();
            let photo = match st.current_user {
                Some(ref user) => user.primary_photo().unwrap_or_default().to_string(),
                None => return VerificationOutcome::failure(NOT_SIGNED_IN_MESSAGE),
            };
            if st.is_verifying {
                return VerificationOutcome::failure(VERIFY_BUSY_MESSAGE);
            }
            st.is_verifying = true;
            (photo, st.epoch)
        };
        let busy = BusyGuard::new(self, epoch, BusyFlag::Verifying);

        let verdict = self.inner.ai.verify_identity(&photo, selfie).await;

        let outcome = if self.epoch() != epoch {
            warn!("Verification finished after logout, discarding");
            VerificationOutcome::failure(NOT_SIGNED_IN_MESSAGE)
        } else if verdict.verified {
            self.update_profile(ProfileUpdate::verified());
            VerificationOutcome::success()
        } else if verdict.reason.is_empty() {
            VerificationOutcome::failure(VERIFY_FAILED_MESSAGE)
        } else {
            VerificationOutcome::failure(verdict.reason)
        };
        drop(busy);

        info!(success = outcome.success, "Verification finished");
        self.emit(SessionEvent::VerificationFinished {
            success: outcome.success,
        });
        outcome
    }
}
