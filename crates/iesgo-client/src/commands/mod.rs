//! Session operations.
//!
//! Each sub-module adds an `impl Session` block for one area of the app.
//! Operations that need a signed-in user quietly do nothing without one.

pub mod auth;
pub mod discovery;
pub mod messaging;
pub mod profile;
pub mod settings;

pub use profile::VerificationOutcome;

use crate::session::Session;

#[derive(Debug, Clone, Copy)]
pub(crate) enum BusyFlag {
    Loading,
    Verifying,
}

/// Lowers a busy flag when dropped, whatever path the operation took.
///
/// The flag is left alone if a logout happened in the meantime, since the
/// reset already cleared it. Never drop this while holding the state lock.
pub(crate) struct BusyGuard<'a> {
    session: &'a Session,
    epoch: u64,
    flag: BusyFlag,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn new(session: &'a Session, epoch: u64, flag: BusyFlag) -> Self {
        Self {
            session,
            epoch,
            flag,
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut st = self.session.state();
        if st.epoch != self.epoch {
            return;
        }
        match self.flag {
            BusyFlag::Loading => st.is_loading = false,
            BusyFlag::Verifying => st.is_verifying = false,
        }
    }
}
