//! # iesgo-client
//!
//! Session core of IESGO Connect: sign-in, the discovery feed, swiping,
//! matches and chat, plus the AI helpers for icebreakers and selfie
//! verification. A UI layer owns a [`Session`] and calls into it.

pub mod ai;
pub mod commands;
pub mod config;
pub mod decider;
pub mod error;
pub mod events;
pub mod persist;
pub mod routes;
pub mod session;
pub mod state;
pub mod tasks;

use iesgo_store::Database;
use tracing_subscriber::{fmt, EnvFilter};

pub use commands::VerificationOutcome;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::SessionEvent;
pub use routes::Route;
pub use session::{Session, SessionBuilder};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("iesgo_client_lib=debug,iesgo_client=debug,iesgo_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Open the SQLite store under `IESGO_DATA_DIR`, or under the platform data
/// directory when that is unset.
pub fn open_store(config: &ClientConfig) -> Result<Database> {
    let db = match config.data_dir {
        Some(ref dir) => Database::open_in(dir)?,
        None => Database::new()?,
    };
    Ok(db)
}
