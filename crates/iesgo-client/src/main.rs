use std::sync::Arc;

use tracing::{info, warn};

use iesgo_client_lib::{init_tracing, open_store, ClientConfig, Route, Session};
use iesgo_shared::constants::APP_NAME;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Tracing and configuration
    // -----------------------------------------------------------------------
    init_tracing();
    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");
    if !config.has_ai_credentials() {
        warn!("No Gemini API key configured, AI features run offline");
    }

    // -----------------------------------------------------------------------
    // 2. Storage and session restore
    // -----------------------------------------------------------------------
    let db = open_store(&config)?;
    if let Some(path) = db.path() {
        info!(path = %path.display(), "Opened local store");
    }

    let session = Session::restore(Arc::new(db), config);

    if !session.is_authenticated() {
        match std::env::var("IESGO_DEMO_EMAIL") {
            Ok(email) => {
                session.login(&email).await?;
            }
            Err(_) => {
                info!(
                    route = Route::Feed.resolve(false).path(),
                    "Not signed in; set IESGO_DEMO_EMAIL to sign in"
                );
                session.flush().await;
                return Ok(());
            }
        }
    }

    // -----------------------------------------------------------------------
    // 3. Discovery feed
    // -----------------------------------------------------------------------
    let feed = session.potential_matches();
    info!(candidates = feed.len(), matches = session.matches().len(), "Discovery feed");
    for candidate in &feed {
        let badge = session.compatibility(candidate);
        info!(
            id = %candidate.id,
            name = %candidate.name,
            course = candidate.course.as_deref().unwrap_or("-"),
            intention = candidate.intention.label(),
            score = badge.score,
            label = %badge.label,
            "Candidate"
        );
    }

    session.flush().await;
    info!("Done");
    Ok(())
}
