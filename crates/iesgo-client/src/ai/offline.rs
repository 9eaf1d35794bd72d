use futures::future::{self, BoxFuture, FutureExt};

use iesgo_shared::types::User;

use super::{AiCollaborator, Selfie, Verdict, ICEBREAKER_OFFLINE, VERIFY_SIMULATED_REASON};

/// Stand-in used when no credentials are configured. Every verification
/// succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCollaborator;

impl AiCollaborator for OfflineCollaborator {
    fn generate_icebreaker<'a>(
        &'a self,
        _me: &'a User,
        _candidate: &'a User,
    ) -> BoxFuture<'a, String> {
        future::ready(ICEBREAKER_OFFLINE.to_string()).boxed()
    }

    fn verify_identity<'a>(
        &'a self,
        _profile_photo_url: &'a str,
        _selfie: &'a Selfie,
    ) -> BoxFuture<'a, Verdict> {
        future::ready(Verdict::new(true, VERIFY_SIMULATED_REASON)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iesgo_shared::catalog::{default_profile, Catalog};
    use iesgo_shared::types::UserId;

    #[tokio::test]
    async fn test_offline_answers() {
        let ai = OfflineCollaborator;
        let me = default_profile("eu@iesgo.edu.br");
        let ana = Catalog::seed().get_or_placeholder(&UserId::from("user_2"));

        assert_eq!(ai.generate_icebreaker(&me, &ana).await, ICEBREAKER_OFFLINE);

        let selfie = Selfie::new("image/jpeg", vec![1, 2, 3]);
        let verdict = ai.verify_identity("https://picsum.photos/1", &selfie).await;
        assert!(verdict.verified);
        assert_eq!(verdict.reason, VERIFY_SIMULATED_REASON);
    }
}
