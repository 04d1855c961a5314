//! Player profile and leaderboard

use tracing::debug;

use urquest_core::profile::{LeaderboardEntry, Profile};
use urquest_core::{Session, SessionPatch};

use super::QuestApp;
use crate::endpoints;
use crate::error::Result;

impl QuestApp {
    /// The user's profile; the cached XP and role follow what the server reports
    pub async fn profile(&self) -> Result<Profile> {
        let (profile, _) = self.fetch_profile().await?;
        Ok(profile)
    }

    /// Re-sync the cached session from the server's profile
    pub async fn refresh_session(&self) -> Result<Session> {
        let (_, session) = self.fetch_profile().await?;
        Ok(session)
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.remote.get(endpoints::LEADERBOARD).await?)
    }

    async fn fetch_profile(&self) -> Result<(Profile, Session)> {
        let session = self.authenticated().await?;
        let path = endpoints::with_query(
            endpoints::USER_PROFILE,
            "user_id",
            session.user_id().as_str(),
        );
        let profile: Profile = self.remote.get(&path).await?;

        let session = self
            .apply_patch(SessionPatch::ProfileSynced {
                total_xp: profile.total_xp,
                role_name: profile.role_name.clone(),
                can_create_task: profile.can_create_task,
            })
            .await?;
        debug!(user = %session.user.id, total_xp = profile.total_xp, "Profile synced");
        Ok((profile, session))
    }
}
