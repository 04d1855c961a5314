//! Quest creation, discovery and proof submission

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use urquest_core::authz::Capability;
use urquest_core::quest::{Quest, QuestDraft, QuestId, Visibility};
use urquest_core::submission::ProofDraft;
use urquest_core::Capabilities;

use super::QuestApp;
use crate::endpoints;
use crate::error::Result;
use crate::wire::{CreateTaskRequest, SubmitProofRequest};

impl QuestApp {
    /// Publish a quest
    ///
    /// Private quests need creation rights in an organization; managers'
    /// quests are attributed to their organization.
    pub async fn create_task(&self, draft: QuestDraft) -> Result<()> {
        let required = match draft.visibility {
            Visibility::Private => Capability::CreatePrivateTask,
            Visibility::Public => Capability::CreatePublicTask,
        };
        let session = self.authorized(required).await?;
        self.check(draft.validate())?;

        let caps = Capabilities::derive(Some(&session));
        let creator_org_id = if caps.can_manage_org {
            session.org_id()
        } else {
            None
        };

        let _: Value = self
            .remote
            .post(
                endpoints::TASKS_CREATE,
                &CreateTaskRequest {
                    creator_org_id,
                    creator_user_id: session.user_id(),
                    draft: &draft,
                },
            )
            .await?;
        info!(
            title = %draft.title,
            visibility = %draft.visibility.as_str(),
            org_id = ?creator_org_id,
            "Quest created"
        );
        self.notifier.success("TASK DEPLOYED SUCCESSFULLY");
        Ok(())
    }

    /// Open quests the user may take on
    ///
    /// Private quests for other users and quests past their deadline are
    /// dropped even if the server lists them.
    pub async fn available_tasks(&self) -> Result<Vec<Quest>> {
        let session = self.authenticated().await?;
        let path = endpoints::with_query(
            endpoints::TASKS_AVAILABLE,
            "user_id",
            session.user_id().as_str(),
        );
        let quests: Vec<Quest> = self.remote.get(&path).await?;

        let today = Utc::now().date_naive();
        let total = quests.len();
        let visible: Vec<Quest> = quests
            .into_iter()
            .filter(|q| q.is_visible_to(session.user_id()) && !q.is_expired(today))
            .collect();
        if visible.len() != total {
            debug!(total, shown = visible.len(), "Filtered available quests");
        }
        Ok(visible)
    }

    pub async fn submit_proof(&self, task_id: QuestId, proof_link: &str) -> Result<()> {
        let session = self.authenticated().await?;
        let proof = ProofDraft::new(task_id, proof_link.trim());
        self.check(proof.validate())?;

        let _: Value = self
            .remote
            .post(
                endpoints::TASKS_SUBMIT,
                &SubmitProofRequest {
                    task_id: proof.task_id,
                    user_id: session.user_id(),
                    proof_link: &proof.proof_link,
                },
            )
            .await?;
        info!(task_id, "Proof submitted");
        self.notifier.success("MISSION DATA UPLOADED");
        Ok(())
    }
}
