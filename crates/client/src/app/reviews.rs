//! Submission review queue

use serde_json::Value;
use tracing::info;

use urquest_core::authz::Capability;
use urquest_core::submission::{ReviewAction, ReviewItem, SubmissionId};

use super::QuestApp;
use crate::endpoints;
use crate::error::Result;
use crate::wire::ReviewRequest;

impl QuestApp {
    /// Pending submissions for the organization
    pub async fn reviews(&self) -> Result<Vec<ReviewItem>> {
        let (_, org_id) = self.org_scope(Some(Capability::ReviewSubmissions)).await?;
        let path = endpoints::with_query(endpoints::ORG_REVIEWS, "org_id", &org_id.to_string());
        Ok(self.remote.get(&path).await?)
    }

    /// Approve or reject a submission; blank feedback uses the stock reply
    pub async fn review(
        &self,
        submission_id: SubmissionId,
        action: ReviewAction,
        feedback: Option<&str>,
    ) -> Result<()> {
        self.authorized(Capability::ReviewSubmissions).await?;
        let feedback = feedback
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| action.default_feedback());

        let _: Value = self
            .remote
            .post(
                endpoints::SUBMISSIONS_REVIEW,
                &ReviewRequest {
                    submission_id,
                    action,
                    feedback,
                },
            )
            .await?;
        info!(submission_id, action = action.as_str(), "Submission reviewed");
        self.notifier
            .success(format!("SUBMISSION {}", action.outcome().as_str()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::*;
    use crate::error::ClientError;
    use crate::test_support::StubBackend;
    use reqwest::Method;
    use serde_json::json;
    use urquest_core::submission::ReviewAction;

    #[tokio::test]
    async fn test_reviews_for_delegated_creator() {
        let backend = StubBackend::new()
            .respond(
                Method::GET,
                "/org/reviews",
                200,
                json!([{
                    "submission_id": 8,
                    "task_title": "Map the caves",
                    "student_name": "Ada",
                    "proof_link": "https://proof.test/8",
                    "xp_reward": 40
                }]),
            )
            .start()
            .await;
        let harness = Harness::new(&backend.base_url, Some(member(true))).await;

        let items = harness.app.reviews().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].student_name, "Ada");
        assert_eq!(backend.requests()[0].query.as_deref(), Some("org_id=5"));
    }

    #[tokio::test]
    async fn test_plain_member_cannot_review() {
        let backend = StubBackend::new().start().await;
        let mut harness = Harness::new(&backend.base_url, Some(member(false))).await;

        let error = harness.app.reviews().await.unwrap_err();
        assert!(matches!(error, ClientError::NotPermitted(_)));
        let error = harness
            .app
            .review(8, ReviewAction::Approve, None)
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "REVIEW RIGHTS REQUIRED");

        assert!(backend.requests().is_empty());
        assert_eq!(harness.drain().len(), 2);
    }

    #[tokio::test]
    async fn test_review_uses_default_feedback() {
        let backend = StubBackend::new()
            .respond(Method::POST, "/submissions/review", 200, json!({"status": "success"}))
            .start()
            .await;
        let mut harness = Harness::new(&backend.base_url, Some(owner())).await;

        harness
            .app
            .review(8, ReviewAction::Approve, None)
            .await
            .unwrap();
        harness
            .app
            .review(9, ReviewAction::Reject, Some("  "))
            .await
            .unwrap();
        harness
            .app
            .review(10, ReviewAction::Reject, Some("Blurry photo"))
            .await
            .unwrap();

        let hits = backend.requests();
        assert_eq!(
            hits[0].body,
            json!({"submission_id": 8, "action": "APPROVE", "feedback": "Excellent work"})
        );
        assert_eq!(hits[1].body["feedback"], "Insufficient data");
        assert_eq!(hits[2].body["feedback"], "Blurry photo");

        let messages: Vec<_> = harness.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec!["SUBMISSION APPROVED", "SUBMISSION REJECTED", "SUBMISSION REJECTED"]
        );
    }
}
