//! Submissions and their review

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::quest::QuestId;
use crate::{Error, Result};

pub type SubmissionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Reviewer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
        }
    }

    /// Feedback sent when the reviewer does not write any
    pub fn default_feedback(self) -> &'static str {
        match self {
            Self::Approve => "Excellent work",
            Self::Reject => "Insufficient data",
        }
    }

    /// Status the submission moves to
    pub fn outcome(self) -> SubmissionStatus {
        match self {
            Self::Approve => SubmissionStatus::Approved,
            Self::Reject => SubmissionStatus::Rejected,
        }
    }
}

impl FromStr for ReviewAction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported review action '{}'",
                value
            ))),
        }
    }
}

/// A pending submission as shown to reviewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub submission_id: SubmissionId,
    #[serde(default)]
    pub task_title: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub proof_link: String,
    #[serde(default)]
    pub xp_reward: i64,
}

/// Proof for a quest, before it is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofDraft {
    pub task_id: QuestId,
    pub proof_link: String,
}

impl ProofDraft {
    pub fn new(task_id: QuestId, proof_link: impl Into<String>) -> Self {
        Self {
            task_id,
            proof_link: proof_link.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.proof_link.trim().is_empty() {
            return Err(Error::InvalidInput("PROOF LINK REQUIRED".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_action_wire_and_outcome() {
        assert_eq!(
            serde_json::to_string(&ReviewAction::Approve).unwrap(),
            "\"APPROVE\""
        );
        assert_eq!(ReviewAction::Reject.outcome(), SubmissionStatus::Rejected);
        assert_eq!(ReviewAction::Approve.default_feedback(), "Excellent work");
        assert_eq!("rejected".parse::<ReviewAction>().unwrap(), ReviewAction::Reject);
    }

    #[test]
    fn test_review_item_from_server_row() {
        let item: ReviewItem = serde_json::from_str(
            r#"{"submission_id":8,"proof_link":"https://x.test/p","task_title":"Map","student_name":"bo","xp_reward":40}"#,
        )
        .unwrap();
        assert_eq!(item.submission_id, 8);
        assert_eq!(item.student_name, "bo");
    }

    #[test]
    fn test_proof_requires_link() {
        assert!(ProofDraft::new(1, "https://x.test").validate().is_ok());
        match ProofDraft::new(1, "").validate() {
            Err(Error::InvalidInput(msg)) => assert_eq!(msg, "PROOF LINK REQUIRED"),
            other => panic!("Expected InvalidInput, got: {:?}", other),
        }
    }
}
