//! Request bodies and response shapes at the API boundary
//!
//! Responses are coerced into the typed model here so nothing deeper in the
//! call chain depends on the raw JSON.

use serde::{Deserialize, Serialize};

use urquest_core::org::{OrgIdentityUpdate, RoleDraft, RoleId};
use urquest_core::quest::{QuestDraft, QuestId};
use urquest_core::session::{MemberOrg, OrgId, OwnedOrg, Session, UserId, UserIdentity};
use urquest_core::submission::{ReviewAction, SubmissionId};

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Reply to `POST /auth/login`
///
/// Older servers send the owned organization as `org`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: UserIdentity,
    #[serde(default)]
    pub owned_org: Option<OwnedOrg>,
    #[serde(default)]
    pub member_org: Option<MemberOrg>,
    #[serde(default)]
    pub org: Option<OwnedOrg>,
}

impl LoginResponse {
    pub fn into_session(self) -> Session {
        let mut session = Session {
            user: self.user,
            owned_org: self.owned_org.or(self.org),
            member_org: self.member_org,
        };
        session.reconcile();
        session
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Organization reference returned by create/join; fields may be omitted
#[derive(Debug, Default, Deserialize)]
pub struct OrgReply {
    #[serde(default)]
    pub org_id: Option<OrgId>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrgRequest<'a> {
    pub owner_user_id: &'a UserId,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MembershipRequest<'a> {
    pub user_id: &'a UserId,
    pub org_id: OrgId,
}

#[derive(Debug, Serialize)]
pub struct UpdateOrgRequest<'a> {
    pub org_id: OrgId,
    #[serde(flatten)]
    pub update: &'a OrgIdentityUpdate,
}

#[derive(Debug, Serialize)]
pub struct TransferOwnershipRequest<'a> {
    pub org_id: OrgId,
    pub new_owner_id: &'a UserId,
}

#[derive(Debug, Serialize)]
pub struct CreateRoleRequest<'a> {
    pub org_id: OrgId,
    #[serde(flatten)]
    pub role: &'a RoleDraft,
}

#[derive(Debug, Serialize)]
pub struct AssignRoleRequest<'a> {
    pub org_id: OrgId,
    pub user_id: &'a UserId,
    pub role_id: RoleId,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_org_id: Option<OrgId>,
    pub creator_user_id: &'a UserId,
    #[serde(flatten)]
    pub draft: &'a QuestDraft,
}

#[derive(Debug, Serialize)]
pub struct ReviewRequest<'a> {
    pub submission_id: SubmissionId,
    pub action: ReviewAction,
    pub feedback: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SubmitProofRequest<'a> {
    pub task_id: QuestId,
    pub user_id: &'a UserId,
    pub proof_link: &'a str,
}
