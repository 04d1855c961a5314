//! Organization lifecycle: founding, joining, leaving, identity and ownership

use serde_json::Value;
use tracing::info;

use urquest_core::authz::Capability;
use urquest_core::org::{OrgIdentityUpdate, OrgListing, OrgMember, OrgStats, PublicOrg};
use urquest_core::session::{MemberOrg, OrgId, OwnedOrg, UserId};
use urquest_core::{Session, SessionPatch};

use super::QuestApp;
use crate::endpoints;
use crate::error::{ApiError, ClientError, Result};
use crate::wire::{
    CreateOrgRequest, MembershipRequest, OrgReply, TransferOwnershipRequest, UpdateOrgRequest,
};

impl QuestApp {
    /// Dashboard counters for the organization the user manages
    pub async fn org_stats(&self) -> Result<OrgStats> {
        let (_, org_id) = self.org_scope(Some(Capability::ManageOrg)).await?;
        let path = endpoints::with_query(endpoints::ORG_STATS, "org_id", &org_id.to_string());
        Ok(self.remote.get(&path).await?)
    }

    pub async fn members(&self) -> Result<Vec<OrgMember>> {
        let (_, org_id) = self.org_scope(None).await?;
        let path = endpoints::with_query(endpoints::ORG_MEMBERS, "org_id", &org_id.to_string());
        Ok(self.remote.get(&path).await?)
    }

    /// Found a new organization owned by the current user
    pub async fn create_org(&self, name: &str) -> Result<Session> {
        let session = self.authorized(Capability::FoundOrg).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(ClientError::Validation("NAME REQUIRED".to_string())));
        }

        let reply: OrgReply = self
            .remote
            .post(
                endpoints::ORG_CREATE,
                &CreateOrgRequest {
                    owner_user_id: session.user_id(),
                    name,
                },
            )
            .await?;
        let org_id = self.reply_org_id(&reply)?;

        let owned = OwnedOrg::new(org_id, reply.name.unwrap_or_else(|| name.to_string()));
        let session = self.apply_patch(SessionPatch::FoundedOrg(owned)).await?;
        info!(org_id, "Organization founded");
        self.notifier.success("ORGANIZATION ESTABLISHED");
        Ok(session)
    }

    pub async fn list_orgs(&self) -> Result<Vec<OrgListing>> {
        Ok(self.remote.get(endpoints::ORGS_LIST).await?)
    }

    pub async fn public_org(&self, org_id: OrgId) -> Result<PublicOrg> {
        Ok(self.remote.get(&endpoints::public_org(org_id)).await?)
    }

    pub async fn join_org(&self, org_id: OrgId) -> Result<Session> {
        let session = self.authorized(Capability::JoinOrg).await?;

        let reply: OrgReply = self
            .remote
            .post(
                endpoints::ORG_JOIN,
                &MembershipRequest {
                    user_id: session.user_id(),
                    org_id,
                },
            )
            .await?;

        let member = MemberOrg::new(reply.org_id.unwrap_or(org_id), reply.name.unwrap_or_default());
        let session = self.apply_patch(SessionPatch::JoinedOrg(member)).await?;
        info!(org_id, "Joined organization");
        self.notifier.success("ORGANIZATION JOINED");
        Ok(session)
    }

    pub async fn leave_org(&self) -> Result<Session> {
        let (session, org_id) = self.org_scope(Some(Capability::LeaveOrg)).await?;

        let _: Value = self
            .remote
            .post(
                endpoints::ORG_LEAVE,
                &MembershipRequest {
                    user_id: session.user_id(),
                    org_id,
                },
            )
            .await?;

        let session = self.apply_patch(SessionPatch::LeftOrg).await?;
        info!(org_id, "Left organization");
        self.notifier.success("LEFT ORGANIZATION");
        Ok(session)
    }

    /// Edit name, description or image of the owned organization
    pub async fn update_org(&self, update: OrgIdentityUpdate) -> Result<Session> {
        let (_, org_id) = self.org_scope(Some(Capability::EditOrgIdentity)).await?;
        self.check(update.validate())?;

        let _: Value = self
            .remote
            .post(
                endpoints::ORG_UPDATE,
                &UpdateOrgRequest {
                    org_id,
                    update: &update,
                },
            )
            .await?;

        let session = self
            .apply_patch(SessionPatch::OrgIdentityUpdated {
                name: update.name,
                description: update.description,
                image_url: update.image_url,
            })
            .await?;
        self.notifier.success("ORGANIZATION UPDATED");
        Ok(session)
    }

    /// Hand the owned organization to another member
    pub async fn transfer_ownership(&self, new_owner_id: &UserId) -> Result<Session> {
        let (session, org_id) = self.org_scope(Some(Capability::TransferOwnership)).await?;
        if new_owner_id.as_str().trim().is_empty() {
            return Err(self.reject(ClientError::Validation("NEW OWNER REQUIRED".to_string())));
        }
        if new_owner_id == session.user_id() {
            return Err(self.reject(ClientError::Validation(
                "CHOOSE ANOTHER MEMBER AS OWNER".to_string(),
            )));
        }

        let _: Value = self
            .remote
            .post(
                endpoints::ORG_TRANSFER_OWNERSHIP,
                &TransferOwnershipRequest {
                    org_id,
                    new_owner_id,
                },
            )
            .await?;

        let session = self.apply_patch(SessionPatch::OwnershipTransferred).await?;
        info!(org_id, new_owner = %new_owner_id, "Ownership transferred");
        self.notifier.success("OWNERSHIP TRANSFERRED");
        Ok(session)
    }

    fn reply_org_id(&self, reply: &OrgReply) -> Result<OrgId> {
        reply.org_id.ok_or_else(|| {
            let error = ApiError::malformed("Organization reply without org_id");
            self.reject(error.into())
        })
    }
}
