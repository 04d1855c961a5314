//! Organization roles

use serde_json::Value;
use tracing::info;

use urquest_core::authz::Capability;
use urquest_core::org::{sort_roles, Role, RoleDraft, RoleId};
use urquest_core::session::UserId;

use super::QuestApp;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::wire::{AssignRoleRequest, CreateRoleRequest};

impl QuestApp {
    /// Roles of the user's organization, ordered by rank
    pub async fn roles(&self) -> Result<Vec<Role>> {
        let (_, org_id) = self.org_scope(None).await?;
        let path = endpoints::with_query(endpoints::ORG_ROLES, "org_id", &org_id.to_string());
        let mut roles: Vec<Role> = self.remote.get(&path).await?;
        sort_roles(&mut roles);
        Ok(roles)
    }

    pub async fn create_role(&self, draft: RoleDraft) -> Result<Value> {
        let (_, org_id) = self.org_scope(Some(Capability::AssignRoles)).await?;
        self.check(draft.validate())?;

        let reply: Value = self
            .remote
            .post(
                endpoints::ORG_ROLES_CREATE,
                &CreateRoleRequest {
                    org_id,
                    role: &draft,
                },
            )
            .await?;
        info!(org_id, role = %draft.name, "Role created");
        self.notifier.success("ROLE CREATED");
        Ok(reply)
    }

    /// Give a member a role; the owner's own standing is not role-based
    pub async fn assign_role(&self, user_id: &UserId, role_id: RoleId) -> Result<()> {
        let (session, org_id) = self.org_scope(Some(Capability::AssignRoles)).await?;
        if user_id == session.user_id() {
            return Err(self.reject(ClientError::Validation(
                "THE OWNER CANNOT BE GIVEN A ROLE".to_string(),
            )));
        }

        let _: Value = self
            .remote
            .post(
                endpoints::ORG_ROLES_ASSIGN,
                &AssignRoleRequest {
                    org_id,
                    user_id,
                    role_id,
                },
            )
            .await?;
        info!(org_id, user = %user_id, role_id, "Role assigned");
        self.notifier.success("ROLE ASSIGNED");
        Ok(())
    }
}
