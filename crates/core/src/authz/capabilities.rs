//! Capability derivation from a session snapshot

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::session::Session;

/// Where the current user stands in their organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationRole {
    #[default]
    None,
    Member,
    DelegatedCreator,
    Owner,
}

impl OrganizationRole {
    /// Derive the role, treating `owned_org` as authoritative
    pub fn of(session: &Session) -> Self {
        if let Some(owned) = &session.owned_org {
            if session.member_org.as_ref().map(|m| m.org_id) != Some(owned.org_id) {
                warn!(
                    owned_org = owned.org_id,
                    "Owned organization missing from membership; treating user as owner"
                );
            }
            return Self::Owner;
        }

        match (&session.member_org, session.user.can_create_task) {
            (None, _) => Self::None,
            (Some(_), true) => Self::DelegatedCreator,
            (Some(_), false) => Self::Member,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Member => "member",
            Self::DelegatedCreator => "delegated_creator",
            Self::Owner => "owner",
        }
    }

    pub fn is_member(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Owner or a member whose role grants creation rights
    pub fn can_create(self) -> bool {
        matches!(self, Self::Owner | Self::DelegatedCreator)
    }

    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single gated action, used to ask [`Capabilities::allows`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageOrg,
    LeaveOrg,
    CreatePrivateTask,
    CreatePublicTask,
    ReviewSubmissions,
    AssignRoles,
    EditOrgIdentity,
    TransferOwnership,
    JoinOrg,
    FoundOrg,
}

impl Capability {
    /// Message shown when the action is not available
    pub fn denial(self) -> &'static str {
        match self {
            Self::ManageOrg => "ORGANIZATION ACCESS REQUIRED",
            Self::LeaveOrg => "OWNERS MUST TRANSFER OWNERSHIP BEFORE LEAVING",
            Self::CreatePrivateTask => "PRIVATE QUESTS REQUIRE CREATION RIGHTS",
            Self::CreatePublicTask => "LOGIN REQUIRED",
            Self::ReviewSubmissions => "REVIEW RIGHTS REQUIRED",
            Self::AssignRoles => "ONLY THE OWNER CAN MANAGE ROLES",
            Self::EditOrgIdentity => "ONLY THE OWNER CAN EDIT THE ORGANIZATION",
            Self::TransferOwnership => "ONLY THE OWNER CAN TRANSFER OWNERSHIP",
            Self::JoinOrg => "LEAVE YOUR CURRENT ORGANIZATION FIRST",
            Self::FoundOrg => "YOU ALREADY OWN AN ORGANIZATION",
        }
    }
}

/// Everything the view layer needs to enable or hide affordances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub is_authenticated: bool,
    pub organization_role: OrganizationRole,
    pub can_manage_org: bool,
    pub can_leave_org: bool,
    pub can_create_private_task: bool,
    pub can_create_public_task: bool,
    pub can_review_submissions: bool,
    pub can_assign_roles: bool,
    pub can_edit_org_identity: bool,
    pub can_transfer_ownership: bool,
    pub can_join_org: bool,
    pub can_found_org: bool,
}

impl Capabilities {
    /// Derive capabilities; no session yields all-false
    pub fn derive(session: Option<&Session>) -> Self {
        let Some(session) = session else {
            return Self::default();
        };

        let role = OrganizationRole::of(session);
        Self {
            is_authenticated: true,
            organization_role: role,
            can_manage_org: role.can_create(),
            can_leave_org: matches!(
                role,
                OrganizationRole::Member | OrganizationRole::DelegatedCreator
            ),
            can_create_private_task: role.can_create(),
            can_create_public_task: true,
            can_review_submissions: role.can_create(),
            can_assign_roles: role.is_owner(),
            can_edit_org_identity: role.is_owner(),
            can_transfer_ownership: role.is_owner(),
            can_join_org: !role.is_member(),
            can_found_org: !role.is_owner(),
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageOrg => self.can_manage_org,
            Capability::LeaveOrg => self.can_leave_org,
            Capability::CreatePrivateTask => self.can_create_private_task,
            Capability::CreatePublicTask => self.can_create_public_task,
            Capability::ReviewSubmissions => self.can_review_submissions,
            Capability::AssignRoles => self.can_assign_roles,
            Capability::EditOrgIdentity => self.can_edit_org_identity,
            Capability::TransferOwnership => self.can_transfer_ownership,
            Capability::JoinOrg => self.can_join_org,
            Capability::FoundOrg => self.can_found_org,
        }
    }
}
