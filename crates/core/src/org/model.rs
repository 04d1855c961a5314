//! Organization model definitions

use serde::{Deserialize, Serialize};

use crate::quest::Quest;
use crate::session::{OrgId, UserId};
use crate::{Error, Result};

/// Server-assigned role identifier
pub type RoleId = i64;

/// An organization-scoped permission tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: RoleId,
    pub name: String,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub can_create_task: bool,
}

/// Sort roles by rank, then name, for stable display
pub fn sort_roles(roles: &mut [Role]) {
    roles.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.name.cmp(&b.name)));
}

/// Input for creating a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDraft {
    pub name: String,
    pub rank: i64,
    pub can_create_task: bool,
}

impl RoleDraft {
    pub fn new(name: impl Into<String>, rank: i64) -> Self {
        Self {
            name: name.into(),
            rank,
            can_create_task: false,
        }
    }

    /// Grant task creation to holders of this role
    pub fn with_creation_rights(mut self) -> Self {
        self.can_create_task = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("ROLE NAME REQUIRED".into()));
        }
        Ok(())
    }
}

/// Changes to the organization identity; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrgIdentityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl OrgIdentityUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.image_url.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidInput("NOTHING TO UPDATE".into()));
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::InvalidInput("NAME REQUIRED".into()));
        }
        Ok(())
    }
}

/// Dashboard counters for an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrgStats {
    #[serde(default)]
    pub active_tasks: i64,
    #[serde(default)]
    pub pending_submissions: i64,
}

/// A member as listed for the organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMember {
    pub user_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub total_xp: i64,
    #[serde(default)]
    pub role_name: Option<String>,
}

/// An organization in the public directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgListing {
    pub org_id: OrgId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub member_count: Option<i64>,
}

/// Public profile of an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicOrg {
    pub org_id: OrgId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub owner_username: Option<String>,
    #[serde(default)]
    pub member_count: Option<i64>,
    #[serde(default)]
    pub tasks: Vec<Quest>,
}
