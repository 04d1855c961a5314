//! Session model definitions

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Server-assigned organization identifier
pub type OrgId = i64;

/// Server-assigned user identifier
///
/// The backend emits textual ids (`"alice"`), but numeric ids are accepted
/// and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

/// The authenticated user as cached in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(alias = "user_id")]
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub total_xp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(default)]
    pub can_create_task: bool,
}

impl UserIdentity {
    /// Create a plain user with no role and no creation rights
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            total_xp: 0,
            role_name: None,
            can_create_task: false,
        }
    }

    /// Set the role held in the member organization
    pub fn with_role(mut self, role_name: impl Into<String>, can_create_task: bool) -> Self {
        self.role_name = Some(role_name.into());
        self.can_create_task = can_create_task;
        self
    }

    /// Set creation rights without a role name
    pub fn with_can_create_task(mut self, can_create_task: bool) -> Self {
        self.can_create_task = can_create_task;
        self
    }
}

/// The organization this user founded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedOrg {
    pub org_id: OrgId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl OwnedOrg {
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            org_id,
            name: name.into(),
            description: None,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// The organization this user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberOrg {
    pub org_id: OrgId,
    #[serde(default)]
    pub name: String,
}

impl MemberOrg {
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            org_id,
            name: name.into(),
        }
    }
}

impl From<&OwnedOrg> for MemberOrg {
    fn from(owned: &OwnedOrg) -> Self {
        Self {
            org_id: owned.org_id,
            name: owned.name.clone(),
        }
    }
}

/// Authenticated identity plus organization membership/ownership snapshot
///
/// `owned_org` is authoritative: a founder is always a member of the
/// organization they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_org: Option<OwnedOrg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_org: Option<MemberOrg>,
}

impl Session {
    /// Create a session for a user outside any organization
    pub fn new(user: UserIdentity) -> Self {
        Self {
            user,
            owned_org: None,
            member_org: None,
        }
    }

    /// Set the owned organization
    pub fn with_owned_org(mut self, owned: OwnedOrg) -> Self {
        self.owned_org = Some(owned);
        self
    }

    /// Set the member organization
    pub fn with_member_org(mut self, member: MemberOrg) -> Self {
        self.member_org = Some(member);
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    pub fn is_owner(&self) -> bool {
        self.owned_org.is_some()
    }

    pub fn is_member(&self) -> bool {
        self.member_org.is_some() || self.owned_org.is_some()
    }

    /// Organization the user acts in, owned first
    pub fn org_id(&self) -> Option<OrgId> {
        self.owned_org
            .as_ref()
            .map(|o| o.org_id)
            .or_else(|| self.member_org.as_ref().map(|m| m.org_id))
    }

    /// Display name of the organization the user acts in
    pub fn org_name(&self) -> Option<&str> {
        self.owned_org
            .as_ref()
            .map(|o| o.name.as_str())
            .or_else(|| self.member_org.as_ref().map(|m| m.name.as_str()))
    }

    /// Re-establish the membership invariants.
    ///
    /// Returns true when the session had to be changed.
    pub fn reconcile(&mut self) -> bool {
        let mut changed = false;

        if let Some(owned) = &self.owned_org {
            let member_id = self.member_org.as_ref().map(|m| m.org_id);
            if member_id != Some(owned.org_id) {
                warn!(
                    owned_org = owned.org_id,
                    member_org = ?member_id,
                    "Session owner is not a member of the owned organization; using owned org"
                );
                self.member_org = Some(MemberOrg::from(owned));
                changed = true;
            }
            if !self.user.can_create_task {
                self.user.can_create_task = true;
                changed = true;
            }
        } else if self.member_org.is_none()
            && (self.user.role_name.is_some() || self.user.can_create_task)
        {
            self.user.role_name = None;
            self.user.can_create_task = false;
            changed = true;
        }

        changed
    }
}
