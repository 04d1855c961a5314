//! Local, field-level session edits
//!
//! A patch records what a successful remote call changed so the cached
//! session can follow without a full profile refetch.

use tracing::debug;

use super::model::{MemberOrg, OwnedOrg, Session};

/// One atomic edit of a [`Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPatch {
    /// The user founded an organization and is now its owner
    FoundedOrg(OwnedOrg),
    /// The user joined an organization as a plain member
    JoinedOrg(MemberOrg),
    /// The user left their organization
    LeftOrg,
    /// The owner edited the organization identity
    OrgIdentityUpdated {
        name: Option<String>,
        description: Option<String>,
        image_url: Option<String>,
    },
    /// The owner handed the organization to another member
    OwnershipTransferred,
    /// The user's role in the member organization changed
    RoleChanged {
        role_name: Option<String>,
        can_create_task: bool,
    },
    /// Fresh experience total from the server
    XpChanged(i64),
    /// Profile fetch: fresh XP plus the role, when the server reports one
    ProfileSynced {
        total_xp: i64,
        role_name: Option<String>,
        can_create_task: Option<bool>,
    },
}

impl SessionPatch {
    /// Apply the edit, then restore the membership invariants
    pub fn apply(&self, session: &mut Session) {
        match self {
            Self::FoundedOrg(owned) => {
                session.member_org = Some(MemberOrg::from(owned));
                session.owned_org = Some(owned.clone());
                session.user.role_name = None;
                session.user.can_create_task = true;
            }
            Self::JoinedOrg(member) => {
                if session.is_owner() {
                    debug!("Ignoring join patch for an organization owner");
                } else {
                    session.member_org = Some(member.clone());
                    session.user.role_name = None;
                    session.user.can_create_task = false;
                }
            }
            Self::LeftOrg => {
                if session.is_owner() {
                    debug!("Ignoring leave patch for an organization owner");
                } else {
                    session.member_org = None;
                    session.user.role_name = None;
                    session.user.can_create_task = false;
                }
            }
            Self::OrgIdentityUpdated {
                name,
                description,
                image_url,
            } => {
                if let Some(owned) = session.owned_org.as_mut() {
                    if let Some(name) = name {
                        owned.name = name.clone();
                        if let Some(member) = session.member_org.as_mut() {
                            if member.org_id == owned.org_id {
                                member.name = name.clone();
                            }
                        }
                    }
                    if let Some(description) = description {
                        owned.description = Some(description.clone());
                    }
                    if let Some(image_url) = image_url {
                        owned.image_url = Some(image_url.clone());
                    }
                }
            }
            Self::OwnershipTransferred => {
                if let Some(owned) = session.owned_org.take() {
                    session.member_org = Some(MemberOrg::from(&owned));
                    session.user.role_name = None;
                    session.user.can_create_task = false;
                }
            }
            Self::RoleChanged {
                role_name,
                can_create_task,
            } => change_role(session, role_name.as_deref(), *can_create_task),
            Self::XpChanged(total_xp) => {
                session.user.total_xp = *total_xp;
            }
            Self::ProfileSynced {
                total_xp,
                role_name,
                can_create_task,
            } => {
                session.user.total_xp = *total_xp;
                if let Some(can_create_task) = can_create_task {
                    change_role(session, role_name.as_deref(), *can_create_task);
                }
            }
        }

        session.reconcile();
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FoundedOrg(_) => "founded_org",
            Self::JoinedOrg(_) => "joined_org",
            Self::LeftOrg => "left_org",
            Self::OrgIdentityUpdated { .. } => "org_identity_updated",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::RoleChanged { .. } => "role_changed",
            Self::XpChanged(_) => "xp_changed",
            Self::ProfileSynced { .. } => "profile_synced",
        }
    }
}

/// Owners keep creation rights whatever role the server reports
fn change_role(session: &mut Session, role_name: Option<&str>, can_create_task: bool) {
    if !session.is_owner() && session.member_org.is_some() {
        session.user.role_name = role_name.map(str::to_string);
        session.user.can_create_task = can_create_task;
    }
}
