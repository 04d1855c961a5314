//! Backend paths

use urquest_core::session::OrgId;

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";

pub const ORG_STATS: &str = "/org/stats";
pub const ORG_MEMBERS: &str = "/org/members";
pub const ORG_ROLES: &str = "/org/roles";
pub const ORG_ROLES_CREATE: &str = "/org/roles/create";
pub const ORG_ROLES_ASSIGN: &str = "/org/roles/assign";
pub const ORG_UPDATE: &str = "/org/update";
pub const ORG_TRANSFER_OWNERSHIP: &str = "/org/transfer-ownership";
pub const ORG_REVIEWS: &str = "/org/reviews";
pub const ORG_CREATE: &str = "/org/create";
pub const ORG_JOIN: &str = "/org/join";
pub const ORG_LEAVE: &str = "/org/leave";
pub const ORGS_LIST: &str = "/orgs/list";

pub const TASKS_CREATE: &str = "/tasks/create";
pub const TASKS_AVAILABLE: &str = "/tasks/available";
pub const TASKS_SUBMIT: &str = "/tasks/submit";
pub const SUBMISSIONS_REVIEW: &str = "/submissions/review";

pub const USER_PROFILE: &str = "/user/profile";
pub const LEADERBOARD: &str = "/leaderboard";

pub fn public_org(org_id: OrgId) -> String {
    format!("/org/public/{}", org_id)
}

/// Append a single percent-encoded query parameter
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    format!("{}?{}={}", path, key, urlencoding::encode(value))
}
