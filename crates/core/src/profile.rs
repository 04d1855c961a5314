//! User profile and leaderboard projections

use serde::{Deserialize, Serialize};

use crate::submission::SubmissionStatus;

/// Experience needed per level
pub const XP_PER_LEVEL: i64 = 100;

/// Level reached with `total_xp` experience
pub fn level_for_xp(total_xp: i64) -> i64 {
    1 + total_xp.max(0) / XP_PER_LEVEL
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title: String,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub xp_reward: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub total_xp: i64,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Present when the server reports the user's role in their organization
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub can_create_task: Option<bool>,
}

impl Profile {
    /// Level as reported, or computed from XP
    pub fn level(&self) -> i64 {
        self.level.unwrap_or_else(|| self.expected_level())
    }

    pub fn expected_level(&self) -> i64 {
        level_for_xp(self.total_xp)
    }

    /// Experience earned from approved submissions in the history
    pub fn approved_xp(&self) -> i64 {
        self.history
            .iter()
            .filter(|h| h.status == SubmissionStatus::Approved)
            .map(|h| h.xp_reward)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(default)]
    pub total_xp: i64,
}

/// Podium placement for the top three positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a 1-based position
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }
}

/// Pair entries with their 1-based position, in server order
pub fn ranked(entries: &[LeaderboardEntry]) -> impl Iterator<Item = (usize, &LeaderboardEntry)> + '_ {
    entries.iter().enumerate().map(|(i, e)| (i + 1, e))
}
