//! Quest model definitions

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::{OrgId, UserId};
use crate::{Error, Result};

/// Server-assigned quest identifier
pub type QuestId = i64;

/// Quest difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported difficulty '{}'",
                value
            ))),
        }
    }
}

/// Who can see a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported visibility '{}'",
                value
            ))),
        }
    }
}

/// Quest lifecycle status as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestStatus {
    #[default]
    Open,
    Closed,
    #[serde(other)]
    Other,
}

/// A quest as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub task_id: QuestId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub xp_reward: i64,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "optional_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub creator_org_id: Option<OrgId>,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignee_ids: Vec<UserId>,
    #[serde(default)]
    pub status: QuestStatus,
}

impl Quest {
    /// Whether the deadline has passed on `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.deadline.is_some_and(|deadline| deadline < today)
    }

    /// Whether `user` may see this quest
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Private => self.assignee_ids.contains(user),
        }
    }
}

/// Input for creating a new quest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestDraft {
    pub title: String,
    pub description: String,
    pub xp_reward: i64,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignee_ids: Vec<UserId>,
}

impl QuestDraft {
    /// Create a public draft with the given title and reward
    pub fn new(title: impl Into<String>, xp_reward: i64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            xp_reward,
            difficulty: Difficulty::default(),
            deadline: None,
            visibility: Visibility::default(),
            assignee_ids: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the difficulty
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Make the quest private to the given assignees
    pub fn private_to(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.visibility = Visibility::Private;
        self.assignee_ids = assignees.into_iter().collect();
        self
    }

    /// Check required input before anything is sent
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("TITLE REQUIRED".into()));
        }
        if self.xp_reward <= 0 {
            return Err(Error::InvalidInput("XP REWARD MUST BE POSITIVE".into()));
        }
        if self.visibility == Visibility::Private && self.assignee_ids.is_empty() {
            return Err(Error::InvalidInput(
                "PRIVATE QUESTS NEED AT LEAST ONE ASSIGNEE".into(),
            ));
        }
        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `null`, `""` or an ISO date
fn optional_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
