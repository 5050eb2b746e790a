//! Common types for MailMaster

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for users
pub type UserId = Uuid;

/// Unique identifier for personal access tokens
pub type TokenId = Uuid;

/// Unique identifier for newsletters
pub type NewsletterId = Uuid;

/// Unique identifier for subscribers
pub type SubscriberId = Uuid;

/// Unique identifier for campaigns
pub type CampaignId = Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Editor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Campaign status
///
/// Only `Draft -> Pending` is ever performed; `Sent` and `Failed` exist so
/// that clients may set them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Pending,
    Sent,
    Failed,
}

impl CampaignStatus {
    /// Every accepted status, in declaration order
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Draft,
        CampaignStatus::Pending,
        CampaignStatus::Sent,
        CampaignStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Pending => "pending",
            CampaignStatus::Sent => "sent",
            CampaignStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "pending" => Ok(CampaignStatus::Pending),
            "sent" => Ok(CampaignStatus::Sent),
            "failed" => Ok(CampaignStatus::Failed),
            _ => Err(format!("Invalid campaign status: {}", s)),
        }
    }
}

/// Number of records returned per listing page
pub const PER_PAGE: i64 = 10;
