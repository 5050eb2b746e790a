//! Database models

use chrono::{DateTime, Utc};
use mailmaster_common::types::{
    CampaignId, CampaignStatus, NewsletterId, SubscriberId, TokenId, UserId, UserRole,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Get role enum, unknown roles are treated as editor
    pub fn role_enum(&self) -> UserRole {
        self.role.parse().unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role_enum() == UserRole::Admin
    }
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Personal access token model; only the SHA-256 of the token is stored
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PersonalAccessToken {
    pub id: TokenId,
    pub user_id: UserId,
    pub name: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Newsletter model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Newsletter {
    pub id: NewsletterId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create newsletter input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsletter {
    pub title: String,
    pub content: String,
}

/// Update newsletter input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNewsletter {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Subscriber model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create subscriber input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriber {
    pub email: String,
    pub name: Option<String>,
}

/// Update subscriber input
///
/// `name: Some(None)` clears the name, `name: None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriber {
    pub email: Option<String>,
    pub name: Option<Option<String>>,
}

/// Campaign model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub newsletter_id: NewsletterId,
    pub title: String,
    pub subject: String,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Get status enum
    pub fn status_enum(&self) -> Option<CampaignStatus> {
        self.status.parse().ok()
    }

    pub fn is_draft(&self) -> bool {
        self.status_enum() == Some(CampaignStatus::Draft)
    }
}

/// Create campaign input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub newsletter_id: NewsletterId,
    pub title: String,
    pub subject: String,
    pub status: CampaignStatus,
}

/// Update campaign input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCampaign {
    pub newsletter_id: Option<NewsletterId>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub status: Option<CampaignStatus>,
}

/// One page of a listing together with the total row count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Zero-based window into a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    /// Window for a one-based page number; pages below 1 are clamped to 1
    pub fn for_page(page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        Self {
            limit: per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }
}
