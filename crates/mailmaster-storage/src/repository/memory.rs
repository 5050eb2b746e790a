//! In-memory repositories
//!
//! A single [`InMemoryRepository`] implements every repository trait over
//! shared tables. It enforces the same unique and foreign key rules as the
//! PostgreSQL schema, so it can stand in for the database in development
//! and in tests.

use crate::models::{
    Campaign, CreateCampaign, CreateNewsletter, CreateSubscriber, CreateUser, Newsletter, Page,
    PageRequest, PersonalAccessToken, Subscriber, UpdateCampaign, UpdateNewsletter,
    UpdateSubscriber, User,
};
use crate::repository::{
    CampaignRepositoryTrait, NewsletterRepositoryTrait, SubscriberRepositoryTrait,
    TokenRepositoryTrait, UserRepositoryTrait,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailmaster_common::types::{
    CampaignId, CampaignStatus, NewsletterId, SubscriberId, TokenId, UserId,
};
use mailmaster_common::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    tokens: HashMap<TokenId, PersonalAccessToken>,
    newsletters: HashMap<NewsletterId, Newsletter>,
    subscribers: HashMap<SubscriberId, Subscriber>,
    campaigns: HashMap<CampaignId, Campaign>,
}

/// In-memory implementation of all repositories
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, ids break timestamp ties
fn paginate<T: Clone>(
    rows: &HashMap<Uuid, T>,
    page: PageRequest,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Page<T> {
    let mut items: Vec<(&Uuid, &T)> = rows.iter().collect();
    items.sort_by(|a, b| (created_at(b.1), b.0).cmp(&(created_at(a.1), a.0)));

    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .map(|(_, row)| row.clone())
        .collect();

    Page { items, total }
}

fn email_taken() -> Error {
    Error::validation("email", "The email has already been taken.")
}

fn unknown_newsletter() -> Error {
    Error::validation("newsletter_id", "The selected newsletter id is invalid.")
}

#[async_trait]
impl UserRepositoryTrait for InMemoryRepository {
    async fn create(&self, input: CreateUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(email_taken());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl TokenRepositoryTrait for InMemoryRepository {
    async fn create(
        &self,
        user_id: UserId,
        name: &str,
        token_hash: &str,
    ) -> Result<PersonalAccessToken> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(Error::Database(format!("Unknown user {}", user_id)));
        }

        let token = PersonalAccessToken {
            id: Uuid::now_v7(),
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            last_used_at: None,
            created_at: Utc::now(),
        };
        tables.tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PersonalAccessToken>> {
        Ok(self
            .tables
            .read()
            .await
            .tokens
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn touch(&self, id: TokenId) -> Result<()> {
        if let Some(token) = self.tables.write().await.tokens.get_mut(&id) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.tokens.len();
        tables.tokens.retain(|_, t| t.user_id != user_id);
        Ok((before - tables.tokens.len()) as u64)
    }
}

#[async_trait]
impl NewsletterRepositoryTrait for InMemoryRepository {
    async fn create(&self, input: CreateNewsletter) -> Result<Newsletter> {
        let now = Utc::now();
        let newsletter = Newsletter {
            id: Uuid::now_v7(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .newsletters
            .insert(newsletter.id, newsletter.clone());
        Ok(newsletter)
    }

    async fn get(&self, id: NewsletterId) -> Result<Option<Newsletter>> {
        Ok(self.tables.read().await.newsletters.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Newsletter>> {
        Ok(paginate(&self.tables.read().await.newsletters, page, |n| {
            n.created_at
        }))
    }

    async fn update(
        &self,
        id: NewsletterId,
        input: UpdateNewsletter,
    ) -> Result<Option<Newsletter>> {
        let mut tables = self.tables.write().await;
        let Some(newsletter) = tables.newsletters.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            newsletter.title = title;
        }
        if let Some(content) = input.content {
            newsletter.content = content;
        }
        newsletter.updated_at = Utc::now();
        Ok(Some(newsletter.clone()))
    }

    async fn delete(&self, id: NewsletterId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.newsletters.remove(&id).is_some();
        if removed {
            tables.campaigns.retain(|_, c| c.newsletter_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl SubscriberRepositoryTrait for InMemoryRepository {
    async fn create(&self, input: CreateSubscriber) -> Result<Subscriber> {
        let mut tables = self.tables.write().await;
        if tables.subscribers.values().any(|s| s.email == input.email) {
            return Err(email_taken());
        }

        let now = Utc::now();
        let subscriber = Subscriber {
            id: Uuid::now_v7(),
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        tables
            .subscribers
            .insert(subscriber.id, subscriber.clone());
        Ok(subscriber)
    }

    async fn get(&self, id: SubscriberId) -> Result<Option<Subscriber>> {
        Ok(self.tables.read().await.subscribers.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        Ok(self
            .tables
            .read()
            .await
            .subscribers
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Subscriber>> {
        Ok(paginate(&self.tables.read().await.subscribers, page, |s| {
            s.created_at
        }))
    }

    async fn all(&self) -> Result<Vec<Subscriber>> {
        let tables = self.tables.read().await;
        let mut subscribers: Vec<Subscriber> = tables.subscribers.values().cloned().collect();
        subscribers.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(subscribers)
    }

    async fn update(
        &self,
        id: SubscriberId,
        input: UpdateSubscriber,
    ) -> Result<Option<Subscriber>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &input.email {
            if tables
                .subscribers
                .values()
                .any(|s| s.id != id && &s.email == email)
            {
                return Err(email_taken());
            }
        }

        let Some(subscriber) = tables.subscribers.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = input.email {
            subscriber.email = email;
        }
        if let Some(name) = input.name {
            subscriber.name = name;
        }
        subscriber.updated_at = Utc::now();
        Ok(Some(subscriber.clone()))
    }

    async fn delete(&self, id: SubscriberId) -> Result<bool> {
        Ok(self.tables.write().await.subscribers.remove(&id).is_some())
    }
}

#[async_trait]
impl CampaignRepositoryTrait for InMemoryRepository {
    async fn create(&self, input: CreateCampaign) -> Result<Campaign> {
        let mut tables = self.tables.write().await;
        if !tables.newsletters.contains_key(&input.newsletter_id) {
            return Err(unknown_newsletter());
        }

        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::now_v7(),
            newsletter_id: input.newsletter_id,
            title: input.title,
            subject: input.subject,
            status: input.status.to_string(),
            sent_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    async fn get(&self, id: CampaignId) -> Result<Option<Campaign>> {
        Ok(self.tables.read().await.campaigns.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Campaign>> {
        Ok(paginate(&self.tables.read().await.campaigns, page, |c| {
            c.created_at
        }))
    }

    async fn update(&self, id: CampaignId, input: UpdateCampaign) -> Result<Option<Campaign>> {
        let mut tables = self.tables.write().await;
        if let Some(newsletter_id) = input.newsletter_id {
            if !tables.newsletters.contains_key(&newsletter_id) {
                return Err(unknown_newsletter());
            }
        }

        let Some(campaign) = tables.campaigns.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(newsletter_id) = input.newsletter_id {
            campaign.newsletter_id = newsletter_id;
        }
        if let Some(title) = input.title {
            campaign.title = title;
        }
        if let Some(subject) = input.subject {
            campaign.subject = subject;
        }
        if let Some(status) = input.status {
            campaign.status = status.to_string();
        }
        campaign.updated_at = Utc::now();
        Ok(Some(campaign.clone()))
    }

    async fn delete(&self, id: CampaignId) -> Result<bool> {
        Ok(self.tables.write().await.campaigns.remove(&id).is_some())
    }

    async fn mark_pending(
        &self,
        id: CampaignId,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<Campaign>> {
        let mut tables = self.tables.write().await;
        let Some(campaign) = tables.campaigns.get_mut(&id) else {
            return Ok(None);
        };

        campaign.status = CampaignStatus::Pending.to_string();
        campaign.sent_at = Some(sent_at);
        campaign.updated_at = Utc::now();
        Ok(Some(campaign.clone()))
    }
}
