//! Subscriber handlers
//!
//! Subscribers carry no policy: any authenticated user may manage them,
//! deletion included.

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Extension, Json,
};
use mailmaster_common::{Error, Result};
use mailmaster_common::types::SubscriberId;
use mailmaster_storage::{CreateSubscriber, Store, Subscriber, UpdateSubscriber};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::info;

use crate::auth::{AppState, AuthUser};
use crate::error::ApiResult;
use crate::extract::{JsonBody, ResourceId};
use crate::pagination::{PageQuery, Paginated};
use crate::validation::Rules;

/// Distinguish `"name": null` (clear) from a missing `name` (keep)
fn nullable<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Request body for creating or updating a subscriber
#[derive(Debug, Default, Deserialize)]
pub struct SubscriberRequest {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
}

impl SubscriberRequest {
    fn validate_name(&self, rules: &mut Rules) {
        rules.max_chars("name", self.name.clone().flatten().as_deref(), 255);
    }

    /// Email format and uniqueness; `own` is the subscriber being updated
    async fn validate_email(
        &self,
        rules: &mut Rules,
        store: &Store,
        own: Option<SubscriberId>,
    ) -> Result<()> {
        let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            return Ok(());
        };
        rules.email("email", Some(email));
        if let Some(existing) = store.subscribers.get_by_email(email).await? {
            if Some(existing.id) != own {
                rules.taken("email");
            }
        }
        Ok(())
    }

    async fn into_create(self, store: &Store) -> Result<CreateSubscriber> {
        let mut rules = Rules::new();
        rules.required("email", self.email.as_deref());
        self.validate_email(&mut rules, store, None).await?;
        self.validate_name(&mut rules);
        rules.finish()?;

        Ok(CreateSubscriber {
            email: self.email.unwrap_or_default(),
            name: self.name.flatten().filter(|n| !n.trim().is_empty()),
        })
    }

    async fn into_update(self, id: SubscriberId, store: &Store) -> Result<UpdateSubscriber> {
        let mut rules = Rules::new();
        rules.filled("email", self.email.as_deref());
        self.validate_email(&mut rules, store, Some(id)).await?;
        self.validate_name(&mut rules);
        rules.finish()?;

        Ok(UpdateSubscriber {
            email: self.email,
            name: self
                .name
                .map(|name| name.filter(|n| !n.trim().is_empty())),
        })
    }
}

fn not_found(id: SubscriberId) -> Error {
    Error::NotFound(format!("Subscriber {}", id))
}

/// List subscribers
///
/// GET /api/subscribers
pub async fn list_subscribers(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paginated<Subscriber>>> {
    let page = state.store.subscribers.list(query.request()).await?;
    Ok(Json(Paginated::new(page, query.page(), state.url(uri.path()))))
}

/// Create a subscriber
///
/// POST /api/subscribers
pub async fn create_subscriber(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(req): JsonBody<SubscriberRequest>,
) -> ApiResult<(StatusCode, Json<Subscriber>)> {
    let input = req.into_create(&state.store).await?;

    let subscriber = state.store.subscribers.create(input).await?;
    info!(subscriber_id = %subscriber.id, user_id = %auth.0.id, "Created subscriber");

    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// Get a subscriber
///
/// GET /api/subscribers/:id
pub async fn get_subscriber(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Subscriber>> {
    let subscriber = state
        .store
        .subscribers
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(subscriber))
}

/// Update a subscriber
///
/// PUT /api/subscribers/:id
pub async fn update_subscriber(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
    JsonBody(req): JsonBody<SubscriberRequest>,
) -> ApiResult<Json<Subscriber>> {
    if state.store.subscribers.get(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    let input = req.into_update(id, &state.store).await?;

    let subscriber = state
        .store
        .subscribers
        .update(id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(subscriber_id = %id, user_id = %auth.0.id, "Updated subscriber");

    Ok(Json(subscriber))
}

/// Delete a subscriber
///
/// DELETE /api/subscribers/:id
pub async fn delete_subscriber(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    if !state.store.subscribers.delete(id).await? {
        return Err(not_found(id).into());
    }
    info!(subscriber_id = %id, user_id = %auth.0.id, "Deleted subscriber");

    Ok(StatusCode::NO_CONTENT)
}
