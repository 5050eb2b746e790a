//! Newsletter handlers

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Extension, Json,
};
use mailmaster_common::{Error, Result};
use mailmaster_core::{authorize, Ability, NewsletterPolicy};
use mailmaster_storage::{CreateNewsletter, Newsletter, UpdateNewsletter};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::{AppState, AuthUser};
use crate::error::ApiResult;
use crate::extract::{JsonBody, ResourceId};
use crate::pagination::{PageQuery, Paginated};
use crate::validation::Rules;

/// Request body for creating or updating a newsletter
#[derive(Debug, Default, Deserialize)]
pub struct NewsletterRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NewsletterRequest {
    fn into_create(self) -> Result<CreateNewsletter> {
        let mut rules = Rules::new();
        rules.required("title", self.title.as_deref());
        rules.max_chars("title", self.title.as_deref(), 255);
        rules.required("content", self.content.as_deref());
        rules.finish()?;

        Ok(CreateNewsletter {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        })
    }

    fn into_update(self) -> Result<UpdateNewsletter> {
        let mut rules = Rules::new();
        rules.filled("title", self.title.as_deref());
        rules.max_chars("title", self.title.as_deref(), 255);
        rules.filled("content", self.content.as_deref());
        rules.finish()?;

        Ok(UpdateNewsletter {
            title: self.title,
            content: self.content,
        })
    }
}

fn not_found(id: uuid::Uuid) -> Error {
    Error::NotFound(format!("Newsletter {}", id))
}

/// List newsletters
///
/// GET /api/newsletters
pub async fn list_newsletters(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paginated<Newsletter>>> {
    authorize::<NewsletterPolicy>(auth.role(), Ability::ViewAny)?;

    let page = state.store.newsletters.list(query.request()).await?;
    Ok(Json(Paginated::new(page, query.page(), state.url(uri.path()))))
}

/// Create a newsletter
///
/// POST /api/newsletters
pub async fn create_newsletter(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(req): JsonBody<NewsletterRequest>,
) -> ApiResult<(StatusCode, Json<Newsletter>)> {
    authorize::<NewsletterPolicy>(auth.role(), Ability::Create)?;
    let input = req.into_create()?;

    let newsletter = state.store.newsletters.create(input).await?;
    info!(newsletter_id = %newsletter.id, user_id = %auth.0.id, "Created newsletter");

    Ok((StatusCode::CREATED, Json(newsletter)))
}

/// Get a newsletter
///
/// GET /api/newsletters/:id
pub async fn get_newsletter(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Newsletter>> {
    authorize::<NewsletterPolicy>(auth.role(), Ability::View)?;

    let newsletter = state
        .store
        .newsletters
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(newsletter))
}

/// Update a newsletter
///
/// PUT /api/newsletters/:id
pub async fn update_newsletter(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
    JsonBody(req): JsonBody<NewsletterRequest>,
) -> ApiResult<Json<Newsletter>> {
    authorize::<NewsletterPolicy>(auth.role(), Ability::Update)?;

    // Unknown ids are a 404 even when the body is invalid
    if state.store.newsletters.get(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    let input = req.into_update()?;

    let newsletter = state
        .store
        .newsletters
        .update(id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(newsletter_id = %id, user_id = %auth.0.id, "Updated newsletter");

    Ok(Json(newsletter))
}

/// Delete a newsletter and its campaigns
///
/// DELETE /api/newsletters/:id
pub async fn delete_newsletter(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    if state.store.newsletters.get(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    authorize::<NewsletterPolicy>(auth.role(), Ability::Delete)?;

    if !state.store.newsletters.delete(id).await? {
        return Err(not_found(id).into());
    }
    info!(newsletter_id = %id, user_id = %auth.0.id, "Deleted newsletter");

    Ok(StatusCode::NO_CONTENT)
}
