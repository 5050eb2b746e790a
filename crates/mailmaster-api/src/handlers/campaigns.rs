//! Campaign handlers

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Extension, Json,
};
use mailmaster_common::types::CampaignStatus;
use mailmaster_common::{Error, Result};
use mailmaster_core::{authorize, Ability, CampaignPolicy};
use mailmaster_storage::{Campaign, CreateCampaign, Store, UpdateCampaign};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AppState, AuthUser};
use crate::error::ApiResult;
use crate::extract::{JsonBody, ResourceId};
use crate::handlers::MessageResponse;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::Rules;

/// Request body for creating or updating a campaign
#[derive(Debug, Default, Deserialize)]
pub struct CampaignRequest {
    pub newsletter_id: Option<Value>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub status: Option<String>,
}

/// Fields shared by create and update once validated
struct CampaignFields {
    newsletter_id: Option<Uuid>,
    title: Option<String>,
    subject: Option<String>,
    status: Option<CampaignStatus>,
}

/// `newsletter_id` as sent: absent or null, a string, or another JSON type
enum Reference<'a> {
    Missing,
    Text(&'a str),
    Malformed,
}

impl CampaignRequest {
    fn reference(&self) -> Reference<'_> {
        match &self.newsletter_id {
            None | Some(Value::Null) => Reference::Missing,
            Some(Value::String(raw)) => Reference::Text(raw),
            Some(_) => Reference::Malformed,
        }
    }

    /// Apply the per-field rules; `rules` already holds presence checks
    async fn validate(self, mut rules: Rules, store: &Store) -> Result<CampaignFields> {
        rules.max_chars("title", self.title.as_deref(), 255);
        rules.max_chars("subject", self.subject.as_deref(), 255);
        let status = rules.one_of::<CampaignStatus>("status", self.status.as_deref());

        let newsletter_id = match self.reference() {
            Reference::Text(raw) if !raw.trim().is_empty() => {
                let known = match Uuid::parse_str(raw.trim()) {
                    Ok(id) => store.newsletters.get(id).await?.map(|n| n.id),
                    Err(_) => None,
                };
                if known.is_none() {
                    rules.invalid_selection("newsletter_id");
                }
                known
            }
            Reference::Malformed => {
                rules.invalid_selection("newsletter_id");
                None
            }
            _ => None,
        };
        rules.finish()?;

        Ok(CampaignFields {
            newsletter_id,
            title: self.title,
            subject: self.subject,
            status,
        })
    }

    async fn into_create(self, store: &Store) -> Result<CreateCampaign> {
        let mut rules = Rules::new();
        match self.reference() {
            Reference::Malformed => {}
            Reference::Text(raw) => {
                rules.required("newsletter_id", Some(raw));
            }
            Reference::Missing => {
                rules.required("newsletter_id", None);
            }
        }
        rules.required("title", self.title.as_deref());
        rules.required("subject", self.subject.as_deref());
        let fields = self.validate(rules, store).await?;

        let newsletter_id = fields
            .newsletter_id
            .ok_or_else(|| {
                Error::validation("newsletter_id", "The newsletter id field is required.")
            })?;
        Ok(CreateCampaign {
            newsletter_id,
            title: fields.title.unwrap_or_default(),
            subject: fields.subject.unwrap_or_default(),
            status: fields.status.unwrap_or_default(),
        })
    }

    async fn into_update(self, store: &Store) -> Result<UpdateCampaign> {
        let mut rules = Rules::new();
        rules.filled("title", self.title.as_deref());
        rules.filled("subject", self.subject.as_deref());
        let fields = self.validate(rules, store).await?;

        Ok(UpdateCampaign {
            newsletter_id: fields.newsletter_id,
            title: fields.title,
            subject: fields.subject,
            status: fields.status,
        })
    }
}

/// Campaign preview response
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub content: String,
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Campaign {}", id))
}

/// List campaigns
///
/// GET /api/campaigns
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paginated<Campaign>>> {
    authorize::<CampaignPolicy>(auth.role(), Ability::ViewAny)?;

    let page = state.store.campaigns.list(query.request()).await?;
    Ok(Json(Paginated::new(page, query.page(), state.url(uri.path()))))
}

/// Create a campaign, draft unless a status is given
///
/// POST /api/campaigns
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(req): JsonBody<CampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    authorize::<CampaignPolicy>(auth.role(), Ability::Create)?;
    let input = req.into_create(&state.store).await?;

    let campaign = state.store.campaigns.create(input).await?;
    info!(
        campaign_id = %campaign.id,
        newsletter_id = %campaign.newsletter_id,
        user_id = %auth.0.id,
        "Created campaign"
    );

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Get a campaign
///
/// GET /api/campaigns/:id
pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Campaign>> {
    authorize::<CampaignPolicy>(auth.role(), Ability::View)?;

    let campaign = state
        .store
        .campaigns
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(campaign))
}

/// Update a campaign
///
/// PUT /api/campaigns/:id
pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
    JsonBody(req): JsonBody<CampaignRequest>,
) -> ApiResult<Json<Campaign>> {
    authorize::<CampaignPolicy>(auth.role(), Ability::Update)?;

    if state.store.campaigns.get(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    let input = req.into_update(&state.store).await?;

    let campaign = state
        .store
        .campaigns
        .update(id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(campaign_id = %id, user_id = %auth.0.id, "Updated campaign");

    Ok(Json(campaign))
}

/// Delete a campaign
///
/// DELETE /api/campaigns/:id
pub async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    if state.store.campaigns.get(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    authorize::<CampaignPolicy>(auth.role(), Ability::Delete)?;

    if !state.store.campaigns.delete(id).await? {
        return Err(not_found(id).into());
    }
    info!(campaign_id = %id, user_id = %auth.0.id, "Deleted campaign");

    Ok(StatusCode::NO_CONTENT)
}

/// Send a draft campaign to every subscriber
///
/// POST /api/campaigns/:id/send
pub async fn send_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<MessageResponse>> {
    authorize::<CampaignPolicy>(auth.role(), Ability::Update)?;

    let report = state.sender.send(id).await?;
    info!(
        campaign_id = %id,
        user_id = %auth.0.id,
        targeted = report.targeted,
        "Campaign send finished"
    );

    Ok(Json(MessageResponse {
        message: format!(
            "Campaign sending started to {} subscribers.",
            report.targeted
        ),
    }))
}

/// Newsletter content of a campaign
///
/// GET /api/campaigns/:id/preview
pub async fn preview_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<PreviewResponse>> {
    authorize::<CampaignPolicy>(auth.role(), Ability::View)?;

    let content = state.sender.preview(id).await?;
    Ok(Json(PreviewResponse { content }))
}
