//! Authentication module

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use mailmaster_common::types::UserRole;
use mailmaster_common::Error;
use mailmaster_core::accounts::UNAUTHENTICATED;
use mailmaster_core::{AccountService, CampaignSender, Mailer};
use mailmaster_storage::{Store, User};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub accounts: AccountService,
    pub sender: CampaignSender,
    /// Base URL used in pagination links, e.g. `https://mail.example.com`
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(store: Store, mailer: Arc<dyn Mailer>, public_url: Option<String>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            sender: CampaignSender::new(store.clone(), mailer),
            store,
            public_url,
        }
    }

    /// Absolute URL for a request path
    pub fn url(&self, path: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path.to_string(),
        }
    }
}

/// The user behind the bearer token of the current request
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn role(&self) -> UserRole {
        self.0.role_enum()
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(req: &Request) -> Option<&str> {
    let auth = req.headers().get("authorization")?.to_str().ok()?;
    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .map(str::to_string)
        .ok_or_else(|| {
            warn!("Missing bearer token in request to {}", request.uri().path());
            Error::Auth(UNAUTHENTICATED.to_string())
        })?;

    let user = state.accounts.authenticate(&token).await.map_err(|e| {
        if !e.is_server_error() {
            warn!("Rejected bearer token for {}", request.uri().path());
        }
        e
    })?;

    debug!(user_id = %user.id, "Request authenticated");
    request.extensions_mut().insert(AuthUser(user));

    Ok(next.run(request).await)
}
