//! Registration, login and session handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use mailmaster_common::types::UserRole;
use mailmaster_common::Result;
use mailmaster_core::Registration;
use mailmaster_storage::{Store, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AppState, AuthUser};
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::handlers::MessageResponse;
use crate::validation::Rules;

/// Request body for registration
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl RegisterRequest {
    async fn into_registration(self, store: &Store) -> Result<Registration> {
        let mut rules = Rules::new();
        rules.required("name", self.name.as_deref());
        rules.max_chars("name", self.name.as_deref(), 255);
        if rules.required("email", self.email.as_deref()) {
            let email = self.email.as_deref().unwrap_or_default();
            rules.email("email", Some(email));
            if store.users.get_by_email(email).await?.is_some() {
                rules.taken("email");
            }
        }
        rules.required("password", self.password.as_deref());
        rules.min_chars("password", self.password.as_deref(), 6);
        rules.confirmed(
            "password",
            self.password.as_deref(),
            self.password_confirmation.as_deref(),
        );
        rules.finish()?;

        Ok(Registration {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            role: UserRole::default(),
        })
    }
}

/// Request body for login
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Issued bearer token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a user and return their first token
///
/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let registration = req.into_registration(&state.store).await?;
    let session = state.accounts.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: session.token,
        }),
    ))
}

/// Log in and return a new token
///
/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let mut rules = Rules::new();
    rules.required("email", req.email.as_deref());
    rules.email("email", req.email.as_deref());
    rules.required("password", req.password.as_deref());
    rules.finish()?;

    let session = state
        .accounts
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(TokenResponse {
        token: session.token,
    }))
}

/// Revoke every token of the caller
///
/// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.logout(&auth.0).await?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// The authenticated user
///
/// GET /api/user
pub async fn current_user(Extension(auth): Extension<AuthUser>) -> Json<User> {
    Json(auth.0)
}
