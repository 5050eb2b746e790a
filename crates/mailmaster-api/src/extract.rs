//! Request extractors

use crate::error::ApiError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use mailmaster_common::Error;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use uuid::Uuid;

/// JSON body where an empty body reads as `{}`
///
/// Type mismatches become a 422 on `body`, syntax errors a 400. The content
/// type is not checked.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;

        parse_body(&bytes).map(JsonBody).map_err(ApiError)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    serde_json::from_slice(bytes).map_err(|e| match e.classify() {
        Category::Data => Error::validation("body", e.to_string()),
        _ => Error::BadRequest("Malformed JSON body.".to_string()),
    })
}

/// Resource id from the `{id}` path segment; anything but a UUID is a 404
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::NotFound("Resource".to_string()))?;

        Uuid::parse_str(&raw)
            .map(ResourceId)
            .map_err(|_| ApiError(Error::NotFound(format!("Resource {}", raw))))
    }
}
