//! Request viewer resolution.
//!
//! Sessions live outside this service; the fronting layer forwards the
//! signed-in username in the `x-viewer` header.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::application::error::HttpError;
use crate::domain::entities::UserRecord;

use super::HttpState;

pub const VIEWER_HEADER: &str = "x-viewer";

/// The signed-in user, rejecting anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct Viewer(pub UserRecord);

/// The signed-in user when there is one.
#[derive(Debug, Clone)]
pub struct MaybeViewer(pub Option<UserRecord>);

impl MaybeViewer {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl FromRequestParts<HttpState> for MaybeViewer {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &HttpState,
    ) -> Result<Self, Self::Rejection> {
        let Some(username) = parts
            .headers
            .get(VIEWER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return Ok(Self(None));
        };

        let user = state.users.find_by_username(username).await.map_err(|err| {
            HttpError::from_error(
                "infra::http::viewer::resolve",
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                &err,
            )
        })?;

        Ok(Self(user))
    }
}

impl FromRequestParts<HttpState> for Viewer {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &HttpState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeViewer::from_request_parts(parts, state).await? {
            MaybeViewer(Some(user)) => Ok(Self(user)),
            MaybeViewer(None) => Err(HttpError::unauthorized("infra::http::viewer::require")),
        }
    }
}
