//! Extractors whose rejections render through `HttpError`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::application::error::HttpError;

const MALFORMED_REQUEST: &str = "Malformed request";

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HttpError))]
pub(super) struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(HttpError))]
pub(super) struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub(super) struct ApiJson<T>(pub T);

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        HttpError::new(
            "infra::http::extract::path",
            rejection.status(),
            MALFORMED_REQUEST,
            rejection.body_text(),
        )
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::new(
            "infra::http::extract::query",
            rejection.status(),
            MALFORMED_REQUEST,
            rejection.body_text(),
        )
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::new(
            "infra::http::extract::json",
            rejection.status(),
            MALFORMED_REQUEST,
            rejection.body_text(),
        )
    }
}
