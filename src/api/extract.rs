// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors whose rejections use the error envelope.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use utoipa::IntoParams;

use crate::error::ApiError;

/// Records returned per page by list endpoints.
pub const ITEMS_PER_PAGE: usize = 10;

const INVALID_BODY_MESSAGE: &str = "Request does not contain a valid JSON body.";

/// A JSON object body deserialized into `T`.
///
/// An empty body, a body that is not a JSON object, or an empty object is a
/// 400. A well-formed object whose fields have the wrong types is a 422.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request(INVALID_BODY_MESSAGE))?;

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::bad_request(INVALID_BODY_MESSAGE))?;

        match value.as_object() {
            Some(fields) if !fields.is_empty() => {}
            _ => return Err(ApiError::bad_request(INVALID_BODY_MESSAGE)),
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| ApiError::unprocessable(format!("Invalid request body: {e}")))
    }
}

/// Numeric `{id}` path segment. Anything else is a 404, as if the route did
/// not match.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub u64);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found("Resource not found."))?;

        raw.parse()
            .map(ResourceId)
            .map_err(|_| ApiError::not_found("Resource not found."))
    }
}

/// `?page=N` query parameter, 1-indexed.
///
/// Extraction never fails: a repeated `page` uses its first value and any
/// other malformed query falls back to page 1.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1. Non-numeric values mean page 1.
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
}

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let page = parts.uri.query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value.into_owned())
        });
        Ok(PageQuery { page })
    }
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// Slice `items` to the requested page. Pages below 1 are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let Ok(index) = usize::try_from(page - 1) else {
        return Vec::new();
    };

    items
        .into_iter()
        .skip(index.saturating_mul(ITEMS_PER_PAGE))
        .take(ITEMS_PER_PAGE)
        .collect()
}
