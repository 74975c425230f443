use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, LOCATION};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::{ShortCode, ShortenParams};
use burrow_redirector::RedirectorError;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;

const REDIRECT_CACHE_CONTROL: &str = "private, max-age=90";
const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let mut params = ShortenParams::new(request.long_url);
    params.custom_alias = request.custom_alias;
    params.deadline = state.deadline();

    let outcome = state.shortener().shorten(params).await?;
    debug!(code = %outcome.record.code, reused = outcome.reused, "shortened url");

    Ok(Json(ShortenResponse::from_record(
        outcome.record,
        state.public_base_url(),
    )))
}

/// `301` to the long URL. Codes that cannot exist are reported as unknown.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::parse(&code)
        .map_err(|e| AppError::from(RedirectorError::InvalidShortCode(e.to_string())))?;

    let long_url = state
        .redirector()
        .resolve_within(&code, state.deadline())
        .await?;

    let location = HeaderValue::try_from(long_url)
        .map_err(|e| AppError::Internal(format!("stored url for '{code}' is not a valid header: {e}")))?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (LOCATION, location),
            (CACHE_CONTROL, HeaderValue::from_static(REDIRECT_CACHE_CONTROL)),
            (X_ROBOTS_TAG, HeaderValue::from_static("noindex")),
        ],
    )
        .into_response())
}
