//! HTTP routes.
//!
//! `GET /retrieve/{key}` reads, `POST /store` writes. Both share a single
//! [`Collate`] service behind an `Arc`.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use collate::{Collate, WriteRequest};
use collate_store::Store;

use crate::error::ApiError;

/// Build the router for a service.
pub fn router<S: Store + 'static>(collate: Arc<Collate<S>>) -> Router {
    Router::new()
        .route("/retrieve/*key", get(retrieve::<S>).fallback(unknown_request))
        .route("/store", post(store::<S>).fallback(unknown_request))
        .fallback(unknown_request)
        .with_state(collate)
        .layer(TraceLayer::new_for_http())
}

async fn retrieve<S: Store>(
    State(collate): State<Arc<Collate<S>>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let key = match path {
        Ok(Path(key)) => key,
        Err(e) => {
            tracing::debug!(error = %e.body_text(), "undecodable key path");
            return Ok(unknown_request().await.into_response());
        }
    };

    let value = collate.get(&key).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain")], value).into_response())
}

async fn store<S: Store>(
    State(collate): State<Arc<Collate<S>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::Malformed(e.body_text()))?;
    let request = read_write_form(multipart).await?;

    tracing::debug!(
        key = %request.key,
        len = request.value.len(),
        credential = %request.credential.fingerprint(),
        "store request"
    );

    collate.put_request(&request).await?;
    Ok(StatusCode::OK)
}

async fn unknown_request() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Unknown request")
}

/// Decode the `key`, `value` and `passhash` fields of a write form.
///
/// Parts are taken byte for byte: no charset sniffing, no BOM stripping.
/// A part that is not valid UTF-8 makes the whole form malformed.
/// Unrecognised fields are skipped. If a field repeats, its first
/// occurrence is used.
async fn read_write_form(mut multipart: Multipart) -> Result<WriteRequest, ApiError> {
    let mut key = None;
    let mut value = None;
    let mut passhash = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Malformed(e.body_text()))?
    {
        let slot = match field.name() {
            Some("key") => &mut key,
            Some("value") => &mut value,
            Some("passhash") => &mut passhash,
            _ => continue,
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Malformed(e.body_text()))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| ApiError::Malformed(format!("field is not valid UTF-8: {}", e)))?;
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    Ok(WriteRequest::from_parts(key, value, passhash)?)
}
