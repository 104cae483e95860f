//! Transfer routes mounted at the site root.
//!
//! These are the URLs the broker hands out when signed URLs are unavailable:
//! `/proxy/*` streams through the storage binding, `/mock-*` stands in when
//! there is no storage at all.

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{
        HeaderMap, HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, ETAG},
    },
    response::{IntoResponse, Response},
    routing::{get, put},
};
use folio_core::storage::ByteStream;
use folio_core::transfer::{
    FALLBACK_CONTENT_TYPE, MOCK_DOWNLOAD_TEXT, TransferError, proxy_download, proxy_upload,
};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::{AppState, error::ApiError};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/proxy/upload", put(upload))
        .route("/proxy/download", get(download))
        .route("/mock-upload", put(mock_upload))
        .route("/mock-download", get(mock_download))
}

/// Query parameters for transfer routes.
#[derive(Debug, Deserialize)]
pub struct TransferQuery {
    /// Storage key.
    pub key: Option<String>,
    /// Name for `Content-Disposition`.
    pub name: Option<String>,
}

/// Response for a proxied upload.
#[derive(Debug, Serialize)]
pub struct ProxyUploadResponse {
    /// Status message.
    pub message: &'static str,
    /// Key the object was stored under.
    pub key: String,
    /// Bytes stored.
    pub bytes: u64,
}

fn body_stream(body: Body) -> ByteStream {
    Box::pin(body.into_data_stream().map_err(std::io::Error::other))
}

/// PUT `/proxy/upload?key=`
/// Stream the request body into the storage binding.
async fn upload(
    State(state): State<AppState>,
    Query(query): Query<TransferQuery>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<ProxyUploadResponse>, ApiError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    let receipt = proxy_upload(
        state.storage.binding.as_deref(),
        query.key.as_deref(),
        content_type,
        body_stream(body),
    )
    .await
    .map_err(|e| {
        error!(key = ?query.key, error = %e, "Proxy upload failed");
        ApiError::from(e)
    })?;

    info!(key = %receipt.key, bytes = receipt.bytes_written, "Uploaded via proxy");
    Ok(Json(ProxyUploadResponse {
        message: "Uploaded via proxy",
        key: receipt.key,
        bytes: receipt.bytes_written,
    }))
}

/// GET `/proxy/download?key=&name=`
/// Stream an object back from the storage binding.
async fn download(
    State(state): State<AppState>,
    Query(query): Query<TransferQuery>,
) -> Result<Response, ApiError> {
    let object = proxy_download(
        state.storage.binding.as_deref(),
        query.key.as_deref(),
        query.name.as_deref(),
    )
    .await
    .map_err(|e| {
        if !matches!(e, TransferError::NotFound { .. }) {
            error!(key = ?query.key, error = %e, "Proxy download failed");
        }
        ApiError::from(e)
    })?;

    let mut headers = HeaderMap::new();
    let content_type = object
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or(HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(object.content_length));
    if let Some(etag) = object
        .etag
        .as_deref()
        .and_then(|e| HeaderValue::from_str(e).ok())
    {
        headers.insert(ETAG, etag);
    }
    if let Some(disposition) = object
        .content_disposition
        .as_deref()
        .and_then(|d| HeaderValue::from_str(d).ok())
    {
        headers.insert(CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, Body::from_stream(object.body)).into_response())
}

/// PUT `/mock-upload?key=`
/// Accept and discard the body.
async fn mock_upload(
    Query(query): Query<TransferQuery>,
    body: Body,
) -> Result<Json<Value>, ApiError> {
    if query.key.as_deref().is_none_or(str::is_empty) {
        return Err(TransferError::MissingKey.into());
    }

    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        chunk.map_err(TransferError::transport)?;
    }

    Ok(Json(json!({ "message": "Uploaded to mock (simulated)" })))
}

/// GET `/mock-download`
async fn mock_download() -> &'static str {
    MOCK_DOWNLOAD_TEXT
}
