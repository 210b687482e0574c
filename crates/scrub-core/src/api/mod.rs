//! Remote inspection API client
//!
//! Thin HTTP client for the inspection server. The sync engine is the
//! only caller; every method maps one mutation payload onto one request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Serialize;
use thiserror::Error;

use crate::models::{InspectionSnapshot, TaskItem};
use crate::util::{compact_text, is_http_url};

/// Client-level request timeout
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the remote inspection API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout)
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// Bad base URL or client setup
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),

    /// Mutation payload could not be prepared for sending
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// Whether the failure was a 404, used for idempotent deletes
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Body for a room update: the replayed checklist and notes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    pub tasks: Vec<TaskItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A decoded photo ready for multipart upload
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub photo_id: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Remote operations the sync engine replays mutations against
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Create or update an inspection from its full snapshot
    async fn upsert_inspection(&self, inspection: &InspectionSnapshot) -> Result<(), ApiError>;

    /// Replace a room's checklist and notes
    async fn update_room(
        &self,
        inspection_id: &str,
        room_id: &str,
        update: &RoomUpdate,
    ) -> Result<(), ApiError>;

    /// Upload one photo as multipart form data
    async fn upload_photo(
        &self,
        inspection_id: &str,
        room_id: &str,
        photo: PhotoUpload,
    ) -> Result<(), ApiError>;

    /// Delete one photo
    async fn delete_photo(
        &self,
        inspection_id: &str,
        room_id: &str,
        photo_id: &str,
    ) -> Result<(), ApiError>;
}

/// `RemoteApi` implementation over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemoteApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteApi {
    /// Build a client for an explicit API base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder().timeout(API_TIMEOUT).build()?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn inspections_url(&self) -> String {
        format!("{}/api/inspections", self.base_url)
    }

    fn room_url(&self, inspection_id: &str, room_id: &str) -> String {
        format!(
            "{}/api/inspections/{inspection_id}/rooms/{room_id}",
            self.base_url
        )
    }

    fn photos_url(&self, inspection_id: &str, room_id: &str) -> String {
        format!("{}/photos", self.room_url(inspection_id, room_id))
    }

    fn photo_url(&self, inspection_id: &str, room_id: &str, photo_id: &str) -> String {
        format!("{}/{photo_id}", self.photos_url(inspection_id, room_id))
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn upsert_inspection(&self, inspection: &InspectionSnapshot) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.inspections_url())
            .json(inspection)
            .send()
            .await?;
        check_status(response).await
    }

    async fn update_room(
        &self,
        inspection_id: &str,
        room_id: &str,
        update: &RoomUpdate,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.room_url(inspection_id, room_id))
            .json(update)
            .send()
            .await?;
        check_status(response).await
    }

    async fn upload_photo(
        &self,
        inspection_id: &str,
        room_id: &str,
        photo: PhotoUpload,
    ) -> Result<(), ApiError> {
        let part = multipart::Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.mime)?;
        let form = multipart::Form::new()
            .part("photos", part)
            .text("photoIds", photo.photo_id);
        let response = self
            .client
            .post(self.photos_url(inspection_id, room_id))
            .multipart(form)
            .send()
            .await?;
        check_status(response).await
    }

    async fn delete_photo(
        &self,
        inspection_id: &str,
        room_id: &str,
        photo_id: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.photo_url(inspection_id, room_id, photo_id))
            .send()
            .await?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body: compact_text(&body),
    })
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(&base) {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}
