use serde::Deserialize;
use tracing::debug;

use behsanj_core::models::{Feedback, SaveRequest, Settings, SystemLog};

use crate::error::StoreError;

/// Thin client for the survey backend's REST API.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    db: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-success response into a [`StoreError::Backend`], pulling
    /// the `{error}` message out of the body when there is one.
    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(StoreError::PermissionDenied);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(StoreError::Backend { status: status.as_u16(), message })
    }

    pub async fn settings(&self) -> Result<Settings, StoreError> {
        let response = self.http.get(self.url("/api/settings")).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<Settings, StoreError> {
        let response = self
            .http
            .post(self.url("/api/settings"))
            .json(settings)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// All records, newest first (the backend sorts by creation time).
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, StoreError> {
        let response = self.http.get(self.url("/api/feedback")).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// Create or update. The backend decides by the presence of `id`:
    /// without one it mints `id` and the next tracking id; with one it
    /// updates in place and refreshes `lastModified`.
    pub async fn save_feedback(&self, request: &SaveRequest) -> Result<Feedback, StoreError> {
        let response = self
            .http
            .post(self.url("/api/feedback"))
            .json(request)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// Re-send an offline update of a record the backend already knows. The
    /// backend answers an id-bearing save that matches nothing with a `null`
    /// body and a 200; surface that as not-found so the caller keeps the op
    /// queued instead of acking a write that never landed.
    pub async fn update_feedback(&self, record: &Feedback) -> Result<Feedback, StoreError> {
        let response = self
            .http
            .post(self.url("/api/feedback"))
            .json(record)
            .send()
            .await?;
        let updated: Option<Feedback> = Self::checked(response).await?.json().await?;
        updated.ok_or_else(|| StoreError::NotFound(record.id.clone()))
    }

    pub async fn delete_feedback(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/feedback/{id}")))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// `true` only when the backend is reachable and its database is up.
    pub async fn health(&self) -> bool {
        let Ok(response) = self.http.get(self.url("/api/health")).send().await else {
            return false;
        };
        match response.json::<HealthResponse>().await {
            Ok(health) => health.db == "connected",
            Err(_) => false,
        }
    }

    /// Change another user's password. The backend enforces the permission
    /// hierarchy and answers 403 when `current_username` may not touch the
    /// target account.
    pub async fn change_password(
        &self,
        current_username: &str,
        target_user_id: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url("/api/users/password"))
            .json(&serde_json::json!({
                "targetUserId": target_user_id,
                "newPassword": new_password,
                "currentUsername": current_username,
            }))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// The whole database as one JSON document.
    pub async fn full_backup(&self) -> Result<serde_json::Value, StoreError> {
        let response = self.http.get(self.url("/api/full-backup")).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// Replace the whole database with a previously exported document.
    /// Destructive on the server side.
    pub async fn full_restore(&self, backup: &serde_json::Value) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url("/api/full-restore"))
            .json(backup)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// Fire-and-forget log shipping; a dead backend must never block the UI.
    pub async fn post_log(&self, entry: &SystemLog) {
        let result = self
            .http
            .post(self.url("/api/logs"))
            .json(entry)
            .send()
            .await;
        if let Err(e) = result {
            debug!(error = %e, "log shipping failed");
        }
    }
}
