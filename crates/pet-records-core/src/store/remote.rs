use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{
    Created, DashboardStats, Deleted, LoginOutcome, MedicalRecord, NewMedicalRecord, NewPet, Pet,
    User,
};

/// Client for the REST backend.
///
/// Requests have no timeout unless one is configured with
/// [`RemoteStore::with_timeout`].
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    /// Talk to the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Give every request an overall deadline.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into an error carrying its body.
async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RecordStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn login(&self, username: &str, password: &str) -> StoreResult<Option<User>> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let outcome: LoginOutcome = ensure_success(response).await?.json().await?;
        Ok(outcome.user.filter(|_| outcome.success))
    }

    async fn pets(&self) -> StoreResult<Vec<Pet>> {
        let response = self.client.get(self.url("/api/pets")).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn create_pet(&self, pet: &NewPet) -> StoreResult<i64> {
        let response = self
            .client
            .post(self.url("/api/pets"))
            .json(pet)
            .send()
            .await?;
        let created: Created = ensure_success(response).await?.json().await?;
        Ok(created.id)
    }

    // A server that does not report `removed` is taken at its word.
    async fn delete_pet(&self, id: i64) -> StoreResult<bool> {
        let response = self
            .client
            .delete(self.url(&format!("/api/pets/{}", id)))
            .send()
            .await?;
        let deleted: Deleted = ensure_success(response).await?.json().await?;
        Ok(deleted.removed.unwrap_or(true))
    }

    async fn medical_records(&self) -> StoreResult<Vec<MedicalRecord>> {
        let response = self
            .client
            .get(self.url("/api/medical-records"))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn create_medical_record(&self, record: &NewMedicalRecord) -> StoreResult<i64> {
        let response = self
            .client
            .post(self.url("/api/medical-records"))
            .json(record)
            .send()
            .await?;
        let created: Created = ensure_success(response).await?.json().await?;
        Ok(created.id)
    }

    // The server computes the month from its own clock.
    async fn dashboard_stats(&self, _month: &str) -> StoreResult<DashboardStats> {
        let response = self
            .client
            .get(self.url("/api/dashboard/stats"))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}
