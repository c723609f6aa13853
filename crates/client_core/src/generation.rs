//! HTTP access to the generation service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::FormInput,
    error::ErrorDetail,
    protocol::{
        GenerationResult, HealthStatus, ProjectCatalog, GENERATE_EMAIL_PATH, HEALTH_PATH,
        PROJECTS_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::GenerationError;

/// The single call the submission controller depends on.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_email(&self, input: &FormInput)
        -> Result<GenerationResult, GenerationError>;
}

#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    http: Client,
    base_url: Url,
}

impl HttpGenerationClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn from_base(raw: &str) -> Result<Self, GenerationError> {
        Ok(Self::new(Url::parse(raw)?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GenerationError> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn health(&self) -> Result<HealthStatus, GenerationError> {
        let response = self.http.get(self.endpoint(HEALTH_PATH)?).send().await?;
        read_json(response).await
    }

    pub async fn list_projects(&self) -> Result<ProjectCatalog, GenerationError> {
        let response = self.http.get(self.endpoint(PROJECTS_PATH)?).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationClient {
    async fn generate_email(
        &self,
        input: &FormInput,
    ) -> Result<GenerationResult, GenerationError> {
        let url = self.endpoint(GENERATE_EMAIL_PATH)?;
        debug!(%url, "posting generation request");
        let response = self.http.post(url).json(input).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GenerationError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(GenerationError::Service {
            status: status.as_u16(),
            detail: ErrorDetail::parse(&body),
        });
    }
    serde_json::from_slice(&body).map_err(|err| GenerationError::Parse(err.to_string()))
}

#[cfg(test)]
#[path = "tests/generation_tests.rs"]
mod tests;
