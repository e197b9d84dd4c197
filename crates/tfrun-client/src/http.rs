//! HTTPS implementation of [`RemoteApi`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use tfrun_core::{OutputSet, RunId, RunRequest, RunStatus, WorkspaceId, WorkspaceRef};

use crate::api::RemoteApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::wire::{
    CreateRunDocument, Document, NoAttributes, RunAttributes, StateVersionDocument,
    JSON_API_MEDIA_TYPE,
};

/// Client for the platform's v2 API.
#[derive(Debug, Clone)]
pub struct TfeClient {
    inner: reqwest::Client,
    base_url: Url,
}

impl TfeClient {
    /// Create a new client. Credentials and timeout are fixed here.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| ClientError::Config(format!("hostname {:?}: {}", config.hostname, e)))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ClientError::Config("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API_MEDIA_TYPE));

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(concat!("tfrun/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { inner, base_url })
    }

    /// Build an endpoint URL. Each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        debug!(url = %url, "GET request");

        let response = self.inner.get(url.clone()).query(query).send().await?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: Url,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn current_state_version<T: DeserializeOwned>(
        &self,
        workspace_id: &WorkspaceId,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(&["workspaces", workspace_id.as_str(), "current-state-version"])?;
        self.get_json(url, query).await
    }
}

#[async_trait]
impl RemoteApi for TfeClient {
    async fn create_run(&self, request: &RunRequest) -> Result<RunId, ClientError> {
        let url = self.endpoint(&["runs"])?;
        debug!(url = %url, workspace_id = %request.workspace_id(), "POST request");

        let response = self
            .inner
            .post(url.clone())
            .body(serde_json::to_vec(&CreateRunDocument::from(request))?)
            .send()
            .await?;

        let doc: Document<NoAttributes> = Self::decode(url, response).await?;
        if doc.data.id.is_empty() {
            return Err(ClientError::InvalidResponse("run has no id".into()));
        }
        Ok(RunId::new(doc.data.id))
    }

    async fn read_workspace_id(
        &self,
        workspace: &WorkspaceRef,
    ) -> Result<WorkspaceId, ClientError> {
        let url = self.endpoint(&[
            "organizations",
            workspace.organization(),
            "workspaces",
            workspace.name(),
        ])?;

        let doc: Document<NoAttributes> = self.get_json(url, &[]).await?;
        if doc.data.id.is_empty() {
            return Err(ClientError::InvalidResponse("workspace has no id".into()));
        }
        Ok(WorkspaceId::new(doc.data.id))
    }

    async fn read_run_status(&self, run_id: &RunId) -> Result<RunStatus, ClientError> {
        let url = self.endpoint(&["runs", run_id.as_str()])?;

        let doc: Document<RunAttributes> = self.get_json(url, &[]).await?;
        doc.data
            .attributes
            .status
            .map(RunStatus::new)
            .ok_or_else(|| ClientError::InvalidResponse("run has no status".into()))
    }

    async fn read_resources_processed(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<bool, ClientError> {
        let doc: StateVersionDocument = self.current_state_version(workspace_id, &[]).await?;
        doc.data.attributes.resources_processed.ok_or_else(|| {
            ClientError::InvalidResponse("state version has no resources-processed flag".into())
        })
    }

    async fn read_state_version_outputs(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<OutputSet, ClientError> {
        let doc: StateVersionDocument = self
            .current_state_version(workspace_id, &[("include", "outputs")])
            .await?;

        Ok(doc.included.into_iter().map(|o| o.attributes).collect())
    }
}
