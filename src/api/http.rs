//! HTTP implementation of the story service
//!
//! Talks to the story server's REST endpoints with `reqwest`:
//!
//! - `POST /api/generate-stories` (multipart, field `file`)
//! - `POST /api/integrate-story` (JSON)
//! - `POST /api/integrate-all` (JSON)
//! - `GET /api/health`
//!
//! Every response goes through the same classification: a failed send is
//! a transport error, a non-2xx status is a server error (with the
//! server's `error`/`message` when the body is JSON), and a 2xx body
//! that is not the expected JSON is a contract error.

use crate::api::base::{
    ErrorBody, GenerateResponse, HealthStatus, IntegrateAllRequest, IntegrateStoryRequest,
    IntegrationReceipt, StoryService, UploadDocument, UPLOAD_FIELD,
};
use crate::config::ServerConfig;
use crate::error::{AutoAgileError, Result};
use crate::story::StoryRecord;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Generation endpoint path, relative to the base URL
pub const GENERATE_PATH: &str = "api/generate-stories";
/// Single-story integration endpoint path
pub const INTEGRATE_STORY_PATH: &str = "api/integrate-story";
/// Bulk integration endpoint path
pub const INTEGRATE_ALL_PATH: &str = "api/integrate-all";
/// Health endpoint path
pub const HEALTH_PATH: &str = "api/health";

/// Message for a 2xx body that is not JSON
pub const INVALID_RESPONSE: &str = "Invalid response from server";
/// Message for a 2xx JSON body missing the expected fields
pub const INVALID_RESPONSE_FORMAT: &str = "Invalid response format";

/// Story service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpStoryService {
    client: Client,
    base_url: Url,
}

impl HttpStoryService {
    /// Create a new HTTP story service
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client
    /// cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use autoagile::api::HttpStoryService;
    /// use autoagile::config::ServerConfig;
    ///
    /// let service = HttpStoryService::new(&ServerConfig::default()).unwrap();
    /// assert_eq!(service.base_url().as_str(), "http://localhost:5000/");
    /// ```
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            AutoAgileError::Config(format!("Invalid server URL '{}': {}", config.base_url, e))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(|e| {
            tracing::error!("Failed to create HTTP client: {}", e);
            AutoAgileError::from(e)
        })?;

        tracing::debug!("Initialized story service client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL endpoints are resolved against (always ends with `/`)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| {
            AutoAgileError::Config(format!("Invalid endpoint '{}': {}", path, e)).into()
        })
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(u16, Value)> {
        let url = self.endpoint(path)?;
        tracing::info!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }
}

fn transport_error(err: reqwest::Error) -> AutoAgileError {
    tracing::error!("Request failed: {}", err);
    AutoAgileError::Transport(err.to_string())
}

/// Classify a non-2xx response body
pub(crate) fn server_error(status: u16, body: &str) -> AutoAgileError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    match parsed.as_ref().and_then(ErrorBody::text) {
        Some(message) => AutoAgileError::Server {
            status,
            message,
            details: parsed.map(|b| b.detail_lines()).unwrap_or_default(),
        },
        None => AutoAgileError::server_status(status),
    }
}

/// Read a response body as JSON, classifying failures
///
/// Returns the (2xx) status code with the parsed body.
async fn read_json(response: Response) -> Result<(u16, Value)> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let err = server_error(status.as_u16(), &body);
        tracing::error!("Server returned {}: {}", status, err);
        return Err(err.into());
    }

    tracing::debug!("Server returned {} ({} bytes)", status, body.len());
    let value = serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Response body is not JSON: {}", e);
        AutoAgileError::Contract(INVALID_RESPONSE.to_string())
    })?;
    Ok((status.as_u16(), value))
}

/// Reject a 2xx JSON body that does not report `success: true`
///
/// A body that carries an `error`/`message` is the server reporting a
/// failure and surfaces that message; anything else breaks the contract.
fn require_success(status: u16, body: &Value) -> Result<()> {
    if body.get("success") == Some(&Value::Bool(true)) {
        return Ok(());
    }
    let reported = serde_json::from_value::<ErrorBody>(body.clone())
        .ok()
        .and_then(|b| b.text());
    match reported {
        Some(message) => Err(AutoAgileError::Server {
            status,
            message,
            details: Vec::new(),
        }
        .into()),
        None => Err(AutoAgileError::Contract(INVALID_RESPONSE_FORMAT.to_string()).into()),
    }
}

fn parse_generate(status: u16, body: Value) -> Result<Vec<StoryRecord>> {
    require_success(status, &body)?;
    if !body.get("stories").is_some_and(Value::is_array) {
        return Err(AutoAgileError::Contract(INVALID_RESPONSE_FORMAT.to_string()).into());
    }
    let response: GenerateResponse = serde_json::from_value(body).map_err(|e| {
        tracing::error!("Stories do not match the story record shape: {}", e);
        AutoAgileError::Contract(INVALID_RESPONSE_FORMAT.to_string())
    })?;
    Ok(response.stories)
}

fn parse_receipt(status: u16, body: Value) -> Result<IntegrationReceipt> {
    require_success(status, &body)?;
    serde_json::from_value(body).map_err(|e| {
        tracing::error!("Integration response has unexpected shape: {}", e);
        AutoAgileError::Contract(INVALID_RESPONSE_FORMAT.to_string()).into()
    })
}

#[async_trait]
impl StoryService for HttpStoryService {
    async fn generate_stories(&self, document: &UploadDocument) -> Result<Vec<StoryRecord>> {
        let url = self.endpoint(GENERATE_PATH)?;
        tracing::info!(
            "Uploading '{}' ({} bytes) to {}",
            document.file_name,
            document.bytes.len(),
            url
        );

        let part = Part::bytes(document.bytes.clone()).file_name(document.file_name.clone());
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let (status, body) = read_json(response).await?;
        let stories = parse_generate(status, body)?;
        tracing::info!("Generated {} stories", stories.len());
        Ok(stories)
    }

    async fn integrate_story(
        &self,
        request: &IntegrateStoryRequest,
    ) -> Result<IntegrationReceipt> {
        tracing::info!("Integrating story {}", request.story_id);
        let (status, body) = self.post_json(INTEGRATE_STORY_PATH, request).await?;
        parse_receipt(status, body)
    }

    async fn integrate_all(&self, request: &IntegrateAllRequest) -> Result<IntegrationReceipt> {
        tracing::info!("Integrating {} stories", request.story_ids.len());
        let (status, body) = self.post_json(INTEGRATE_ALL_PATH, request).await?;
        parse_receipt(status, body)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(HEALTH_PATH)?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let (_, body) = read_json(response).await?;
        serde_json::from_value(body).map_err(|e| {
            tracing::error!("Health response has unexpected shape: {}", e);
            AutoAgileError::Contract(INVALID_RESPONSE_FORMAT.to_string()).into()
        })
    }
}
