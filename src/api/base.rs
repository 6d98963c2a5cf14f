//! Story service abstraction and wire types
//!
//! The [`StoryService`] trait is the seam between the client flows and
//! the remote story service. Request and response types mirror the JSON
//! envelopes of the `/api/...` endpoints.

use crate::error::Result;
use crate::story::{StoryId, StoryRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field name the generation endpoint reads the file from
pub const UPLOAD_FIELD: &str = "file";

/// A document ready to be uploaded for story generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocument {
    /// File name sent with the multipart part
    pub file_name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadDocument {
    /// Create a document from a name and its contents
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Successful response of `POST /api/generate-stories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Always `true` on success
    pub success: bool,
    /// Generated stories in display order
    pub stories: Vec<StoryRecord>,
    /// Number of stories, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Server-side file the run was saved to, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// Body of `POST /api/integrate-story`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrateStoryRequest {
    /// Story id, or its 1-based position when the server assigned none
    #[serde(rename = "storyId")]
    pub story_id: StoryId,
    /// Full story body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<StoryRecord>,
}

/// Body of `POST /api/integrate-all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrateAllRequest {
    /// Ids of every story, in display order
    #[serde(rename = "storyIds")]
    pub story_ids: Vec<StoryId>,
    /// Full story bodies, in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<Vec<StoryRecord>>,
}

/// Successful response of either integration endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationReceipt {
    /// Always `true` on success
    pub success: bool,
    /// Human-readable confirmation from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Id echoed by the single-story endpoint
    #[serde(rename = "storyId", default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<StoryId>,
    /// Ids echoed by the bulk endpoint
    #[serde(rename = "storyIds", default, skip_serializing_if = "Option::is_none")]
    pub story_ids: Option<Vec<StoryId>>,
    /// Server-side file the integration was written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" when the service is up
    pub status: String,
    /// Language model provider the service is configured with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether the provider's API key is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_configured: Option<bool>,
    /// Local model server URL, when applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_url: Option<String>,
}

impl HealthStatus {
    /// True when the service reports status "ok"
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Error envelope returned with failures
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<Value>,
}

impl ErrorBody {
    /// Server-supplied message, `error` preferred over `message`
    pub fn text(&self) -> Option<String> {
        [&self.error, &self.message]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .cloned()
    }

    /// Detail lines as text
    pub fn detail_lines(&self) -> Vec<String> {
        self.details
            .iter()
            .map(|detail| match detail {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

/// Remote story service
///
/// Every call is a single attempt: no retries, no batching of partial
/// failures. Errors are [`crate::error::AutoAgileError`] values wrapped
/// in `anyhow`, classified as transport, server or contract failures.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use autoagile::api::{
///     HealthStatus, IntegrateAllRequest, IntegrateStoryRequest, IntegrationReceipt,
///     StoryService, UploadDocument,
/// };
/// use autoagile::error::Result;
/// use autoagile::story::StoryRecord;
///
/// struct Offline;
///
/// #[async_trait]
/// impl StoryService for Offline {
///     async fn generate_stories(&self, _document: &UploadDocument) -> Result<Vec<StoryRecord>> {
///         Ok(Vec::new())
///     }
///     async fn integrate_story(&self, _r: &IntegrateStoryRequest) -> Result<IntegrationReceipt> {
///         anyhow::bail!("offline")
///     }
///     async fn integrate_all(&self, _r: &IntegrateAllRequest) -> Result<IntegrationReceipt> {
///         anyhow::bail!("offline")
///     }
///     async fn health(&self) -> Result<HealthStatus> {
///         anyhow::bail!("offline")
///     }
/// }
/// ```
#[async_trait]
pub trait StoryService: Send + Sync {
    /// Upload a document and return the generated stories
    async fn generate_stories(&self, document: &UploadDocument) -> Result<Vec<StoryRecord>>;

    /// Integrate a single story
    async fn integrate_story(&self, request: &IntegrateStoryRequest)
        -> Result<IntegrationReceipt>;

    /// Integrate every story in one request
    async fn integrate_all(&self, request: &IntegrateAllRequest) -> Result<IntegrationReceipt>;

    /// Query service health
    async fn health(&self) -> Result<HealthStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integrate_story_request_wire_shape() {
        let request = IntegrateStoryRequest {
            story_id: StoryId::Number(3),
            story: Some(StoryRecord::new("T", "D", "DoD", "Test: ok").with_id(3)),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["storyId"], json!(3));
        assert_eq!(value["story"]["title"], json!("T"));
        assert_eq!(value["story"]["definitionOfDone"], json!("DoD"));
    }

    #[test]
    fn test_integrate_story_request_without_body() {
        let request = IntegrateStoryRequest {
            story_id: StoryId::from("US-1"),
            story: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"storyId": "US-1"})
        );
    }

    #[test]
    fn test_integrate_all_request_wire_shape() {
        let request = IntegrateAllRequest {
            story_ids: vec![StoryId::Number(1), StoryId::Number(2)],
            stories: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"storyIds": [1, 2]})
        );
    }

    #[test]
    fn test_generate_response_parses_server_envelope() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "success": true,
            "stories": [{"id": 1, "title": "T"}],
            "count": 1,
            "output_file": "/tmp/out.txt"
        }))
        .unwrap();
        assert!(response.success);
        assert_eq!(response.stories.len(), 1);
        assert_eq!(response.count, Some(1));
    }

    #[test]
    fn test_receipt_tolerates_minimal_body() {
        let receipt: IntegrationReceipt = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(receipt.success);
        assert!(receipt.message.is_none());
    }

    #[test]
    fn test_health_status_is_ok() {
        let health: HealthStatus =
            serde_json::from_value(json!({"status": "ok", "provider": "ollama"})).unwrap();
        assert!(health.is_ok());
        assert_eq!(health.provider.as_deref(), Some("ollama"));
    }

    #[test]
    fn test_error_body_prefers_error_over_message() {
        let body: ErrorBody = serde_json::from_value(json!({
            "error": "bad file",
            "message": "ignored",
            "details": ["line 1", 2]
        }))
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("bad file"));
        assert_eq!(body.detail_lines(), vec!["line 1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_error_body_blank_error_falls_through() {
        let body: ErrorBody = serde_json::from_value(json!({"error": "  "})).unwrap();
        assert!(body.text().is_none());

        let body: ErrorBody =
            serde_json::from_value(json!({"error": "", "message": "quota exceeded"})).unwrap();
        assert_eq!(body.text().as_deref(), Some("quota exceeded"));
    }
}
