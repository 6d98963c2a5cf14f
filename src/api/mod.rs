//! Story service module for autoagile
//!
//! This module contains the story service abstraction and its HTTP
//! implementation.

pub mod base;
pub mod http;

pub use base::{
    GenerateResponse, HealthStatus, IntegrateAllRequest, IntegrateStoryRequest,
    IntegrationReceipt, StoryService, UploadDocument,
};
pub use http::HttpStoryService;

use crate::config::Config;
use crate::error::Result;

/// Create the story service described by the configuration
///
/// # Errors
///
/// Returns error if the configured server URL is invalid or the HTTP
/// client cannot be initialized
pub fn create_service(config: &Config) -> Result<Box<dyn StoryService>> {
    Ok(Box::new(HttpStoryService::new(&config.server)?))
}
