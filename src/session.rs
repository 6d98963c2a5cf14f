//! Session-scoped story cache
//!
//! The cache lives as long as one client session and is never written to
//! disk. It holds two entries, mirroring the keys the web client used:
//! the JSON-encoded story list and the originating project description.
//! Entries are overwritten wholesale on each successful generation.

use crate::error::{AutoAgileError, Result};
use crate::story::StoryRecord;
use std::collections::HashMap;

/// Key holding the JSON-encoded ordered story list
pub const STORIES_KEY: &str = "userStories";

/// Key holding the originating description or file name
pub const DESCRIPTION_KEY: &str = "projectDescription";

/// In-memory key/value store scoped to a single client session
#[derive(Debug, Default, Clone)]
pub struct SessionCache {
    entries: HashMap<String, String>,
}

impl SessionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly generated story list and its description
    ///
    /// Both entries are replaced; last write wins.
    ///
    /// # Errors
    ///
    /// Returns error if the story list cannot be serialized
    pub fn put(&mut self, stories: &[StoryRecord], description: &str) -> Result<()> {
        let encoded = serde_json::to_string(stories).map_err(AutoAgileError::from)?;
        tracing::debug!(
            "Caching {} stories ({} bytes) for '{}'",
            stories.len(),
            encoded.len(),
            description
        );
        self.entries.insert(STORIES_KEY.to_string(), encoded);
        self.entries
            .insert(DESCRIPTION_KEY.to_string(), description.to_string());
        Ok(())
    }

    /// Read back the cached story list and description
    ///
    /// An absent or unreadable story entry yields an empty list, which
    /// callers treat as "nothing generated yet".
    ///
    /// # Examples
    ///
    /// ```
    /// use autoagile::session::SessionCache;
    ///
    /// let cache = SessionCache::new();
    /// let (stories, description) = cache.get();
    /// assert!(stories.is_empty());
    /// assert!(description.is_none());
    /// ```
    pub fn get(&self) -> (Vec<StoryRecord>, Option<String>) {
        let stories = match self.entries.get(STORIES_KEY) {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::error!("Error parsing stored stories: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        (stories, self.entries.get(DESCRIPTION_KEY).cloned())
    }

    /// Raw value stored under `key`
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True when no story list has been cached
    pub fn is_empty(&self) -> bool {
        !self.entries.contains_key(STORIES_KEY)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
