//! User story records exchanged with the story service
//!
//! A [`StoryRecord`] is the unit of exchange and display. Records are
//! created by the remote generation call and are read-only on the client,
//! so unknown fields are carried through untouched: whatever the server
//! returned is what gets cached and what gets sent back on integration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque story identifier assigned by the server
///
/// Integer and text ids are the norm. Any other JSON value (a float, a
/// bool, an object) is kept as-is so it is sent back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryId {
    /// Numeric identifier (the common case)
    Number(i64),
    /// Textual identifier
    Text(String),
    /// Any other JSON value
    Other(Value),
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Read a display field, accepting any JSON value
///
/// Strings are taken as-is, `null` is absent, and numbers, bools or
/// structured values become their JSON text. One odd field must not
/// reject the whole story list.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl From<i64> for StoryId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StoryId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A single generated user story
///
/// Field names follow the wire format (`definitionOfDone`, `testCases`).
/// `test_cases` may be plain text or a structured JSON value; use
/// [`StoryRecord::test_cases_text`] to get its textual form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryRecord {
    /// Server-assigned identifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StoryId>,

    /// Story title
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// Story description
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Definition of done, may contain bullet markers
    #[serde(
        rename = "definitionOfDone",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub definition_of_done: Option<String>,

    /// Test cases as text or structured JSON
    #[serde(rename = "testCases", default, skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Value>,

    /// Any additional fields the server attached
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoryRecord {
    /// Create a record with the four display fields set
    ///
    /// # Examples
    ///
    /// ```
    /// use autoagile::story::StoryRecord;
    ///
    /// let story = StoryRecord::new("T", "D", "DoD", "Test: ok").with_id(1);
    /// assert_eq!(story.title.as_deref(), Some("T"));
    /// assert_eq!(story.test_cases_text().as_deref(), Some("Test: ok"));
    /// ```
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        definition_of_done: impl Into<String>,
        test_cases: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            description: Some(description.into()),
            definition_of_done: Some(definition_of_done.into()),
            test_cases: Some(Value::String(test_cases.into())),
            extra: Map::new(),
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<StoryId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identifier used for integration requests
    ///
    /// Falls back to the record's 1-based position when the server did
    /// not assign an id.
    ///
    /// # Examples
    ///
    /// ```
    /// use autoagile::story::{StoryId, StoryRecord};
    ///
    /// let story = StoryRecord::default();
    /// assert_eq!(story.id_or_position(2), StoryId::Number(3));
    /// ```
    pub fn id_or_position(&self, index: usize) -> StoryId {
        self.id
            .clone()
            .unwrap_or(StoryId::Number(index as i64 + 1))
    }

    /// Textual form of the test-case field
    ///
    /// Strings are returned as-is, `null` as `None`, and any structured
    /// value as compact JSON text.
    pub fn test_cases_text(&self) -> Option<String> {
        match &self.test_cases {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_names() {
        let story: StoryRecord = serde_json::from_value(json!({
            "id": 1,
            "title": "T",
            "description": "D",
            "definitionOfDone": "DoD",
            "testCases": "Test: ok"
        }))
        .unwrap();

        assert_eq!(story.id, Some(StoryId::Number(1)));
        assert_eq!(story.definition_of_done.as_deref(), Some("DoD"));
        assert_eq!(story.test_cases_text().as_deref(), Some("Test: ok"));
        assert!(story.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let raw = json!({
            "id": "US-7",
            "title": "T",
            "priority": "high",
            "source_quote": "the system shall"
        });
        let story: StoryRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(story.id, Some(StoryId::Text("US-7".to_string())));
        assert_eq!(serde_json::to_value(&story).unwrap(), raw);
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let story: StoryRecord = serde_json::from_value(json!({})).unwrap();
        assert!(story.id.is_none());
        assert!(story.title.is_none());
        assert!(story.test_cases_text().is_none());
    }

    #[test]
    fn test_structured_test_cases_text() {
        let story: StoryRecord = serde_json::from_value(json!({
            "testCases": [{"testCaseName": "Login"}]
        }))
        .unwrap();
        assert_eq!(
            story.test_cases_text().as_deref(),
            Some(r#"[{"testCaseName":"Login"}]"#)
        );
    }

    #[test]
    fn test_unusual_field_types_are_tolerated() {
        let story: StoryRecord = serde_json::from_value(json!({
            "id": 1.5,
            "title": 42,
            "description": null,
            "definitionOfDone": ["tests pass", "docs updated"]
        }))
        .unwrap();
        assert_eq!(story.id, Some(StoryId::Other(json!(1.5))));
        assert_eq!(story.title.as_deref(), Some("42"));
        assert!(story.description.is_none());
        assert_eq!(
            story.definition_of_done.as_deref(),
            Some(r#"["tests pass","docs updated"]"#)
        );
        assert_eq!(story.id_or_position(0).to_string(), "1.5");
        assert_eq!(serde_json::to_value(&story).unwrap()["id"], json!(1.5));
    }

    #[test]
    fn test_id_or_position_prefers_server_id() {
        let story = StoryRecord::default().with_id(42);
        assert_eq!(story.id_or_position(0), StoryId::Number(42));
        assert_eq!(StoryRecord::default().id_or_position(0), StoryId::Number(1));
    }

    #[test]
    fn test_story_id_display() {
        assert_eq!(StoryId::Number(3).to_string(), "3");
        assert_eq!(StoryId::from("US-1").to_string(), "US-1");
    }
}
