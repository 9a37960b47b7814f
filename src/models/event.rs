//! Event model matching the backend `/events` resource.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of club event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    #[default]
    Workshop,
    Hackathon,
    TechTalk,
    CodingChallenge,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Workshop => "workshop",
            EventType::Hackathon => "hackathon",
            EventType::TechTalk => "tech-talk",
            EventType::CodingChallenge => "coding-challenge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "workshop" => Some(EventType::Workshop),
            "hackathon" => Some(EventType::Hackathon),
            "tech-talk" => Some(EventType::TechTalk),
            "coding-challenge" => Some(EventType::CodingChallenge),
            _ => None,
        }
    }

    /// Badge label used in event listings.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Workshop => "Workshop",
            EventType::Hackathon => "Hackathon",
            EventType::TechTalk => "Tech Talk",
            EventType::CodingChallenge => "Coding Challenge",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A club event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// Member ids of registered attendees
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl Event {
    pub fn seats_left(&self) -> u32 {
        self.capacity
            .saturating_sub(u32::try_from(self.attendees.len()).unwrap_or(u32::MAX))
    }
}

/// Request body for `POST /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
}

/// Request body for `PUT /events/{id}`; absent fields are left unchanged.
///
/// Built from a whole form, every field is present, so an emptied optional field is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// `Some(None)` is sent as `null` and clears the image
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub organizer: Option<Option<String>>,
}

impl From<EventInput> for EventPatch {
    fn from(input: EventInput) -> Self {
        Self {
            title: Some(input.title),
            slug: Some(input.slug),
            description: Some(input.description),
            event_type: Some(input.event_type),
            start_at: Some(input.start_at),
            end_at: Some(input.end_at),
            location: Some(input.location),
            capacity: Some(input.capacity),
            image: Some(input.image),
            tags: Some(input.tags),
            organizer: Some(input.organizer),
        }
    }
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into one `-`, and trims
/// hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Split a comma-separated tag field into trimmed, non-empty tags, keeping their order.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to AI!"), "intro-to-ai");
        assert_eq!(slugify("  --Edge--  "), "edge");
        assert_eq!(slugify("Rust & WebAssembly 101"), "rust-webassembly-101");
        assert_eq!(slugify("Café Coding"), "caf-coding");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" ai, ml ,, python ,"),
            vec!["ai".to_string(), "ml".to_string(), "python".to_string()]
        );
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_event_wire_format() {
        let event: Event = serde_json::from_value(json!({
            "_id": "e1",
            "title": "Hack Night",
            "slug": "hack-night",
            "description": "All night hacking",
            "type": "coding-challenge",
            "startAt": "2026-03-01T18:00:00.000Z",
            "endAt": "2026-03-02T06:00:00.000Z",
            "location": "Lab 3",
            "capacity": 2,
            "tags": ["cp"],
            "attendees": ["m1", "m2", "m3"]
        }))
        .unwrap();

        assert_eq!(event.event_type, EventType::CodingChallenge);
        assert_eq!(event.event_type.label(), "Coding Challenge");
        assert!(event.image.is_none());
        assert_eq!(event.seats_left(), 0);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["_id"], "e1");
        assert_eq!(value["type"], "coding-challenge");
        assert!(value.get("organizer").is_none());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = EventPatch {
            capacity: Some(40),
            event_type: Some(EventType::TechTalk),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "type": "tech-talk", "capacity": 40 }));
    }

    #[test]
    fn test_patch_from_form_sends_cleared_fields_as_null() {
        let input = EventInput {
            title: "Hack Night".into(),
            slug: "hack-night".into(),
            description: "All night hacking".into(),
            event_type: EventType::Hackathon,
            start_at: "2026-03-01T18:00:00Z".parse().unwrap(),
            end_at: "2026-03-02T06:00:00Z".parse().unwrap(),
            location: "Lab 3".into(),
            capacity: 30,
            image: None,
            tags: vec![],
            organizer: Some("CITC".into()),
        };

        let value = serde_json::to_value(EventPatch::from(input)).unwrap();
        assert_eq!(value["image"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("image"));
        assert_eq!(value["organizer"], "CITC");

        let patch: EventPatch =
            serde_json::from_value(json!({ "image": null, "capacity": 10 })).unwrap();
        assert_eq!(patch.image, Some(None));
        assert_eq!(patch.organizer, None);
    }
}
