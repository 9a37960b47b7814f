//! Event management screen: editor form plus a local copy of the event list.

use chrono::{DateTime, Utc};

use crate::api::ApiClient;
use crate::errors::{AppError, FieldErrors};
use crate::models::{parse_tags, slugify, Event, EventInput, EventType};

/// Editor state for creating or editing one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    editing_id: Option<String>,
    title: String,
    slug: String,
    slug_edited: bool,
    pub description: String,
    pub event_type: EventType,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub location: String,
    pub capacity: u32,
    pub image: String,
    /// Comma-separated tags as typed
    pub tags_input: String,
    pub organizer: String,
}

impl EventForm {
    /// Empty form for a new event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing event.
    ///
    /// The slug counts as typed by hand, so retitling an event keeps its existing URL. Clearing
    /// the slug with [`EventForm::set_slug`] hands it back to the title.
    pub fn edit(event: &Event) -> Self {
        Self {
            editing_id: Some(event.id.clone()),
            title: event.title.clone(),
            slug: event.slug.clone(),
            slug_edited: true,
            description: event.description.clone(),
            event_type: event.event_type,
            start_at: Some(event.start_at),
            end_at: Some(event.end_at),
            location: event.location.clone(),
            capacity: event.capacity,
            image: event.image.clone().unwrap_or_default(),
            tags_input: event.tags.join(", "),
            organizer: event.organizer.clone().unwrap_or_default(),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Set the title, regenerating the slug unless it was typed by hand.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if !self.slug_edited {
            self.slug = slugify(title);
        }
    }

    /// Set the slug by hand. Clearing it hands control back to the title.
    pub fn set_slug(&mut self, slug: &str) {
        self.slug = slug.trim().to_string();
        self.slug_edited = !self.slug.is_empty();
        if !self.slug_edited {
            self.slug = slugify(&self.title);
        }
    }

    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_input)
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.push("title", "Title is required");
        }
        if self.slug.is_empty() {
            errors.push("slug", "Slug is required");
        }
        if self.description.trim().is_empty() {
            errors.push("description", "Description is required");
        }
        if self.location.trim().is_empty() {
            errors.push("location", "Location is required");
        }
        match (self.start_at, self.end_at) {
            (None, _) => errors.push("startAt", "Start time is required"),
            (_, None) => errors.push("endAt", "End time is required"),
            (Some(start), Some(end)) if end < start => {
                errors.push("endAt", "End time must not be before start time")
            }
            _ => {}
        }
        errors
    }

    /// Validate and build the request body.
    pub fn to_input(&self) -> Result<EventInput, AppError> {
        let errors = self.validate();
        match (self.start_at, self.end_at) {
            (Some(start_at), Some(end_at)) if errors.is_empty() => Ok(EventInput {
                title: self.title.trim().to_string(),
                slug: self.slug.clone(),
                description: self.description.trim().to_string(),
                event_type: self.event_type,
                start_at,
                end_at,
                location: self.location.trim().to_string(),
                capacity: self.capacity,
                image: non_empty(&self.image),
                tags: self.tags(),
                organizer: non_empty(&self.organizer),
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Admin view over `/events` holding its own copy of the list.
pub struct EventManager {
    api: ApiClient,
    events: Vec<Event>,
}

impl EventManager {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.slug == slug)
    }

    /// Re-fetch the list from the backend.
    pub async fn refresh(&mut self) -> Result<&[Event], AppError> {
        match self.api.list_events().await {
            Ok(events) => {
                tracing::debug!("Fetched {} events", events.len());
                self.events = events;
                Ok(&self.events)
            }
            Err(e) => {
                tracing::error!("Failed to fetch events: {}", e);
                Err(e)
            }
        }
    }

    /// Create or update the event in `form`, then refresh the list.
    pub async fn save(&mut self, form: &EventForm) -> Result<Event, AppError> {
        let input = form.to_input()?;

        let result = match form.editing_id() {
            Some(id) => self.api.update_event(id, &input.into()).await,
            None => self.api.create_event(&input).await,
        };

        let saved = result.inspect_err(|e| tracing::error!("Failed to save event: {}", e))?;
        tracing::info!("Saved event {} ({})", saved.title, saved.slug);

        // A failed refresh is already logged and leaves the previous list in place
        let _ = self.refresh().await;
        Ok(saved)
    }

    /// Delete an event, then refresh the list.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        self.api
            .delete_event(id)
            .await
            .inspect_err(|e| tracing::error!("Failed to delete event: {}", e))?;
        tracing::info!("Deleted event {}", id);

        let _ = self.refresh().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, 14, hour, 0, 0).unwrap()
    }

    fn filled_form() -> EventForm {
        let mut form = EventForm::new();
        form.set_title("Intro to AI!");
        form.description = "Neural nets from scratch".into();
        form.location = "Seminar Hall".into();
        form.start_at = Some(at(10));
        form.end_at = Some(at(12));
        form.capacity = 60;
        form.tags_input = "ai, beginners , ".into();
        form
    }

    #[test]
    fn test_title_drives_slug_until_edited() {
        let mut form = EventForm::new();
        form.set_title("Rust Meetup #3");
        assert_eq!(form.slug(), "rust-meetup-3");

        form.set_slug("rust-3");
        form.set_title("Rust Meetup #3 (moved)");
        assert_eq!(form.slug(), "rust-3");

        form.set_slug("  ");
        assert_eq!(form.slug(), "rust-meetup-3-moved");
        form.set_title("Rust Night");
        assert_eq!(form.slug(), "rust-night");
    }

    #[test]
    fn test_to_input() {
        let input = filled_form().to_input().unwrap();
        assert_eq!(input.slug, "intro-to-ai");
        assert_eq!(input.tags, vec!["ai".to_string(), "beginners".to_string()]);
        assert_eq!(input.image, None);
        assert_eq!(input.organizer, None);
        assert_eq!(input.event_type, EventType::Workshop);
    }

    #[test]
    fn test_validation_reports_each_field() {
        let errors = EventForm::new().validate();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("slug"), Some("Slug is required"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("location"), Some("Location is required"));
        assert_eq!(errors.get("startAt"), Some("Start time is required"));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut form = filled_form();
        form.end_at = Some(at(9));
        let err = form.to_input().unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(
                errors.get("endAt"),
                Some("End time must not be before start time")
            ),
            other => panic!("unexpected error: {other:?}"),
        }

        form.end_at = form.start_at;
        assert!(form.to_input().is_ok());
    }

    #[test]
    fn test_edit_prefills_form() {
        let event = Event {
            id: "e9".into(),
            title: "Hack Night".into(),
            slug: "hack-night-2026".into(),
            description: "Build things".into(),
            event_type: EventType::Hackathon,
            start_at: at(18),
            end_at: at(23),
            location: "Lab 3".into(),
            capacity: 40,
            image: Some("https://img.citc.dev/hack.png".into()),
            tags: vec!["web".into(), "ml".into()],
            organizer: None,
            attendees: vec![],
        };

        let mut form = EventForm::edit(&event);
        assert_eq!(form.editing_id(), Some("e9"));
        assert_eq!(form.tags_input, "web, ml");

        form.set_title("Hack Night Reloaded");
        assert_eq!(form.slug(), "hack-night-2026");

        let input = form.to_input().unwrap();
        assert_eq!(input.image.as_deref(), Some("https://img.citc.dev/hack.png"));
        assert_eq!(input.tags, event.tags);
    }
}
