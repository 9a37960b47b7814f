//! Event endpoints.

use serde_json::Value;

use super::ApiClient;
use crate::errors::AppError;
use crate::models::{Event, EventInput, EventPatch};

impl ApiClient {
    /// GET /events - List all events.
    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.get(&["events"]).await
    }

    /// GET /events/:slug - Get a single event by slug.
    pub async fn get_event(&self, slug: &str) -> Result<Event, AppError> {
        self.get(&["events", slug]).await
    }

    /// POST /events - Create a new event.
    pub async fn create_event(&self, input: &EventInput) -> Result<Event, AppError> {
        self.post(&["events"], input).await
    }

    /// PUT /events/:id - Update an event.
    pub async fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event, AppError> {
        self.put(&["events", id], patch).await
    }

    /// DELETE /events/:id - Delete an event. Returns the server's acknowledgement body.
    pub async fn delete_event(&self, id: &str) -> Result<Value, AppError> {
        self.delete(&["events", id]).await
    }
}
