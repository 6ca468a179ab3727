//! Event Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventFilter, EventPayload};
use crate::repository::EventRepository;

/// Event service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations.
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    /// Create a new EventService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new event
    #[instrument(skip(self, input), fields(event_title = %input.title))]
    pub async fn create_event(&self, input: EventPayload) -> EventResult<Event> {
        Self::validate_payload(&input)?;
        self.repository.create(input).await
    }

    /// Get an event by ID
    #[instrument(skip(self))]
    pub async fn get_event(&self, id: Uuid) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// List events with optional filters
    #[instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.repository.list(filter).await
    }

    /// Replace an existing event with the payload
    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: Uuid, input: EventPayload) -> EventResult<Event> {
        Self::validate_payload(&input)?;
        self.repository.update(id, input).await
    }

    /// Delete an event
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid) -> EventResult<()> {
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Structural validation plus the title-not-blank rule.
    ///
    /// A whitespace-only title passes the length validator but is still
    /// rejected here, for both create and update.
    fn validate_payload(input: &EventPayload) -> EventResult<()> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        if input.title.trim().is_empty() {
            return Err(EventError::Validation(
                "title must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
