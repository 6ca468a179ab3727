use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{Event, EventFilter, EventPayload};

/// Repository trait for Event persistence
///
/// This trait defines the data access interface for events.
/// Implementations can use different storage backends (MongoDB, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create a new event with a server-assigned identifier
    async fn create(&self, input: EventPayload) -> EventResult<Event>;

    /// Get an event by ID
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// List events matching a filter, sorted by featured flag then start date
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    /// Replace an existing event's fields with the payload
    async fn update(&self, id: Uuid, input: EventPayload) -> EventResult<Event>;

    /// Delete an event by ID
    async fn delete(&self, id: Uuid) -> EventResult<bool>;
}
