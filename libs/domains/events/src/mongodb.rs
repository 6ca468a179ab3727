//! MongoDB implementation of EventRepository

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::{
    Collection, Database,
    bson::{Bson, doc, to_bson},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventFilter, EventPayload};
use crate::query;
use crate::repository::EventRepository;

/// Upper bound for a single store operation. An operation that exceeds
/// it fails with `EventError::Timeout` instead of hanging the request.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a store operation with the standard per-operation deadline.
///
/// Accepts `IntoFuture` so driver actions can be passed without an
/// intermediate `.into_future()` call.
async fn bounded<T, F>(op: &'static str, fut: F) -> EventResult<T>
where
    F: IntoFuture<Output = Result<T, mongodb::error::Error>>,
{
    match tokio::time::timeout(OPERATION_TIMEOUT, fut).await {
        Ok(result) => result.map_err(EventError::from),
        Err(_) => {
            tracing::error!(operation = op, "Store operation timed out");
            Err(EventError::Timeout(op))
        }
    }
}

/// MongoDB implementation of the EventRepository
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    /// Create a new MongoEventRepository
    ///
    /// # Arguments
    /// * `db` - MongoDB database instance
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("mydb");
    /// let repo = MongoEventRepository::new(db);
    /// ```
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<Event>("events");
        Self { collection }
    }

    /// Create a new MongoEventRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Event>(collection_name);
        Self { collection }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Event> {
        &self.collection
    }

    fn id_filter(id: Uuid) -> mongodb::bson::Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    /// Create the compound index backing the fixed listing sort
    pub async fn create_indexes(&self) -> EventResult<()> {
        let index = mongodb::IndexModel::builder()
            .keys(query::sort_spec())
            .build();

        bounded("create_index", async {
            self.collection.create_index(index).await.map(|_| ())
        })
        .await?;

        tracing::info!("Event collection indexes created");
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, input), fields(event_title = %input.title))]
    async fn create(&self, input: EventPayload) -> EventResult<Event> {
        let event = Event::new(input);

        bounded("insert", self.collection.insert_one(&event)).await?;

        tracing::info!(event_id = %event.id, "Event created successfully");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let filter = Self::id_filter(id);
        let event = bounded("find_one", self.collection.find_one(filter)).await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        use futures_util::TryStreamExt;

        let mongo_filter = query::build_filter(&filter);

        let options = mongodb::options::FindOptions::builder()
            .sort(query::sort_spec())
            .build();

        let events = bounded("find", async {
            let cursor = self
                .collection
                .find(mongo_filter)
                .with_options(options)
                .await?;
            cursor.try_collect::<Vec<Event>>().await
        })
        .await?;

        Ok(events)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: EventPayload) -> EventResult<Event> {
        // First, get the existing event
        let filter = Self::id_filter(id);
        let existing = bounded("find_one", self.collection.find_one(filter.clone()))
            .await?
            .ok_or(EventError::NotFound(id))?;

        // Replace all mutable fields
        let mut updated = existing;
        updated.replace_with(input);

        bounded("replace", self.collection.replace_one(filter, &updated)).await?;

        tracing::info!(event_id = %id, "Event updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> EventResult<bool> {
        let filter = Self::id_filter(id);
        let result = bounded("delete", self.collection.delete_one(filter)).await?;

        if result.deleted_count == 0 {
            return Err(EventError::NotFound(id));
        }

        tracing::info!(event_id = %id, "Event deleted successfully");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_filter_uses_canonical_field() {
        let id = Uuid::now_v7();
        let filter = MongoEventRepository::id_filter(id);
        assert!(filter.contains_key("_id"));
        assert_eq!(filter.len(), 1);
    }

    #[tokio::test]
    async fn test_bounded_passes_through_success() {
        let result = bounded("noop", async { Ok::<_, mongodb::error::Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_slow_operations() {
        let result = bounded("slow", async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, mongodb::error::Error>(())
        })
        .await;

        assert!(matches!(result, Err(EventError::Timeout("slow"))));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_list_ordering_and_filters_live() {
        use chrono::{DateTime, Utc};

        fn date(value: &str) -> Option<DateTime<Utc>> {
            Some(value.parse().unwrap())
        }

        let mongo_url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&mongo_url).await.unwrap();
        let db = client.database("domain_events_tests");
        let repo = MongoEventRepository::with_collection(db, "events_ordering");
        repo.collection().drop().await.ok();

        let jazz = repo
            .create(EventPayload {
                title: "Jazz Night".to_string(),
                place: "Blue Note".to_string(),
                start_date: date("2024-05-01T10:00:00Z"),
                ..Default::default()
            })
            .await
            .unwrap();
        let brunch = repo
            .create(EventPayload {
                title: "Jazz Brunch".to_string(),
                start_date: date("2024-05-01T10:00:00.500Z"),
                ..Default::default()
            })
            .await
            .unwrap();
        let rock = repo
            .create(EventPayload {
                title: "Rock Fest".to_string(),
                place: "Arena".to_string(),
                start_date: date("2024-04-01T10:00:00Z"),
                is_featured: true,
                ..Default::default()
            })
            .await
            .unwrap();

        // Non-featured first, then ascending start date; the fractional
        // second must not push the brunch ahead of the earlier show
        let all = repo.list(EventFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![jazz.id, brunch.id, rock.id]);

        // Case-insensitive substring matching across the OR'd fields
        let by_title = repo
            .list(EventFilter {
                title: Some("JAZZ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_title.len(), 2);

        let by_place = repo
            .list(EventFilter {
                place: Some("note".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_place.len(), 1);
        assert_eq!(by_place[0].id, jazz.id);

        repo.collection().drop().await.ok();
    }
}
