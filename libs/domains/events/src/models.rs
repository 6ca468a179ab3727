use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Event entity - represents an event stored in MongoDB
///
/// Field names here are canonical: the same snake_case names are used
/// for writes, reads and query filters, so stored documents are always
/// reachable by the list filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Event title
    pub title: String,
    /// When the event starts
    #[serde(default, with = "bson_datetime_option")]
    pub start_date: Option<DateTime<Utc>>,
    /// When the event ends
    #[serde(default, with = "bson_datetime_option")]
    pub end_date: Option<DateTime<Utc>>,
    /// Venue name
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: String,
    /// Promotional image URL
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    /// External page with full details
    #[serde(default)]
    pub page_url: String,
    /// Free admission
    #[serde(default)]
    pub is_free: bool,
    /// Discount code, if the organizer provides one
    pub promo_code: Option<String>,
    #[serde(default)]
    pub organizer: String,
    /// Listing sort key, ascending, ahead of start date
    #[serde(default)]
    pub is_featured: bool,
}

/// DTO for creating or replacing an event
///
/// Updates are full replacements: every mutable field is taken from the
/// payload, so an omitted field resets to its default. The identifier is
/// never read from the payload.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct EventPayload {
    /// Defaulted so an absent title fails validation, not deserialization
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub is_free: bool,
    pub promo_code: Option<String>,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub is_featured: bool,
}

/// Query filters for listing events
///
/// Each populated field contributes one case-insensitive substring
/// condition; documents matching ANY condition are returned. With no
/// populated fields the listing returns everything.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct EventFilter {
    /// Match against the event title
    pub title: Option<String>,
    /// Match against the venue name
    pub place: Option<String>,
    /// Match against the city
    pub city: Option<String>,
    /// Match against the province
    pub province: Option<String>,
}

impl Event {
    /// Create a new event from an EventPayload DTO
    pub fn new(input: EventPayload) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            start_date: input.start_date,
            end_date: input.end_date,
            place: input.place,
            city: input.city,
            province: input.province,
            country: input.country,
            image_url: input.image_url,
            description: input.description,
            page_url: input.page_url,
            is_free: input.is_free,
            promo_code: input.promo_code,
            organizer: input.organizer,
            is_featured: input.is_featured,
        }
    }

    /// Replace every mutable field with the payload's values.
    ///
    /// The identifier is kept; everything else comes from the payload.
    pub fn replace_with(&mut self, input: EventPayload) {
        self.title = input.title;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.place = input.place;
        self.city = input.city;
        self.province = input.province;
        self.country = input.country;
        self.image_url = input.image_url;
        self.description = input.description;
        self.page_url = input.page_url;
        self.is_free = input.is_free;
        self.promo_code = input.promo_code;
        self.organizer = input.organizer;
        self.is_featured = input.is_featured;
    }
}

/// Bridges optional timestamps between the JSON surface and the store.
///
/// MongoDB sorts datetimes numerically but strings lexicographically,
/// and chrono's RFC 3339 output has variable sub-second precision, so
/// string-stored dates do not sort chronologically. Non-human-readable
/// serializers (the BSON wire path) therefore get native
/// `bson::DateTime` values (millisecond precision); human-readable ones
/// (JSON) keep RFC 3339 strings.
mod bson_datetime_option {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            value.serialize(serializer)
        } else {
            value
                .map(|dt| bson::DateTime::from_millis(dt.timestamp_millis()))
                .serialize(serializer)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            Option::<DateTime<Utc>>::deserialize(deserializer)
        } else {
            Option::<bson::DateTime>::deserialize(deserializer)?
                .map(|dt| {
                    DateTime::from_timestamp_millis(dt.timestamp_millis())
                        .ok_or_else(|| serde::de::Error::custom("timestamp out of range"))
                })
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> EventPayload {
        EventPayload {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_assigns_fresh_id() {
        let a = Event::new(payload("Jazz Night"));
        let b = Event::new(payload("Jazz Night"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "Jazz Night");
    }

    #[test]
    fn test_id_serializes_as_underscore_id() {
        let event = Event::new(payload("Jazz Night"));
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_id_deserializes_from_alias() {
        let json = serde_json::json!({
            "id": "0192d3a0-0000-7000-8000-000000000001",
            "title": "Jazz Night",
            "start_date": null,
            "end_date": null,
            "promo_code": null,
        });
        let event: Event = serde_json::from_value(json).unwrap();
        assert_eq!(event.title, "Jazz Night");
        assert!(event.place.is_empty());
        assert!(!event.is_featured);
    }

    #[test]
    fn test_replace_with_keeps_id_and_resets_omitted_fields() {
        let mut event = Event::new(EventPayload {
            title: "Jazz Night".to_string(),
            city: "Toronto".to_string(),
            is_featured: true,
            ..Default::default()
        });
        let id = event.id;

        event.replace_with(payload("Rock Fest"));

        assert_eq!(event.id, id);
        assert_eq!(event.title, "Rock Fest");
        assert!(event.city.is_empty());
        assert!(!event.is_featured);
    }

    #[test]
    fn test_payload_ignores_client_supplied_id() {
        let json = serde_json::json!({
            "id": "0192d3a0-0000-7000-8000-000000000001",
            "title": "Jazz Night",
        });
        let input: EventPayload = serde_json::from_value(json).unwrap();
        let event = Event::new(input);
        assert_ne!(
            event.id.to_string(),
            "0192d3a0-0000-7000-8000-000000000001"
        );
    }

    fn stored_document(event: &Event) -> mongodb::bson::Document {
        use mongodb::bson::{Bson, SerializerOptions};

        let options = SerializerOptions::builder().human_readable(false).build();
        match mongodb::bson::to_bson_with_options(event, options).unwrap() {
            Bson::Document(doc) => doc,
            other => panic!("expected a document, got {:?}", other),
        }
    }

    #[test]
    fn test_dates_stored_as_native_datetimes() {
        use mongodb::bson::Bson;

        let mut event = Event::new(payload("Jazz Night"));
        event.start_date = Some("2024-05-01T10:00:00.500Z".parse().unwrap());

        let doc = stored_document(&event);
        assert!(doc.get_datetime("start_date").is_ok());
        assert_eq!(doc.get("end_date"), Some(&Bson::Null));
    }

    #[test]
    fn test_stored_dates_keep_chronological_order_with_fractional_seconds() {
        // As RFC 3339 strings this pair sorts inverted ('.' before 'Z')
        let mut on_the_second = Event::new(payload("Jazz Night"));
        on_the_second.start_date = Some("2024-05-01T10:00:00Z".parse().unwrap());
        let mut half_past = Event::new(payload("Rock Fest"));
        half_past.start_date = Some("2024-05-01T10:00:00.500Z".parse().unwrap());

        let earlier = *stored_document(&on_the_second)
            .get_datetime("start_date")
            .unwrap();
        let later = *stored_document(&half_past)
            .get_datetime("start_date")
            .unwrap();

        assert!(earlier < later);
    }

    #[test]
    fn test_dates_remain_rfc3339_in_json() {
        let mut event = Event::new(payload("Jazz Night"));
        event.start_date = Some("2024-05-01T10:00:00Z".parse().unwrap());

        let json = serde_json::to_value(&event).unwrap();
        let rendered = json["start_date"].as_str().unwrap();
        assert!(rendered.starts_with("2024-05-01T10:00:00"));
        assert!(json["end_date"].is_null());

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back.start_date, event.start_date);
    }

    #[test]
    fn test_payload_validation() {
        use validator::Validate;

        assert!(payload("Jazz Night").validate().is_ok());
        assert!(payload("").validate().is_err());
        assert!(payload(&"x".repeat(201)).validate().is_err());
    }
}
