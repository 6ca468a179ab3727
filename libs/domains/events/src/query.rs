//! MongoDB filter and sort construction for event listings

use mongodb::bson::{Document, doc};

use crate::models::EventFilter;

/// Build a MongoDB filter document from EventFilter.
///
/// Every populated, non-blank filter field becomes a case-insensitive
/// substring condition on its own document field, combined with `$or`.
/// Values are regex-escaped so `C++ Meetup` matches literally. An
/// empty filter yields an empty document (match everything).
pub fn build_filter(filter: &EventFilter) -> Document {
    let fields = [
        ("title", &filter.title),
        ("place", &filter.place),
        ("city", &filter.city),
        ("province", &filter.province),
    ];

    let conditions: Vec<Document> = fields
        .into_iter()
        .filter_map(|(field, value)| {
            let trimmed = value.as_deref()?.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(doc! {
                field: { "$regex": regex::escape(trimmed), "$options": "i" }
            })
        })
        .collect();

    if conditions.is_empty() {
        doc! {}
    } else {
        doc! { "$or": conditions }
    }
}

/// Sort specification for event listings: ascending by the featured
/// flag, then ascending by start date. Not configurable by callers.
pub fn sort_spec() -> Document {
    doc! { "is_featured": 1, "start_date": 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_empty_filter_matches_everything() {
        let doc = build_filter(&EventFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let filter = EventFilter {
            title: Some("   ".to_string()),
            city: Some(String::new()),
            ..Default::default()
        };
        assert!(build_filter(&filter).is_empty());
    }

    #[test]
    fn test_single_field_builds_one_condition() {
        let filter = EventFilter {
            city: Some("Toronto".to_string()),
            ..Default::default()
        };
        let doc = build_filter(&filter);
        let or = doc.get_array("$or").unwrap();
        assert_eq!(or.len(), 1);

        let Bson::Document(condition) = &or[0] else {
            panic!("expected document condition");
        };
        let regex = condition.get_document("city").unwrap();
        assert_eq!(regex.get_str("$regex").unwrap(), "Toronto");
        assert_eq!(regex.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_multiple_fields_are_ored() {
        let filter = EventFilter {
            title: Some("jazz".to_string()),
            place: Some("hall".to_string()),
            province: Some("ON".to_string()),
            ..Default::default()
        };
        let doc = build_filter(&filter);
        assert_eq!(doc.get_array("$or").unwrap().len(), 3);
    }

    #[test]
    fn test_values_are_regex_escaped() {
        let filter = EventFilter {
            title: Some("C++ Meetup (2026)".to_string()),
            ..Default::default()
        };
        let doc = build_filter(&filter);
        let or = doc.get_array("$or").unwrap();
        let Bson::Document(condition) = &or[0] else {
            panic!("expected document condition");
        };
        let pattern = condition.get_document("title").unwrap();
        assert_eq!(
            pattern.get_str("$regex").unwrap(),
            r"C\+\+ Meetup \(2026\)"
        );
    }

    #[test]
    fn test_values_are_trimmed_before_matching() {
        let filter = EventFilter {
            title: Some("  jazz  ".to_string()),
            ..Default::default()
        };
        let doc = build_filter(&filter);
        let or = doc.get_array("$or").unwrap();
        let Bson::Document(condition) = &or[0] else {
            panic!("expected document condition");
        };
        assert_eq!(
            condition.get_document("title").unwrap().get_str("$regex").unwrap(),
            "jazz"
        );
    }

    #[test]
    fn test_sort_spec_orders_featured_then_start_date() {
        let spec = sort_spec();
        let keys: Vec<_> = spec.keys().collect();
        assert_eq!(keys, vec!["is_featured", "start_date"]);
        assert_eq!(spec.get_i32("is_featured").unwrap(), 1);
        assert_eq!(spec.get_i32("start_date").unwrap(), 1);
    }
}
