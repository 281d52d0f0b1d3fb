use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{ser::SerializeMap, Deserialize, Serialize};
use serde_json::Value;

use super::schema::{Fields, SchemaViolation, Shape};
use super::{BookRecommendation, VideoRecommendation};

/// A shape that can appear inside a `RecommendationList`
pub trait Listable: Shape + Serialize + JsonSchema {
    /// Key the list is published under (`books`, `videos`)
    const COLLECTION: &'static str;
}

impl Listable for BookRecommendation {
    const COLLECTION: &'static str = "books";
}

impl Listable for VideoRecommendation {
    const COLLECTION: &'static str = "videos";
}

/// Ordered recommendations, serialized as `{"<collection>": [...]}`
///
/// Order is presentation order as returned by the agent; it is not a ranking key.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationList<T> {
    pub items: Vec<T>,
}

pub type BookList = RecommendationList<BookRecommendation>;
pub type VideoList = RecommendationList<VideoRecommendation>;

impl<T> RecommendationList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Listable> Shape for RecommendationList<T> {
    const NAME: &'static str = T::COLLECTION;

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self::new(f.list_of(T::COLLECTION)?))
    }
}

impl<T: Listable> JsonSchema for RecommendationList<T> {
    fn schema_name() -> String {
        format!("{}List", T::schema_name())
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            ..Default::default()
        };
        let object = schema.object();
        object.properties.insert(
            T::COLLECTION.to_string(),
            generator.subschema_for::<Vec<T>>(),
        );
        object.required.insert(T::COLLECTION.to_string());
        schema.into()
    }
}

impl<T: Listable> Serialize for RecommendationList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(T::COLLECTION, &self.items)?;
        map.end()
    }
}

impl<'de, T: Listable> Deserialize<'de> for RecommendationList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{schema::output_schema, SimilarityType};
    use serde_json::json;

    fn book(title: &str, rating: Option<f64>) -> BookRecommendation {
        BookRecommendation {
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            similarity_type: SimilarityType::AuthorAndWritingStyle,
            publication_year: "1969".to_string(),
            explanation: "Anthropological science fiction".to_string(),
            genre: vec!["🚀 Science Fiction".to_string()],
            subgenres: None,
            goodreads_rating: rating,
            storygraph_rating: None,
            plot_summary: "A human envoy on a planet of ambisexual people.".to_string(),
            page_count: Some(304),
            content_advisories: None,
            awards: Some(vec!["Hugo Award".to_string(), "Nebula Award".to_string()]),
            series_info: Some("Hainish Cycle".to_string()),
            similar_authors: None,
            audiobook_available: Some(false),
            upcoming_adaptations: None,
            diversity_highlight: None,
            trigger_warnings: None,
        }
    }

    #[test]
    fn test_book_list_round_trip_keeps_absent_fields_absent() {
        let list = BookList::new(vec![
            book("The Left Hand of Darkness", Some(4.09)),
            book("The Dispossessed", None),
        ]);

        let wire = serde_json::to_string(&list).unwrap();
        assert!(!wire.contains("null"));
        assert!(!wire.contains("storygraph_rating"));

        let parsed: BookList = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, list);
        assert_eq!(parsed.items[1].goodreads_rating, None);
        assert_eq!(parsed.items[0].title, "The Left Hand of Darkness");
    }

    #[test]
    fn test_violation_path_points_into_list() {
        let value = json!({
            "books": [
                serde_json::to_value(book("Lathe of Heaven", None)).unwrap(),
                { "author": "Nobody" }
            ]
        });

        let err = BookList::from_value(&value).unwrap_err();
        assert_eq!(err.field, "books[1].title");
    }

    #[test]
    fn test_missing_collection_key() {
        let err = VideoList::from_value(&json!({ "books": [] })).unwrap_err();
        assert_eq!(err.field, "videos");
        assert_eq!(err.expected, "list of video");
    }

    #[test]
    fn test_empty_list_is_valid() {
        let list = VideoList::from_value(&json!({ "videos": [] })).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_schema_wraps_item_shape() {
        let schema = output_schema::<BookList>().unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["books"]));
        assert_eq!(schema["properties"]["books"]["type"], "array");
        assert_eq!(
            schema["properties"]["books"]["items"]["properties"]["title"]["type"],
            "string"
        );
        assert!(schema.get("definitions").is_none());
    }
}
