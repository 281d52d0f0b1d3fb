use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::schema::{Fields, SchemaViolation, Shape, Variants};

/// Which aspect of the source book a recommendation is similar in
#[derive(Debug, Clone, Copy, Serialize, JsonSchema, PartialEq, Eq)]
pub enum SimilarityType {
    #[serde(rename = "genre & themes")]
    GenreAndThemes,
    #[serde(rename = "author & writing style")]
    AuthorAndWritingStyle,
    #[serde(rename = "plot & characters")]
    PlotAndCharacters,
}

impl Variants for SimilarityType {
    const VARIANTS: &'static [Self] = &[
        SimilarityType::GenreAndThemes,
        SimilarityType::AuthorAndWritingStyle,
        SimilarityType::PlotAndCharacters,
    ];

    fn label(&self) -> &'static str {
        match self {
            SimilarityType::GenreAndThemes => "genre & themes",
            SimilarityType::AuthorAndWritingStyle => "author & writing style",
            SimilarityType::PlotAndCharacters => "plot & characters",
        }
    }
}

/// A single book suggested by the agent
#[derive(Debug, Clone, Serialize, JsonSchema, PartialEq)]
pub struct BookRecommendation {
    /// The title of the book
    pub title: String,
    /// The author of the book
    pub author: String,
    /// The type of similarity
    pub similarity_type: SimilarityType,
    /// The publication year
    pub publication_year: String,
    /// Why the book is similar
    pub explanation: String,
    /// Genres, each starting with an emoji representing it
    pub genre: Vec<String>,
    /// A brief plot summary
    pub plot_summary: String,
    /// The subgenres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subgenres: Option<Vec<String>>,
    /// The Goodreads rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodreads_rating: Option<f64>,
    /// The StoryGraph rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storygraph_rating: Option<f64>,
    /// The page count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    /// Content advisories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_advisories: Option<Vec<String>>,
    /// Awards and recognition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<String>>,
    /// Series information, if part of a series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_info: Option<String>,
    /// Authors with a similar style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_authors: Option<Vec<String>>,
    /// Whether an audiobook exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audiobook_available: Option<bool>,
    /// Announced film or TV adaptations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_adaptations: Option<String>,
    /// Diversity of author or perspective
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diversity_highlight: Option<String>,
    /// Trigger warnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_warnings: Option<Vec<String>>,
}

impl Shape for BookRecommendation {
    const NAME: &'static str = "book";

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self {
            title: f.string("title")?,
            author: f.string("author")?,
            similarity_type: f.variant("similarity_type")?,
            publication_year: f.string("publication_year")?,
            explanation: f.string("explanation")?,
            genre: f.non_empty_strings("genre")?,
            plot_summary: f.string("plot_summary")?,
            subgenres: f.opt_strings("subgenres")?,
            goodreads_rating: f.opt_decimal("goodreads_rating")?,
            storygraph_rating: f.opt_decimal("storygraph_rating")?,
            page_count: f.opt_integer("page_count")?,
            content_advisories: f.opt_strings("content_advisories")?,
            awards: f.opt_strings("awards")?,
            series_info: f.opt_string("series_info")?,
            similar_authors: f.opt_strings("similar_authors")?,
            audiobook_available: f.opt_bool("audiobook_available")?,
            upcoming_adaptations: f.opt_string("upcoming_adaptations")?,
            diversity_highlight: f.opt_string("diversity_highlight")?,
            trigger_warnings: f.opt_strings("trigger_warnings")?,
        })
    }
}

crate::deserialize_via_shape!(BookRecommendation);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::output_schema;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "title": "Hyperion",
            "author": "Dan Simmons",
            "similarity_type": "genre & themes",
            "publication_year": "1989",
            "explanation": "Epic far-future science fiction with political intrigue",
            "genre": ["🚀 Science Fiction"],
            "plot_summary": "Seven pilgrims travel to the Time Tombs on Hyperion."
        })
    }

    #[test]
    fn test_minimal_book_has_no_optional_fields() {
        let book = BookRecommendation::from_value(&minimal()).unwrap();

        assert_eq!(book.title, "Hyperion");
        assert_eq!(book.similarity_type, SimilarityType::GenreAndThemes);
        assert_eq!(book.page_count, None);
        assert_eq!(book.goodreads_rating, None);

        let serialized = serde_json::to_value(&book).unwrap();
        assert_eq!(serialized, minimal());
    }

    #[test]
    fn test_missing_title_is_named_even_with_optional_fields() {
        let mut value = minimal();
        let obj = value.as_object_mut().unwrap();
        obj.remove("title");
        obj.insert("subgenres".into(), json!(["Space Opera"]));
        obj.insert("goodreads_rating".into(), json!(4.25));
        obj.insert("page_count".into(), json!(482));
        obj.insert("awards".into(), json!(["Hugo Award"]));
        obj.insert("audiobook_available".into(), json!(true));

        let err = BookRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn test_missing_plot_summary_is_rejected() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("plot_summary");

        let err = BookRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "plot_summary");
        assert_eq!(err.expected, "string");
    }

    #[test]
    fn test_schema_marks_required_fields() {
        let schema = output_schema::<BookRecommendation>().unwrap();

        assert_eq!(
            schema["required"],
            json!([
                "author",
                "explanation",
                "genre",
                "plot_summary",
                "publication_year",
                "similarity_type",
                "title"
            ])
        );
        assert_eq!(
            schema["properties"]["similarity_type"]["enum"],
            json!(["genre & themes", "author & writing style", "plot & characters"])
        );
        assert_eq!(
            schema["properties"]["plot_summary"]["description"],
            "A brief plot summary"
        );
    }

    #[test]
    fn test_unknown_similarity_type_is_rejected() {
        let mut value = minimal();
        value["similarity_type"] = json!("vibes");

        let err = BookRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "similarity_type");
        assert!(err.expected.contains("\"plot & characters\""));
    }

    #[test]
    fn test_empty_genre_is_rejected() {
        let mut value = minimal();
        value["genre"] = json!([]);

        let err = BookRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "genre");
    }

    #[test]
    fn test_rating_with_suffix_is_rejected() {
        let mut value = minimal();
        value["goodreads_rating"] = json!("4.1/5");

        let err = BookRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "goodreads_rating");
        assert_eq!(err.expected, "decimal");
    }

    #[test]
    fn test_serde_deserialize_uses_schema() {
        let err = serde_json::from_value::<BookRecommendation>(json!({ "title": "x" }))
            .unwrap_err()
            .to_string();
        assert!(err.contains("author"), "{err}");
    }
}
