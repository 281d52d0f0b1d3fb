use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::schema::{Fields, SchemaViolation, Shape, Variants};

/// Kind of video content
#[derive(Debug, Clone, Copy, Serialize, JsonSchema, PartialEq, Eq)]
pub enum MediaType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl Variants for MediaType {
    const VARIANTS: &'static [Self] = &[MediaType::Movie, MediaType::TvShow];

    fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::TvShow => "TV Show",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single movie or TV show suggested by the agent
#[derive(Debug, Clone, Serialize, JsonSchema, PartialEq)]
pub struct VideoRecommendation {
    /// The title of the movie or TV show
    pub title: String,
    /// Whether it is a movie or a TV show
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Why this movie or TV show is similar
    pub explanation: String,
    /// The main actors
    pub actors: Vec<String>,
    /// Genres, each starting with an emoji representing it
    pub genre: Vec<String>,
    /// The release year
    pub release_year: i32,
    /// A brief summary of the plot
    pub plot_summary: String,
    /// The director(s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<String>>,
    /// The IMDb rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    /// The TMDB rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_rating: Option<f64>,
    /// The runtime in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    /// Content advisories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_advisories: Option<Vec<String>>,
    /// Awards won
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<String>>,
    /// How many seasons, if a TV show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_season: Option<String>,
    /// Other similar movies or TV shows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_videos: Option<Vec<String>>,
    /// Where it is streaming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_services: Option<Vec<String>>,
}

impl Shape for VideoRecommendation {
    const NAME: &'static str = "video";

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self {
            title: f.string("title")?,
            media_type: f.variant("type")?,
            explanation: f.string("explanation")?,
            actors: f.strings("actors")?,
            genre: f.non_empty_strings("genre")?,
            release_year: f.integer("release_year")?,
            plot_summary: f.string("plot_summary")?,
            directors: f.opt_strings("directors")?,
            imdb_rating: f.opt_decimal("imdb_rating")?,
            tmdb_rating: f.opt_decimal("tmdb_rating")?,
            runtime: f.opt_integer("runtime")?,
            content_advisories: f.opt_strings("content_advisories")?,
            awards: f.opt_strings("awards")?,
            series_season: f.opt_string("series_season")?,
            similar_videos: f.opt_strings("similar_videos")?,
            streaming_services: f.opt_strings("streaming_services")?,
        })
    }
}

crate::deserialize_via_shape!(VideoRecommendation);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::output_schema;
    use serde_json::json;

    fn arrival() -> Value {
        json!({
            "title": "Arrival",
            "type": "Movie",
            "explanation": "Cerebral first-contact story",
            "actors": ["Amy Adams", "Jeremy Renner"],
            "genre": ["👽 Science Fiction", "🎭 Drama"],
            "release_year": 2016,
            "plot_summary": "A linguist works to communicate with visitors.",
            "runtime": "116",
            "imdb_rating": 7.9
        })
    }

    #[test]
    fn test_parse_video() {
        let video = VideoRecommendation::from_value(&arrival()).unwrap();

        assert_eq!(video.media_type, MediaType::Movie);
        assert_eq!(video.release_year, 2016);
        assert_eq!(video.runtime, Some(116));
        assert_eq!(video.imdb_rating, Some(7.9));
        assert_eq!(video.directors, None);
    }

    #[test]
    fn test_type_must_be_movie_or_tv_show() {
        let mut value = arrival();
        value["type"] = json!("Documentary");

        let err = VideoRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "type");
        assert_eq!(err.expected, "one of \"Movie\", \"TV Show\"");
    }

    #[test]
    fn test_release_year_must_be_integer() {
        let mut value = arrival();
        value["release_year"] = json!("circa 2016");

        let err = VideoRecommendation::from_value(&value).unwrap_err();
        assert_eq!(err.field, "release_year");
    }

    #[test]
    fn test_schema_uses_wire_names() {
        let schema = output_schema::<VideoRecommendation>().unwrap();

        assert_eq!(schema["properties"]["type"]["enum"], json!(["Movie", "TV Show"]));
        assert!(schema["properties"].get("media_type").is_none());
        assert_eq!(
            schema["properties"]["runtime"]["description"],
            "The runtime in minutes"
        );
    }

    #[test]
    fn test_media_type_serializes_to_label() {
        let json = serde_json::to_string(&MediaType::TvShow).unwrap();
        assert_eq!(json, "\"TV Show\"");
    }
}
