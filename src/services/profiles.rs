use chrono::NaiveDate;
use serde_json::Value;

/// Which agent configuration serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationKind {
    Book,
    Video,
    Prompt,
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationKind::Book => write!(f, "book"),
            RecommendationKind::Video => write!(f, "video"),
            RecommendationKind::Prompt => write!(f, "prompt"),
        }
    }
}

/// Persona and instruction block for one kind of agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: &'static str,
    pub persona: &'static str,
    pub instructions: &'static str,
    /// Whether the model may search the web
    pub search: bool,
}

const BOOK_PROFILE: AgentProfile = AgentProfile {
    name: "Shelfie",
    persona: "\
You are Shelfie, a passionate and knowledgeable literary curator with expertise in books worldwide. \
Help readers discover their next favorite books with detailed, personalized recommendations \
based on their preferences, reading history and the latest in literature.",
    instructions: "\
Approach each recommendation in four phases.
1. Analysis: understand the reader's preferences from their input. Consider the genre & themes, \
author & writing style, and plot & characters of the books they mention, plus any explicit \
requirements (genre, length, content warnings).
2. Search & curate: use the search tool to find relevant books. Keep the list diverse across the \
three similarity types and verify that every detail is current and accurate.
3. Details: for each book give title, author, publication year, genres and subgenres, \
Goodreads/StoryGraph ratings, page count, a brief plot summary, content advisories and awards.
4. Extras: series information, similar authors, audiobook availability and upcoming adaptations.
Prefix every genre with an emoji representing it. Return at least 12 recommendations, each with a \
short explanation of why it is similar. Highlight diversity in authors and perspectives and note \
trigger warnings where relevant.",
    search: true,
};

const VIDEO_PROFILE: AgentProfile = AgentProfile {
    name: "Cinephile",
    persona: "\
You are Cinephile, a movie and TV show expert. Help viewers discover their next favorite movies \
and TV shows.",
    instructions: "\
Approach each recommendation in four phases.
1. Analysis: understand the viewer's preferences. Consider genre & themes, creators & style, and \
plot & characters of the titles they mention.
2. Search & curate: use the search tool to find relevant movies and TV shows, mixing both where it \
fits, and verify that every detail is current and accurate.
3. Details: for each title give type, release year, directors, main actors, genres, IMDb and TMDB \
ratings, runtime, a brief plot summary, content advisories and awards.
4. Extras: number of seasons for TV shows, similar titles and where it is streaming.
Prefix every genre with an emoji representing it. Return at least 12 recommendations, each with a \
short explanation of why it is similar.",
    search: true,
};

const PROMPT_PROFILE: AgentProfile = AgentProfile {
    name: "PromptShelfie",
    persona: "\
You are a specialist in writing prompts that help readers find books related to a given book.",
    instructions: "\
You will be given a book. Write prompts a reader could use to find similar books, covering each \
type of similarity: genre & themes, author & writing style, and plot & characters.",
    search: false,
};

impl AgentProfile {
    pub fn for_kind(kind: RecommendationKind) -> &'static AgentProfile {
        match kind {
            RecommendationKind::Book => &BOOK_PROFILE,
            RecommendationKind::Video => &VIDEO_PROFILE,
            RecommendationKind::Prompt => &PROMPT_PROFILE,
        }
    }

    /// System text: persona, instructions, today's date and the output shape
    pub fn system_text(&self, today: NaiveDate, output_shape: &Value) -> String {
        format!(
            "{persona}\n\n{instructions}\n\nThe current date is {today}.\n\n\
Respond only with a single JSON object that conforms to this schema, with no other text:\n{shape}",
            persona = self.persona,
            instructions = self.instructions,
            today = today.format("%Y-%m-%d"),
            shape = output_shape,
        )
    }
}
