mod extract;
mod handlers;
mod routes;
mod state;

pub use extract::ValidatedJson;
pub use routes::{
    create_router, BOOK_PROMPTS_ROUTE, CUSTOM_BOOKS_ROUTE, SIMILAR_BOOKS_ROUTE, VIDEOS_ROUTE,
};
pub use state::AppState;
