//! Folio - a portfolio and blog site served with axum
//!
//! The content tree (`blogs.json`, nested indexes, markdown and `portfolio.json`)
//! is loaded once at startup, rendered to HTML on the server and exposed as JSON.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

use axum::{routing::get, Router};

// Re-export commonly used items
pub use config::Config;
pub use errors::FolioError;
pub use logger::Logger;
pub use types::{AppState, BlogItem, BlogLibrary, MarkdownResult, SearchResult, TemplateContext};
pub use services::{ContentService, MarkdownService, SearchService};
pub use components::{ArticleComponent, NavigationComponent, TemplateComponent};

/// Build the site router over a loaded [`AppState`]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/blogs", get(handlers::handle_blogs))
        .route("/blogs/search", get(handlers::handle_search))
        .route("/blogs/:category", get(handlers::handle_category))
        .route("/blogs/:category/*path", get(handlers::handle_article))
        .route("/api/categories", get(handlers::api_categories))
        .route("/api/categories/:category", get(handlers::api_category))
        .route("/api/search", get(handlers::api_search))
        .route("/content/*path", get(handlers::handle_content))
        .route("/static/*path", get(handlers::handle_static))
        .fallback(handlers::handle_not_found)
        .with_state(state)
}
