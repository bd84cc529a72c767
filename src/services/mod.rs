pub mod content_service;
pub mod index_service;
pub mod markdown_service;
pub mod path_resolver;
pub mod search_service;

pub use content_service::ContentService;
pub use markdown_service::{LinkContext, MarkdownService};
pub use search_service::SearchService;
