use axum::{
    extract::{Path as AxumPath, Query, State},
    http::header,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde::Deserialize;

use crate::components::{
    ArticleComponent, BlogGridComponent, NavigationComponent, PortfolioComponent, TemplateComponent,
};
use crate::errors::FolioError;
use crate::services::path_resolver::{
    category_url, first_file, item_url_path, resolve, sibling_segment, Resolved,
};
use crate::services::search_service::highlight;
use crate::services::{LinkContext, MarkdownService};
use crate::types::{AppState, BlogCategory, BlogItem, LoadedCategory, SearchResult};
use crate::utils::{content_type_for, escape_attr, escape_html, resolve_under};

const MAX_QUERY_CHARS: usize = 1000;
const POSTS_PER_CATEGORY: usize = 3;

/// `?q=` and optional `?limit=` for the search endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

impl SearchParams {
    fn query(&self) -> String {
        if self.q.chars().count() > MAX_QUERY_CHARS {
            log::warn!("Very long search query received ({} chars), truncating", self.q.len());
            self.q.chars().take(MAX_QUERY_CHARS).collect()
        } else {
            self.q.clone()
        }
    }
}

/// Landing page
pub async fn handle_root(State(state): State<AppState>) -> Result<Html<String>, FolioError> {
    let portfolio = PortfolioComponent::new(&state.portfolio, &state.library);
    let templates = TemplateComponent::new(&state.config.static_dir);
    let page = templates.render_page(&portfolio.render(), portfolio.title())?;
    Ok(Html(page))
}

/// Grid of every category with its first posts
pub async fn handle_blogs(State(state): State<AppState>) -> Result<Html<String>, FolioError> {
    log::info!("Blog index requested");
    let grid = BlogGridComponent::new(&state.library).render(None, POSTS_PER_CATEGORY);
    let content = format!(
        "<section class=\"blogs\"><h1>Blogs</h1><p class=\"lead\">Notes and long-form writing, grouped by topic.</p>{}</section>",
        grid
    );
    let templates = TemplateComponent::new(&state.config.static_dir);
    Ok(Html(templates.render_page(&content, "Blogs")?))
}

/// HTML search page
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, FolioError> {
    let query = params.query();
    log::info!("Search request received for query: '{}'", query);

    let start_time = std::time::Instant::now();
    let results = state.search.search(&query, params.limit);
    let content = render_search_results(&state, &query, &results);

    let templates = TemplateComponent::new(&state.config.static_dir).with_query(&query);
    let page = templates.render_page(&content, "Search")?;
    log::info!("Search request completed in {}ms", start_time.elapsed().as_millis());
    Ok(Html(page))
}

/// `/blogs/:category` redirects to the first article of the category
pub async fn handle_category(
    State(state): State<AppState>,
    AxumPath(category_id): AxumPath<String>,
) -> Result<Response, FolioError> {
    let category = find_category(&state, &category_id)?;
    match first_file(&category.items) {
        Some(item) => Ok(redirect_to_item(category, item, false)),
        None => Ok(Html(render_empty_category(&state, category)?).into_response()),
    }
}

/// `/blogs/:category/*path`: render an article, or redirect to its canonical URL
pub async fn handle_article(
    State(state): State<AppState>,
    AxumPath((category_id, path)): AxumPath<(String, String)>,
) -> Result<Response, FolioError> {
    log::info!("Article request received: '{}/{}'", category_id, path);
    let category = find_category(&state, &category_id)?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match resolve(&category.items, segments.as_slice()) {
        Some(Resolved::Exact(item)) => {
            let page = render_item_page(&state, category, item)?;
            Ok(Html(page).into_response())
        }
        Some(Resolved::Approximate(item)) => {
            log::debug!("'{}' matched '{}' approximately", path, item.title());
            let canonical = item_url_path(&category.items, item).unwrap_or_default();
            if canonical == segments {
                // redirecting would point back at this same URL
                log::warn!("'{}' is canonical but did not resolve strictly, rendering it", path);
                let page = render_item_page(&state, category, item)?;
                return Ok(Html(page).into_response());
            }
            Ok(redirect_to_item(category, item, true))
        }
        None => match first_file(&category.items) {
            Some(item) => {
                log::warn!("No item for '{}' in '{}', falling back to first file", path, category_id);
                Ok(redirect_to_item(category, item, false))
            }
            None => Ok(Html(render_empty_category(&state, category)?).into_response()),
        },
    }
}

/// Category list as JSON
pub async fn api_categories(State(state): State<AppState>) -> Json<Vec<BlogCategory>> {
    Json(state.library.categories.iter().map(|c| c.category.clone()).collect())
}

/// One category with its resolved item tree
pub async fn api_category(
    State(state): State<AppState>,
    AxumPath(category_id): AxumPath<String>,
) -> Result<Json<LoadedCategory>, FolioError> {
    Ok(Json(find_category(&state, &category_id)?.clone()))
}

/// Ranked search records as JSON
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
    let query = params.query();
    log::debug!("API search for '{}' (limit {:?})", query, params.limit);
    Json(state.search.search(&query, params.limit))
}

/// Raw files from the content tree
pub async fn handle_content(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response, FolioError> {
    serve_file(&state.config.content_dir, &path)
}

/// Site assets
pub async fn handle_static(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response, FolioError> {
    serve_file(&state.config.static_dir, &path)
}

pub async fn handle_not_found() -> FolioError {
    FolioError::NotFound
}

fn serve_file(root: &std::path::Path, url: &str) -> Result<Response, FolioError> {
    let requested = resolve_under(root, url)?;
    if !requested.is_file() {
        log::warn!("Path not found: {:?}", requested);
        return Err(FolioError::NotFound);
    }
    let bytes = std::fs::read(&requested)?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&requested))], bytes).into_response())
}

fn find_category<'a>(state: &'a AppState, category_id: &str) -> Result<&'a LoadedCategory, FolioError> {
    state.library.category(category_id).ok_or_else(|| {
        log::warn!("Unknown category: '{}'", category_id);
        FolioError::CategoryNotFound(category_id.to_string())
    })
}

fn item_href(category: &LoadedCategory, item: &BlogItem) -> String {
    let segments = item_url_path(&category.items, item).unwrap_or_default();
    category_url(&category.category.id, segments.as_slice())
}

/// 308 for approximate matches, 307 for first-file fallbacks
fn redirect_to_item(category: &LoadedCategory, item: &BlogItem, permanent: bool) -> Response {
    let href = item_href(category, item);
    log::debug!("Redirecting to {}", href);
    if permanent {
        Redirect::permanent(&href).into_response()
    } else {
        Redirect::temporary(&href).into_response()
    }
}

/// Markdown source of a node: inline content, then its document, then nothing
fn item_source(state: &AppState, item: &BlogItem) -> Option<(String, Option<String>)> {
    let (inline, url) = match item {
        BlogItem::File(file) => (file.content.as_deref(), Some(file.path.as_str())),
        BlogItem::Directory(dir) => (None, dir.index_url.as_deref()),
    };
    let url = url.filter(|u| !u.is_empty());
    if let Some(inline) = inline {
        return Some((inline.to_string(), url.map(str::to_string)));
    }
    let url = url?;
    match state.content.read_document(url) {
        Ok(body) => Some((body.to_string(), Some(url.to_string()))),
        Err(e) => {
            log::warn!("Could not read '{}': {}", url, e);
            Some((String::new(), Some(url.to_string())))
        }
    }
}

fn render_item_page(state: &AppState, category: &LoadedCategory, item: &BlogItem) -> Result<String, FolioError> {
    let article = ArticleComponent::new();
    let navigation = NavigationComponent::new(&state.library);
    let templates = TemplateComponent::new(&state.config.static_dir);

    let (body, toc) = match item_source(state, item) {
        Some((raw, source_url)) => {
            let links = LinkContext {
                category_id: &category.category.id,
                current_file: source_url.as_deref(),
            };
            let result = MarkdownService::new().render(&raw, Some(links))?;
            (article.render(item, &result.html), result.toc)
        }
        None if item.is_file() => {
            let result = MarkdownService::new().render("", None)?;
            (article.render(item, &result.html), result.toc)
        }
        None => {
            let base = item_url_path(&category.items, item).unwrap_or_default();
            let siblings = item.children();
            let children: Vec<(String, &BlogItem)> = siblings
                .iter()
                .enumerate()
                .map(|(index, child)| {
                    let mut segments = base.clone();
                    segments.push(sibling_segment(siblings, index));
                    (category_url(&category.category.id, segments.as_slice()), child)
                })
                .collect();
            (article.render_listing(item, &children), String::new())
        }
    };

    let sidebar = navigation.build_sidebar(category, Some(item), &toc);
    let title = format!("{} | {}", item.title(), category.category.title);
    templates.render_page_with_nav(&sidebar, &body, &title)
}

fn render_empty_category(state: &AppState, category: &LoadedCategory) -> Result<String, FolioError> {
    let navigation = NavigationComponent::new(&state.library);
    let templates = TemplateComponent::new(&state.config.static_dir);
    let sidebar = navigation.build_sidebar(category, None, "");
    let content = format!(
        "<article class=\"article\"><h1>{}</h1><p class=\"empty\">No content available</p></article>",
        escape_html(&category.category.title)
    );
    templates.render_page_with_nav(&sidebar, &content, &category.category.title)
}

/// Render search results HTML
fn render_search_results(state: &AppState, query: &str, results: &[SearchResult]) -> String {
    let mut content = String::from("<div class=\"search-results\">");

    if query.trim().is_empty() {
        content.push_str("<p class=\"no-query\">Enter a search query to find articles.</p></div>");
        return content;
    }

    content.push_str(&format!(
        "<h2 class=\"search-header\">Search Results for \"{}\"</h2>",
        escape_html(query)
    ));
    content.push_str(&format!(
        "<p class=\"results-count\">Found {} result{}</p>",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    ));

    if results.is_empty() {
        content.push_str("<p class=\"no-results\">No results found for your search.</p>");
        content.push_str("<div class=\"search-tips\"><h3>Search Tips:</h3><ul>");
        content.push_str("<li>Try using different keywords</li>");
        content.push_str("<li>Search by tag, author or reference title</li>");
        content.push_str("<li>Browse the <a href=\"/blogs\">blog index</a></li>");
        content.push_str("</ul></div></div>");
        return content;
    }

    content.push_str("<div class=\"search-results-list\">");
    for result in results {
        let href = match state.library.category(&result.category_id) {
            Some(category) => item_href(category, &result.item),
            None => category_url::<&str>(&result.category_id, &[]),
        };
        content.push_str("<div class=\"search-result-item\">");
        content.push_str(&format!(
            "<h3 class=\"result-title\"><a href=\"{}\">{}</a></h3>",
            escape_attr(&href),
            highlight(result.item.title(), query)
        ));
        content.push_str(&format!(
            "<p class=\"result-path\">{} / {}</p>",
            escape_html(&result.category_title),
            escape_html(&result.path.join(" / "))
        ));
        if let Some(description) = result.item.description() {
            content.push_str(&format!(
                "<p class=\"result-excerpt\">{}</p>",
                highlight(description, query)
            ));
        }
        if let BlogItem::File(file) = &result.item {
            if !file.tags.is_empty() {
                content.push_str("<ul class=\"tags\">");
                for tag in &file.tags {
                    content.push_str(&format!("<li class=\"tag\">{}</li>", highlight(tag, query)));
                }
                content.push_str("</ul>");
            }
        }
        content.push_str(&format!(
            "<div class=\"result-meta\">Relevance: {}</div></div>",
            result.relevance_score
        ));
    }
    content.push_str("</div></div>");
    content
}
