use crate::services::path_resolver::{category_url, leading_files};
use crate::types::{BlogItem, BlogLibrary, LoadedCategory};
use crate::utils::{escape_attr, escape_html, format_post_date};

/// Category cards with a few recent posts each
pub struct BlogGridComponent<'a> {
    library: &'a BlogLibrary,
}

impl<'a> BlogGridComponent<'a> {
    pub fn new(library: &'a BlogLibrary) -> Self {
        Self { library }
    }

    /// Cards for the first `max_categories` categories (all when `None`),
    /// each listing up to `posts_per_category` files
    pub fn render(&self, max_categories: Option<usize>, posts_per_category: usize) -> String {
        let categories = &self.library.categories;
        let shown = max_categories.map_or(categories.len(), |max| max.min(categories.len()));
        if shown == 0 {
            return "<p class=\"empty\">No categories yet.</p>".to_string();
        }

        let mut html = String::from("<div class=\"category-grid\">");
        for category in &categories[..shown] {
            html.push_str(&render_card(category, posts_per_category));
        }
        html.push_str("</div>");
        html
    }
}

fn render_card(category: &LoadedCategory, posts: usize) -> String {
    let info = &category.category;
    let href = category_url::<&str>(&info.id, &[]);
    let mut html = String::from("<section class=\"category-card\">");
    if let Some(image) = info.image.as_deref() {
        html.push_str(&format!(
            "<img class=\"category-image\" src=\"{}\" alt=\"{}\">",
            escape_attr(image),
            escape_attr(&info.title)
        ));
    }
    html.push_str(&format!(
        "<h2><a href=\"{}\">{}</a></h2>",
        escape_attr(&href),
        escape_html(&info.title)
    ));
    if !info.description.is_empty() {
        html.push_str(&format!("<p>{}</p>", escape_html(&info.description)));
    }

    let files = leading_files(&category.items, posts);
    if files.is_empty() {
        html.push_str("<p class=\"empty\">No content available</p>");
    } else {
        html.push_str("<ul class=\"post-list\">");
        for (segments, item) in files {
            html.push_str(&format!(
                "<li><a href=\"{}\">{}</a>",
                escape_attr(&category_url(&info.id, segments.as_slice())),
                escape_html(item.title())
            ));
            if let BlogItem::File(file) = item {
                if let Some(date) = file.date.as_deref() {
                    html.push_str(&format!(" <time>{}</time>", escape_html(&format_post_date(date))));
                }
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
    }
    html.push_str(&format!("<a class=\"more\" href=\"{}\">Read more →</a></section>", escape_attr(&href)));
    html
}
