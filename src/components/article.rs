use crate::types::{BlogItem, Reference};
use crate::utils::{escape_attr, escape_html, format_post_date};

/// Renders the article view: header, body and directory listings
pub struct ArticleComponent;

impl ArticleComponent {
    pub fn new() -> Self {
        Self
    }

    /// Title, author, description, date, tags and references of a node
    pub fn render_header(&self, item: &BlogItem) -> String {
        let mut html = String::from("<header class=\"article-header\">");
        html.push_str(&format!("<h1 class=\"article-title\">{}</h1>", escape_html(item.title())));

        if let Some(author) = item.author() {
            html.push_str(&format!("<p class=\"meta author\">By {}</p>", escape_html(author)));
        }
        if let BlogItem::File(file) = item {
            if let Some(date) = file.date.as_deref() {
                html.push_str(&format!(
                    "<p class=\"meta date\"><time datetime=\"{}\">{}</time></p>",
                    escape_attr(date),
                    escape_html(&format_post_date(date))
                ));
            }
        }
        if let Some(description) = item.description() {
            html.push_str(&format!("<p class=\"lead\">{}</p>", escape_html(description)));
        }
        if let BlogItem::File(file) = item {
            if !file.tags.is_empty() {
                html.push_str("<ul class=\"tags\">");
                for tag in &file.tags {
                    html.push_str(&format!("<li class=\"tag\">{}</li>", escape_html(tag)));
                }
                html.push_str("</ul>");
            }
        }
        if !item.references().is_empty() {
            html.push_str(&render_references(item.references()));
        }
        html.push_str("<hr></header>");
        html
    }

    /// Full article: header followed by the rendered markdown
    pub fn render(&self, item: &BlogItem, body_html: &str) -> String {
        format!(
            "<article class=\"article\">{}<div class=\"prose\">{}</div></article>",
            self.render_header(item),
            body_html
        )
    }

    /// Directory without its own document: header plus a card per child
    pub fn render_listing(&self, item: &BlogItem, children: &[(String, &BlogItem)]) -> String {
        let mut html = format!("<article class=\"article\">{}", self.render_header(item));
        if children.is_empty() {
            html.push_str("<p class=\"empty\">No content available</p>");
        } else {
            html.push_str("<ul class=\"listing\">");
            for (href, child) in children {
                let kind = if child.is_file() { "file" } else { "dir" };
                html.push_str(&format!(
                    "<li class=\"{}\"><a href=\"{}\">{}</a>",
                    kind,
                    escape_attr(href),
                    escape_html(child.title())
                ));
                if let Some(description) = child.description() {
                    html.push_str(&format!("<p>{}</p>", escape_html(description)));
                }
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
        html.push_str("</article>");
        html
    }
}

impl Default for ArticleComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn render_references(references: &[Reference]) -> String {
    let mut html = String::from("<section class=\"references\"><h3>References</h3><ul>");
    for reference in references {
        html.push_str(&format!("<li><strong>{}</strong>", escape_html(&reference.title)));
        let authors = reference.all_authors();
        if !authors.is_empty() {
            html.push_str(&format!(" by {}", escape_html(&authors.join(", "))));
        }
        if let Some(publisher) = reference.publisher.as_deref() {
            html.push_str(&format!(" ({})", escape_html(publisher)));
        }
        if let Some(link) = reference.link.as_deref() {
            html.push_str(&format!(
                " <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">[Link]</a>",
                escape_attr(link)
            ));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul></section>");
    html
}
