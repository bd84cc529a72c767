use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::FolioError;
use crate::types::TemplateContext;
use crate::utils::escape_html;

const STYLE: &str = "<link rel=\"stylesheet\" href=\"/static/css/folio.css\">";

/// Site-wide navigation bar links
const NAV_LINKS: &[(&str, &str)] = &[
    ("Home", "/#hero"),
    ("About", "/#about"),
    ("Experience", "/#experience"),
    ("Projects", "/#projects"),
    ("Blogs", "/blogs"),
    ("Contact", "/#contact"),
];

/// Component for handling HTML page rendering
pub struct TemplateComponent {
    static_dir: PathBuf,
    query: String,
}

impl TemplateComponent {
    /// Create a template component that looks for `html/base.html` under `static_dir`
    pub fn new(static_dir: &Path) -> Self {
        Self { static_dir: static_dir.to_path_buf(), query: String::new() }
    }

    /// Prefill the navbar search box
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    /// Top navigation bar with the blog search box
    pub fn navbar(&self, query: &str) -> String {
        let mut html = String::from("<header class=\"navbar\"><a class=\"brand\" href=\"/\">Portfolio</a><nav><ul>");
        for (label, href) in NAV_LINKS {
            html.push_str(&format!("<li><a href=\"{}\">{}</a></li>", href, label));
        }
        html.push_str("</ul></nav>");
        html.push_str(&format!(
            "<form class=\"search-form\" action=\"/blogs/search\" method=\"get\"><input type=\"search\" name=\"q\" placeholder=\"Search articles...\" value=\"{}\"></form>",
            escape_html(query)
        ));
        html.push_str("</header>");
        html
    }

    /// Load and render the main HTML shell template
    pub fn render_shell(&self, context: &TemplateContext) -> Result<String, FolioError> {
        let navbar = self.navbar(&self.query);
        let base_path = self.static_dir.join("html").join("base.html");

        match fs::read_to_string(&base_path) {
            Ok(base) => {
                if !base.contains("{{CONTENT}}") {
                    return Err(FolioError::TemplateError(format!(
                        "{} has no {{{{CONTENT}}}} placeholder",
                        base_path.display()
                    )));
                }
                Ok(base
                    .replace("{{TITLE}}", &escape_html(&context.title))
                    .replace("{{STYLE}}", STYLE)
                    .replace("{{NAVBAR}}", &navbar)
                    .replace("{{SIDEBAR}}", &context.sidebar)
                    .replace("{{CONTENT}}", &context.content))
            }
            Err(_) => {
                debug!("No base template at {:?}, using inline shell", base_path);
                let layout_class = if context.sidebar.is_empty() { "layout single" } else { "layout" };
                let sidebar = if context.sidebar.is_empty() {
                    String::new()
                } else {
                    format!("<aside class=\"sidebar\">{}</aside>", context.sidebar)
                };
                Ok(format!(
                    "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{}</title>{}</head><body><a id=\"top\"></a>{}<div class=\"{}\">{}<main class=\"content\">{}</main></div><a class=\"back-to-top\" href=\"#top\" aria-label=\"Back to top\">↑</a><script type=\"module\">import mermaid from 'https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs'; mermaid.initialize({{ startOnLoad: true }});</script></body></html>",
                    escape_html(&context.title),
                    STYLE,
                    navbar,
                    layout_class,
                    sidebar,
                    context.content
                ))
            }
        }
    }

    /// Render a full page with a sidebar
    pub fn render_page_with_nav(&self, sidebar: &str, content: &str, title: &str) -> Result<String, FolioError> {
        self.render_shell(&TemplateContext {
            title: title.to_string(),
            content: content.to_string(),
            sidebar: sidebar.to_string(),
        })
    }

    /// Render a full page without a sidebar
    pub fn render_page(&self, content: &str, title: &str) -> Result<String, FolioError> {
        self.render_page_with_nav("", content, title)
    }
}
