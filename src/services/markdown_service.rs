use std::collections::HashMap;

use log::debug;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::errors::FolioError;
use crate::services::path_resolver::rewrite_markdown_link;
use crate::types::MarkdownResult;
use crate::utils::{escape_attr, escape_html};

const MISSING_CONTENT: &str = "# Content not found\n\nThe requested content could not be loaded.";

/// Where the rendered article lives, used to rewrite relative `.md` links
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'a> {
    pub category_id: &'a str,
    /// Content path of the article, e.g. `/blogs/oops/01-basics/intro.md`
    pub current_file: Option<&'a str>,
}

struct Heading {
    level: u32,
    id: String,
    text: String,
}

/// Service for rendering article markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownService;

impl MarkdownService {
    /// Create a new markdown service
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options
    }

    /// Render markdown with heading anchors, a table of contents and rewritten site links
    pub fn render(&self, raw: &str, links: Option<LinkContext<'_>>) -> Result<MarkdownResult, FolioError> {
        let (front_title, content) = split_front_matter(raw);
        let content = if content.trim().is_empty() { MISSING_CONTENT } else { content };

        let headings = collect_headings(content);
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut heading_idx = 0usize;
        let mut in_mermaid = false;

        for ev in Parser::new_ext(content, Self::options()) {
            let mapped = match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let lvl = heading_level_to_u32(level);
                    let id = headings.get(heading_idx).map(|h| h.id.as_str()).unwrap_or("");
                    heading_idx += 1;
                    Event::Html(CowStr::from(format!("<h{} id=\"{}\">", lvl, escape_attr(id))))
                }
                Event::End(TagEnd::Heading(level)) => {
                    let id = headings
                        .get(heading_idx.saturating_sub(1))
                        .map(|h| h.id.as_str())
                        .unwrap_or("");
                    Event::Html(CowStr::from(format!(
                        "<a class=\"hlink\" href=\"#{}\" aria-label=\"Link to this section\">#</a></h{}>\n",
                        escape_attr(id),
                        heading_level_to_u32(level)
                    )))
                }
                Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                    let dest_url = match links
                        .and_then(|ctx| rewrite_markdown_link(&dest_url, ctx.category_id, ctx.current_file))
                    {
                        Some(rewritten) => {
                            debug!("Rewrote link '{}' to '{}'", dest_url, rewritten);
                            CowStr::from(rewritten)
                        }
                        None => dest_url,
                    };
                    Event::Start(Tag::Link { link_type, dest_url, title, id })
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang))) if &**lang == "mermaid" => {
                    in_mermaid = true;
                    Event::Html(CowStr::Borrowed("<pre class=\"mermaid\">"))
                }
                Event::Text(text) if in_mermaid => Event::Html(CowStr::from(escape_html(&text))),
                Event::End(TagEnd::CodeBlock) if in_mermaid => {
                    in_mermaid = false;
                    Event::Html(CowStr::Borrowed("</pre>\n"))
                }
                other => other,
            };
            events.push(mapped);
        }

        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        let toc = build_toc_html(&headings);
        let title = front_title.or_else(|| first_heading_text(&headings));
        Ok(MarkdownResult { html: out, toc, title })
    }
}

fn collect_headings(content: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<u32> = None;
    let mut buf = String::new();
    let mut id_counts: HashMap<String, usize> = HashMap::new();

    for ev in Parser::new_ext(content, MarkdownService::options()) {
        match ev {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(heading_level_to_u32(level));
                buf.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = current.take() {
                    let mut id = heading_id(&buf);
                    if id.is_empty() {
                        id = format!("h{}", level);
                    }
                    let count = id_counts.entry(id.clone()).or_insert(0);
                    if *count > 0 {
                        id = format!("{}-{}", id, *count);
                    }
                    *count += 1;
                    headings.push(Heading { level, id, text: buf.trim().to_string() });
                }
                buf.clear();
            }
            Event::Text(t) | Event::Code(t) => {
                if current.is_some() {
                    buf.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if current.is_some() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    headings
}

/// Anchor id for a heading: lowercase, word characters and dashes kept, whitespace runs become `-`
pub fn heading_id(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            if pending_dash {
                out.push('-');
                pending_dash = false;
            }
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Build HTML for the Table of Contents
fn build_toc_html(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let mut html = String::new();
    html.push_str("<nav class=\"toc\"><div class=\"toc-title\">Contents</div>");
    // levels of the lists still open; a nested list sits inside its parent's <li>
    let mut open: Vec<u32> = Vec::new();
    for heading in headings {
        match open.last() {
            Some(&top) if heading.level <= top => {
                html.push_str("</li>");
                while open.len() > 1 && heading.level <= open[open.len() - 2] {
                    html.push_str("</ul></li>");
                    open.pop();
                }
                if let Some(top) = open.last_mut() {
                    *top = (*top).min(heading.level);
                }
            }
            _ => {
                html.push_str("<ul>");
                open.push(heading.level);
            }
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_attr(&heading.id),
            escape_html(&heading.text)
        ));
    }
    html.push_str("</li>");
    while open.pop().is_some() {
        html.push_str("</ul>");
        if !open.is_empty() {
            html.push_str("</li>");
        }
    }
    html.push_str("</nav>");
    html
}

fn heading_level_to_u32(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Split a leading `---` front matter block off, returning its `title` and the body
fn split_front_matter(raw: &str) -> (Option<String>, &str) {
    let Some(rest) = raw.strip_prefix("---\n").or_else(|| raw.strip_prefix("---\r\n")) else {
        return (None, raw);
    };

    let mut title = None;
    let mut offset = 0usize;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim() == "---" {
            return (title, &rest[offset..]);
        }
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("title") {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if !value.is_empty() {
                    title = Some(value.to_string());
                }
            }
        }
    }
    // Unterminated block: treat everything as body
    (None, raw)
}

fn first_heading_text(headings: &[Heading]) -> Option<String> {
    headings
        .iter()
        .find(|h| h.level == 1 && !h.text.is_empty())
        .map(|h| h.text.clone())
}
