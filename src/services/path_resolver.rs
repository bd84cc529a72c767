//! Conversion between category trees and `/blogs/<category>/<segment>/...` URLs.
//!
//! Segments are dash-separated, lowercase and stripped of leading numbering, so
//! `01-Getting Started.md` and the title `Getting Started` both become
//! `getting-started`. Lookups accept every spelling the site has used for a node:
//! its id, raw title, slugged title, punctuation-free title or file name.

use crate::types::BlogItem;

/// Outcome of a URL lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// Every segment matched a node on the way down
    Exact(&'a BlogItem),
    /// Best effort match; callers should redirect to the canonical URL
    Approximate(&'a BlogItem),
}

impl<'a> Resolved<'a> {
    pub fn item(&self) -> &'a BlogItem {
        match self {
            Resolved::Exact(item) | Resolved::Approximate(item) => item,
        }
    }
}

/// Drop a leading `01-`, `2.` or `3_` style prefix
fn strip_numbering(text: &str) -> &str {
    let trimmed = text.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return trimmed;
    }
    let rest = &trimmed[digits..];
    let after_sep = rest.trim_start_matches(['-', '.', '_', ' ']);
    if after_sep.len() == rest.len() || after_sep.is_empty() {
        // "3D Graphics" or a bare number keep their digits
        return trimmed;
    }
    after_sep
}

/// Lowercase, numbering-stripped, dash-separated form of `text`
pub fn url_slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in strip_numbering(text).chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }
    out
}

/// Slug of a markdown file name: last path component, `.md` dropped, then `url_slug`
pub fn file_slug(path_or_name: &str) -> String {
    let name = path_or_name.rsplit('/').next().unwrap_or(path_or_name);
    let stem = name.strip_suffix(".md").unwrap_or(name);
    url_slug(stem)
}

/// URL segment for a single node
pub fn item_segment(item: &BlogItem) -> String {
    let slug = url_slug(item.title());
    if slug.is_empty() { url_slug(item.id()) } else { slug }
}

/// Canonical segment of `siblings[index]`. A node whose slug repeats an earlier
/// sibling's gets its id appended so both stay addressable.
pub fn sibling_segment(siblings: &[BlogItem], index: usize) -> String {
    let Some(item) = siblings.get(index) else {
        return String::new();
    };
    let base = item_segment(item);
    if !siblings[..index].iter().any(|earlier| item_segment(earlier) == base) {
        return base;
    }
    let id = url_slug(item.id());
    if id.is_empty() || id == base {
        format!("{}-{}", base, index + 1)
    } else {
        format!("{}-{}", base, id)
    }
}

/// Lowercase, punctuation removed, whitespace collapsed
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lowercase with whitespace and dashes removed
fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn segment_matches(item: &BlogItem, segment: &str) -> bool {
    if item.id() == segment {
        return true;
    }
    let title = item.title();
    if !title.is_empty() && title.eq_ignore_ascii_case(segment) {
        return true;
    }
    let title_slug = url_slug(title);
    if !title_slug.is_empty()
        && (title_slug == segment.to_ascii_lowercase() || title_slug == url_slug(segment))
    {
        return true;
    }
    let bare = strip_punctuation(title);
    if !bare.is_empty() && bare == strip_punctuation(segment) {
        return true;
    }
    if let BlogItem::File(file) = item {
        let slug = file_slug(&file.path);
        if !slug.is_empty() && slug == url_slug(segment) {
            return true;
        }
    }
    false
}

/// Walk `segments` down the tree. Siblings whose canonical segment equals the
/// segment are tried first, then every other spelling; a dead end backtracks
/// to the next matching sibling.
pub fn find_item_by_path<'a, S: AsRef<str>>(items: &'a [BlogItem], segments: &[S]) -> Option<&'a BlogItem> {
    let (first, rest) = segments.split_first()?;
    let first = first.as_ref();
    let canonical: Vec<bool> = (0..items.len())
        .map(|index| sibling_segment(items, index).eq_ignore_ascii_case(first))
        .collect();

    let by_canonical = items.iter().zip(&canonical).filter(|(_, hit)| **hit);
    let by_spelling = items
        .iter()
        .zip(&canonical)
        .filter(|(item, hit)| !**hit && segment_matches(item, first));
    by_canonical
        .chain(by_spelling)
        .find_map(|(item, _)| descend(item, rest))
}

fn descend<'a, S: AsRef<str>>(item: &'a BlogItem, rest: &[S]) -> Option<&'a BlogItem> {
    if rest.is_empty() {
        return Some(item);
    }
    match item {
        BlogItem::Directory(dir) => find_item_by_path(&dir.children, rest),
        BlogItem::File(_) => None,
    }
}

/// First node in pre-order whose squashed title contains the squashed `needle`
fn find_by_title<'a>(items: &'a [BlogItem], needle: &str) -> Option<&'a BlogItem> {
    for item in items {
        if squash(item.title()).contains(needle) {
            return Some(item);
        }
        if let Some(found) = find_by_title(item.children(), needle) {
            return Some(found);
        }
    }
    None
}

/// First file in pre-order
pub fn first_file(items: &[BlogItem]) -> Option<&BlogItem> {
    for item in items {
        match item {
            BlogItem::File(_) => return Some(item),
            BlogItem::Directory(dir) => {
                if let Some(found) = first_file(&dir.children) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Up to `limit` files in pre-order, each with its URL segments
pub fn leading_files(items: &[BlogItem], limit: usize) -> Vec<(Vec<String>, &BlogItem)> {
    fn walk<'a>(
        items: &'a [BlogItem],
        prefix: &mut Vec<String>,
        limit: usize,
        out: &mut Vec<(Vec<String>, &'a BlogItem)>,
    ) {
        for (index, item) in items.iter().enumerate() {
            if out.len() >= limit {
                return;
            }
            prefix.push(sibling_segment(items, index));
            match item {
                BlogItem::File(_) => out.push((prefix.clone(), item)),
                BlogItem::Directory(dir) => walk(&dir.children, prefix, limit, out),
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(items, &mut Vec::new(), limit, &mut out);
    out
}

/// Resolve URL segments: strict walk first, then a fuzzy title match on the last segment.
/// No segments resolve to the first file.
pub fn resolve<'a, S: AsRef<str>>(items: &'a [BlogItem], segments: &[S]) -> Option<Resolved<'a>> {
    let Some(last) = segments.last() else {
        return first_file(items).map(Resolved::Approximate);
    };
    if let Some(item) = find_item_by_path(items, segments) {
        return Some(Resolved::Exact(item));
    }
    let needle = squash(last.as_ref());
    if needle.is_empty() {
        return None;
    }
    find_by_title(items, &needle).map(Resolved::Approximate)
}

fn find_chain<F>(items: &[BlogItem], is_target: &F, chain: &mut Vec<String>) -> bool
where
    F: Fn(&BlogItem) -> bool,
{
    for (index, item) in items.iter().enumerate() {
        chain.push(sibling_segment(items, index));
        if is_target(item) || find_chain(item.children(), is_target, chain) {
            return true;
        }
        chain.pop();
    }
    false
}

/// Segments of `target` and its parent directories, or `None` if it is not in the tree
pub fn item_url_path(items: &[BlogItem], target: &BlogItem) -> Option<Vec<String>> {
    let mut chain = Vec::new();
    find_chain(items, &|item| item == target, &mut chain).then_some(chain)
}

/// Like [`item_url_path`] but looks the node up by id
pub fn item_url_path_by_id(items: &[BlogItem], id: &str) -> Option<Vec<String>> {
    let mut chain = Vec::new();
    find_chain(items, &|item| item.id() == id, &mut chain).then_some(chain)
}

/// `/blogs/<category>` or `/blogs/<category>/<segments>`
pub fn category_url<S: AsRef<str>>(category_id: &str, segments: &[S]) -> String {
    let mut url = format!("/blogs/{}", category_id);
    for segment in segments {
        url.push('/');
        url.push_str(segment.as_ref());
    }
    url
}

fn is_external(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("//") || lower.starts_with("mailto:") || lower.contains("://")
}

/// Directory part of a content path after `blogs/<category>/`, numbering stripped
fn file_directory_segments(file_path: &str) -> Vec<String> {
    let parts: Vec<&str> = file_path.split('/').filter(|p| !p.is_empty()).collect();
    match parts.iter().position(|p| *p == "blogs") {
        Some(idx) if idx + 2 < parts.len() => parts[idx + 2..parts.len() - 1]
            .iter()
            .map(|p| url_slug(p))
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Rewrite a relative `.md` link found in an article into a site URL.
/// `current_file` is the content path of the article being rendered.
/// Returns `None` for links that should be left untouched.
pub fn rewrite_markdown_link(href: &str, category_id: &str, current_file: Option<&str>) -> Option<String> {
    if is_external(href) {
        return None;
    }
    let (target, fragment) = match href.split_once('#') {
        Some((target, fragment)) => (target, Some(fragment)),
        None => (href, None),
    };
    if !target.ends_with(".md") {
        return None;
    }

    let parts: Vec<&str> = target.split('/').filter(|p| !p.is_empty()).collect();
    let (file_name, dirs) = parts.split_last()?;
    let explicit_dirs: Vec<String> = dirs
        .iter()
        .filter(|p| **p != ".." && **p != ".")
        .map(|p| url_slug(p))
        .filter(|s| !s.is_empty())
        .collect();

    let mut segments = if target.starts_with("../") {
        explicit_dirs
    } else {
        let mut base = current_file.map(file_directory_segments).unwrap_or_default();
        base.extend(explicit_dirs);
        base
    };
    let slug = file_slug(file_name);
    if !slug.is_empty() {
        segments.push(slug);
    }

    let mut url = category_url(category_id, segments.as_slice());
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        url.push('#');
        url.push_str(fragment);
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlogDirectory, BlogFile};

    fn file(id: &str, title: &str, path: &str) -> BlogItem {
        BlogItem::File(BlogFile {
            id: id.into(),
            path: path.into(),
            title: title.into(),
            description: None,
            date: None,
            tags: vec![],
            author: None,
            references: vec![],
            content: None,
        })
    }

    fn dir(id: &str, title: &str, children: Vec<BlogItem>) -> BlogItem {
        BlogItem::Directory(BlogDirectory {
            id: id.into(),
            title: title.into(),
            description: None,
            author: None,
            children,
            references: vec![],
            index_url: None,
        })
    }

    fn tree() -> Vec<BlogItem> {
        vec![
            dir("dir-1", "01. Creational Patterns", vec![
                file("f-1", "Singleton (Lazy & Eager)", "/blogs/design-patterns/01-creational/01-singleton.md"),
                file("f-2", "Abstract Factory", "/blogs/design-patterns/01-creational/02-abstract-factory.md"),
            ]),
            dir("dir-2", "Behavioral", vec![
                dir("dir-3", "Event Driven", vec![
                    file("f-3", "Observer", "/blogs/design-patterns/behavioral/events/observer.md"),
                ]),
            ]),
            file("f-4", "Wrap Up", "/blogs/design-patterns/99-wrap-up.md"),
        ]
    }

    #[test]
    fn slugs_strip_numbering_and_punctuation() {
        assert_eq!(url_slug("01. Creational Patterns"), "creational-patterns");
        assert_eq!(url_slug("Singleton (Lazy & Eager)"), "singleton-lazy-eager");
        assert_eq!(url_slug("  Hello -- World  "), "hello-world");
        assert_eq!(url_slug("3D Graphics"), "3d-graphics");
        assert_eq!(url_slug("2024"), "2024");
        assert_eq!(file_slug("/blogs/x/02-abstract-factory.md"), "abstract-factory");
        assert_eq!(file_slug("03_Notes.md"), "notes");
    }

    #[test]
    fn builds_canonical_paths() {
        let items = tree();
        let observer = &items[1].children()[0].children()[0];
        assert_eq!(
            item_url_path(&items, observer).unwrap(),
            vec!["behavioral", "event-driven", "observer"]
        );
        assert_eq!(
            item_url_path_by_id(&items, "f-1").unwrap(),
            vec!["creational-patterns", "singleton-lazy-eager"]
        );
        assert!(item_url_path_by_id(&items, "nope").is_none());
        assert_eq!(category_url("design-patterns", &["wrap-up"]), "/blogs/design-patterns/wrap-up");
    }

    #[test]
    fn canonical_paths_resolve_exactly() {
        let items = tree();
        for id in ["dir-1", "f-1", "f-2", "dir-3", "f-3", "f-4"] {
            let segments = item_url_path_by_id(&items, id).unwrap();
            match resolve(&items, segments.as_slice()) {
                Some(Resolved::Exact(item)) => assert_eq!(item.id(), id),
                other => panic!("{} resolved to {:?}", id, other),
            }
        }
    }

    #[test]
    fn accepts_alternate_spellings() {
        let items = tree();
        let by_id = find_item_by_path(&items, &["dir-1", "f-2"]).unwrap();
        assert_eq!(by_id.id(), "f-2");
        let by_title = find_item_by_path(&items, &["Behavioral", "event driven", "OBSERVER"]).unwrap();
        assert_eq!(by_title.id(), "f-3");
        let by_file_name = find_item_by_path(&items, &["creational-patterns", "01-singleton"]).unwrap();
        assert_eq!(by_file_name.id(), "f-1");
        let by_bare_title = find_item_by_path(&items, &["01 Creational Patterns"]).unwrap();
        assert_eq!(by_bare_title.id(), "dir-1");
    }

    #[test]
    fn leading_files_walk_in_pre_order() {
        let items = tree();
        let found = leading_files(&items, 3);
        let ids: Vec<&str> = found.iter().map(|(_, item)| item.id()).collect();
        assert_eq!(ids, vec!["f-1", "f-2", "f-3"]);
        assert_eq!(found[2].0, vec!["behavioral", "event-driven", "observer"]);
        assert_eq!(leading_files(&items, 10).len(), 4);
        assert!(leading_files(&items, 0).is_empty());
    }

    #[test]
    fn files_end_the_path() {
        let items = tree();
        assert!(find_item_by_path(&items, &["wrap-up", "more"]).is_none());
        assert!(find_item_by_path::<&str>(&items, &[]).is_none());
    }

    #[test]
    fn falls_back_to_fuzzy_title_then_first_file() {
        let items = tree();
        match resolve(&items, &["unknown", "abstract-factory"]) {
            Some(Resolved::Approximate(item)) => assert_eq!(item.id(), "f-2"),
            other => panic!("unexpected {:?}", other),
        }
        match resolve::<&str>(&items, &[]) {
            Some(Resolved::Approximate(item)) => assert_eq!(item.id(), "f-1"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(resolve(&items, &["zzz"]).is_none());
        assert!(first_file(&[dir("empty", "Empty", vec![])]).is_none());
    }

    #[test]
    fn rewrites_relative_markdown_links() {
        let current = Some("/blogs/design-patterns/01-creational/01-singleton.md");
        assert_eq!(
            rewrite_markdown_link("02-abstract-factory.md", "design-patterns", current).unwrap(),
            "/blogs/design-patterns/creational/abstract-factory"
        );
        assert_eq!(
            rewrite_markdown_link("./02-abstract-factory.md#usage", "design-patterns", current).unwrap(),
            "/blogs/design-patterns/creational/abstract-factory#usage"
        );
        assert_eq!(
            rewrite_markdown_link("../02-Structural Patterns/01-adapter.md", "design-patterns", current).unwrap(),
            "/blogs/design-patterns/structural-patterns/adapter"
        );
        assert_eq!(
            rewrite_markdown_link("../99-wrap-up.md", "design-patterns", current).unwrap(),
            "/blogs/design-patterns/wrap-up"
        );
        assert_eq!(
            rewrite_markdown_link("intro.md", "oops", None).unwrap(),
            "/blogs/oops/intro"
        );
        assert_eq!(
            rewrite_markdown_link("../02-behavioral/03-events/01-observer.md#notify", "design-patterns", current)
                .unwrap(),
            "/blogs/design-patterns/behavioral/events/observer#notify"
        );
        assert_eq!(
            rewrite_markdown_link("sub/dir/page.md", "oops", Some("/blogs/oops/01-basics/intro.md")).unwrap(),
            "/blogs/oops/basics/sub/dir/page"
        );
    }

    #[test]
    fn untitled_nodes_fall_back_to_id() {
        let items = vec![
            file("misc-notes", "???", "/blogs/x/misc.md"),
            dir("02-Archive", "", vec![file("old", "Old Post", "/blogs/x/old.md")]),
        ];
        assert_eq!(item_segment(&items[0]), "misc-notes");
        assert_eq!(item_segment(&items[1]), "archive");
        assert_eq!(item_url_path_by_id(&items, "old").unwrap(), vec!["archive", "old-post"]);
        match resolve(&items, &["misc-notes"]) {
            Some(Resolved::Exact(item)) => assert_eq!(item.id(), "misc-notes"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn file_name_collision_does_not_hide_sibling_directory() {
        let items = vec![
            file("overview", "Basics Overview", "/blogs/c/basics.md"),
            dir("basics-dir", "Basics", vec![file("child", "Child", "/blogs/c/basics/child.md")]),
        ];
        let child = item_url_path_by_id(&items, "child").unwrap();
        assert_eq!(child, vec!["basics", "child"]);
        match resolve(&items, child.as_slice()) {
            Some(Resolved::Exact(item)) => assert_eq!(item.id(), "child"),
            other => panic!("unexpected {:?}", other),
        }
        // the canonical segment wins over the file-name spelling
        assert_eq!(find_item_by_path(&items, &["basics"]).map(BlogItem::id), Some("basics-dir"));
        assert_eq!(find_item_by_path(&items, &["basics-overview"]).map(BlogItem::id), Some("overview"));
    }

    #[test]
    fn colliding_slugs_get_distinct_segments() {
        let items = vec![
            file("cpp", "C++", "/blogs/langs/cpp.md"),
            file("csharp", "C#", "/blogs/langs/csharp.md"),
            file("c", "C", "/blogs/langs/c.md"),
        ];
        assert_eq!(sibling_segment(&items, 0), "c");
        assert_eq!(sibling_segment(&items, 1), "c-csharp");
        // id slug equals the base slug, so the position disambiguates
        assert_eq!(sibling_segment(&items, 2), "c-3");
        assert_eq!(sibling_segment(&items, 9), "");
    }

    #[test]
    fn every_canonical_path_resolves_to_its_own_node() {
        let items = vec![
            file("overview", "Basics Overview", "/blogs/c/basics.md"),
            dir("basics-dir", "Basics", vec![
                file("cpp", "C++", "/blogs/c/basics/cpp.md"),
                file("csharp", "C#", "/blogs/c/basics/csharp.md"),
                dir("nested", "Basics", vec![file("deep", "Deep", "/blogs/c/basics/nested/deep.md")]),
            ]),
            dir("basics-2", "Basics", vec![file("twin", "Twin", "/blogs/c/twin.md")]),
        ];
        for id in ["overview", "basics-dir", "cpp", "csharp", "nested", "deep", "basics-2", "twin"] {
            let segments = item_url_path_by_id(&items, id).unwrap();
            match resolve(&items, segments.as_slice()) {
                Some(Resolved::Exact(item)) => assert_eq!(item.id(), id, "{:?}", segments),
                other => panic!("{} via {:?} resolved to {:?}", id, segments, other),
            }
        }
        assert_eq!(item_url_path_by_id(&items, "twin").unwrap(), vec!["basics-basics-2", "twin"]);
    }

    #[test]
    fn leaves_other_links_alone() {
        assert!(rewrite_markdown_link("https://example.com/readme.md", "x", None).is_none());
        assert!(rewrite_markdown_link("//cdn.example.com/a.md", "x", None).is_none());
        assert!(rewrite_markdown_link("#section", "x", None).is_none());
        assert!(rewrite_markdown_link("/images/diagram.png", "x", None).is_none());
    }
}
