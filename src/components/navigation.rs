use log::debug;

use crate::services::path_resolver::{category_url, sibling_segment};
use crate::types::{BlogItem, BlogLibrary, LoadedCategory};
use crate::utils::{escape_attr, escape_html};

/// Builds the category tree sidebar and the category switcher
pub struct NavigationComponent<'a> {
    library: &'a BlogLibrary,
}

impl<'a> NavigationComponent<'a> {
    pub fn new(library: &'a BlogLibrary) -> Self {
        Self { library }
    }

    /// Sidebar for one category: back link, tree of items and optional TOC
    pub fn build_sidebar(
        &self,
        category: &LoadedCategory,
        selected: Option<&BlogItem>,
        toc: &str,
    ) -> String {
        debug!(
            "Building sidebar for category '{}' (selected: {:?})",
            category.category.id,
            selected.map(BlogItem::id)
        );
        let mut html = String::new();
        html.push_str("<nav class=\"sidebar-nav\">");
        html.push_str("<a class=\"back-link\" href=\"/blogs\">← Back to Blogs</a>");
        html.push_str(&format!(
            "<div class=\"sidebar-title\">{}</div>",
            escape_html(&category.category.title)
        ));

        let selected_key = selected.map(BlogItem::selection_key);
        let mut prefix = Vec::new();
        build_tree_ul(&category.category.id, &category.items, &mut prefix, selected_key, &mut html);

        if !toc.is_empty() {
            html.push_str("<div class=\"sidebar-toc\"><div class=\"sidebar-toc-title\">On this page</div>");
            html.push_str(toc);
            html.push_str("</div>");
        }
        html.push_str(&self.build_category_switcher(&category.category.id));
        html.push_str("</nav>");
        html
    }

    /// Links to every category, the current one marked active
    pub fn build_category_switcher(&self, current: &str) -> String {
        let mut html = String::from("<div class=\"category-switcher\"><div class=\"sidebar-subtitle\">Categories</div><ul>");
        for category in &self.library.categories {
            let class = if category.category.id == current { " class=\"active\"" } else { "" };
            html.push_str(&format!(
                "<li><a{} href=\"{}\">{}</a></li>",
                class,
                escape_attr(&category_url::<&str>(&category.category.id, &[])),
                escape_html(&category.category.title)
            ));
        }
        html.push_str("</ul></div>");
        html
    }
}

/// True when `item` or one of its descendants is selected
fn contains_selected(item: &BlogItem, selected_key: Option<&str>) -> bool {
    let Some(key) = selected_key else {
        return false;
    };
    item.selection_key() == key || item.children().iter().any(|c| contains_selected(c, selected_key))
}

fn build_tree_ul(
    category_id: &str,
    items: &[BlogItem],
    prefix: &mut Vec<String>,
    selected_key: Option<&str>,
    html: &mut String,
) {
    html.push_str("<ul class=\"nav-list\">");
    for (index, item) in items.iter().enumerate() {
        prefix.push(sibling_segment(items, index));
        let href = category_url(category_id, prefix.as_slice());
        let active = selected_key == Some(item.selection_key());
        let link_class = if active { " class=\"active\"" } else { "" };

        match item {
            BlogItem::Directory(dir) => {
                html.push_str("<li class=\"nav-item dir\"><details");
                if contains_selected(item, selected_key) {
                    html.push_str(" open");
                }
                html.push_str("><summary>");
                html.push_str(&format!(
                    "<a{} href=\"{}\" title=\"{}\">{}</a>",
                    link_class,
                    escape_attr(&href),
                    escape_attr(dir.description.as_deref().unwrap_or(&dir.title)),
                    escape_html(&dir.title)
                ));
                html.push_str("</summary>");
                build_tree_ul(category_id, &dir.children, prefix, selected_key, html);
                html.push_str("</details></li>");
            }
            BlogItem::File(file) => {
                html.push_str(&format!(
                    "<li class=\"nav-item file\"><a{} href=\"{}\" title=\"{}\">{}</a></li>",
                    link_class,
                    escape_attr(&href),
                    escape_attr(file.description.as_deref().unwrap_or(&file.title)),
                    escape_html(&file.title)
                ));
            }
        }
        prefix.pop();
    }
    html.push_str("</ul>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlogCategory, BlogDirectory, BlogFile};

    fn file(id: &str, title: &str) -> BlogItem {
        BlogItem::File(BlogFile {
            id: id.into(),
            path: format!("/blogs/oops/{}.md", id),
            title: title.into(),
            description: None,
            date: None,
            tags: vec![],
            author: None,
            references: vec![],
            content: None,
        })
    }

    fn library() -> BlogLibrary {
        let items = vec![
            BlogItem::Directory(BlogDirectory {
                id: "basics".into(),
                title: "01 Basics".into(),
                description: Some("Start here".into()),
                author: None,
                children: vec![file("classes", "Classes & Objects")],
                references: vec![],
                index_url: None,
            }),
            file("summary", "Summary"),
        ];
        BlogLibrary {
            categories: vec![LoadedCategory {
                category: BlogCategory {
                    id: "oops".into(),
                    title: "OOP".into(),
                    description: String::new(),
                    image: None,
                    children: vec![],
                    index_url: None,
                },
                items,
            }],
        }
    }

    #[test]
    fn tree_links_use_canonical_paths() {
        let library = library();
        let nav = NavigationComponent::new(&library);
        let category = &library.categories[0];
        let html = nav.build_sidebar(category, None, "");
        assert!(html.contains("href=\"/blogs/oops/basics\""));
        assert!(html.contains("href=\"/blogs/oops/basics/classes-objects\""));
        assert!(html.contains(">Classes &amp; Objects</a>"));
        assert!(!html.contains("<details open"));
    }

    #[test]
    fn selected_branch_is_open_and_active() {
        let library = library();
        let nav = NavigationComponent::new(&library);
        let category = &library.categories[0];
        let selected = &category.items[0].children()[0];
        let html = nav.build_sidebar(category, Some(selected), "<nav class=\"toc\"></nav>");
        assert!(html.contains("<details open>"));
        assert!(html.contains("<a class=\"active\" href=\"/blogs/oops/basics/classes-objects\""));
        assert!(html.contains("On this page"));
    }

    #[test]
    fn switcher_marks_current_category() {
        let library = library();
        let nav = NavigationComponent::new(&library);
        assert!(nav.build_category_switcher("oops").contains("<a class=\"active\" href=\"/blogs/oops\">OOP</a>"));
    }
}
