use log::debug;

use crate::types::{BlogItem, BlogLibrary, SearchResult};

/// Flatten one category tree into search records, parents before children.
/// Each record's breadcrumb ends with its own title.
pub fn flatten_category(
    category_id: &str,
    category_title: &str,
    items: &[BlogItem],
) -> Vec<SearchResult> {
    let mut records = Vec::new();
    let mut breadcrumb = Vec::new();
    flatten_into(category_id, category_title, items, &mut breadcrumb, &mut records);
    records
}

fn flatten_into(
    category_id: &str,
    category_title: &str,
    items: &[BlogItem],
    breadcrumb: &mut Vec<String>,
    records: &mut Vec<SearchResult>,
) {
    for item in items {
        breadcrumb.push(item.title().to_string());
        records.push(SearchResult {
            item: item.clone(),
            category_id: category_id.to_string(),
            category_title: category_title.to_string(),
            path: breadcrumb.clone(),
            relevance_score: 0,
        });
        if let BlogItem::Directory(dir) = item {
            flatten_into(category_id, category_title, &dir.children, breadcrumb, records);
        }
        breadcrumb.pop();
    }
}

/// Flatten every category of the library, in category order
pub fn build_index(library: &BlogLibrary) -> Vec<SearchResult> {
    let records: Vec<SearchResult> = library
        .categories
        .iter()
        .flat_map(|c| flatten_category(&c.category.id, &c.category.title, &c.items))
        .collect();
    debug!("Built search index with {} records", records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlogCategory, BlogDirectory, BlogFile, LoadedCategory};

    fn file(id: &str, title: &str) -> BlogItem {
        BlogItem::File(BlogFile {
            id: id.into(),
            path: format!("/blogs/x/{}.md", id),
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

    #[test]
    fn breadcrumbs_follow_the_tree() {
        let items = vec![
            dir("creational", "Creational", vec![
                file("singleton", "Singleton"),
                dir("factories", "Factories", vec![file("abstract", "Abstract Factory")]),
            ]),
            file("summary", "Summary"),
        ];
        let records = flatten_category("patterns", "Design Patterns", &items);

        let paths: Vec<Vec<&str>> = records
            .iter()
            .map(|r| r.path.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(paths, vec![
            vec!["Creational"],
            vec!["Creational", "Singleton"],
            vec!["Creational", "Factories"],
            vec!["Creational", "Factories", "Abstract Factory"],
            vec!["Summary"],
        ]);
        assert!(records.iter().all(|r| r.relevance_score == 0));
        assert!(records.iter().all(|r| r.category_title == "Design Patterns"));
    }

    #[test]
    fn indexes_all_categories_in_order() {
        let category = |id: &str| BlogCategory {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            image: None,
            children: vec![],
            index_url: None,
        };
        let library = BlogLibrary {
            categories: vec![
                LoadedCategory { category: category("a"), items: vec![file("one", "One")] },
                LoadedCategory { category: category("b"), items: vec![] },
                LoadedCategory { category: category("c"), items: vec![file("two", "Two")] },
            ],
        };
        let records = build_index(&library);
        let ids: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.category_id.as_str(), r.item.id()))
            .collect();
        assert_eq!(ids, vec![("a", "one"), ("c", "two")]);
    }
}
