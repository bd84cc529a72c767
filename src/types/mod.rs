use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::FolioError;
use crate::services::{ContentService, SearchService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: ContentService,
    pub library: Arc<BlogLibrary>,
    pub search: Arc<SearchService>,
    pub portfolio: Arc<Portfolio>,
}

impl AppState {
    /// Read the content tree once and build the search index
    pub fn load(config: Config) -> Result<Self, FolioError> {
        let content = ContentService::new(config.content_dir.as_ref().clone(), config.cache_ttl);
        let library = content.load_library()?;
        let search = SearchService::from_library(&library);
        let portfolio = content.load_portfolio()?;
        log::info!(
            "Loaded {} categories with {} searchable records",
            library.categories.len(),
            search.len()
        );
        Ok(Self {
            config: Arc::new(config),
            content,
            library: Arc::new(library),
            search: Arc::new(search),
            portfolio: Arc::new(portfolio),
        })
    }
}

/// Top-level `blogs.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogsData {
    #[serde(default)]
    pub categories: Vec<BlogCategory>,
}

/// A blog category: either a flat list of posts or a pointer to a nested index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, alias = "posts", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlogPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
}

/// A simple post listed inline in a category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content_path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl From<&BlogPost> for BlogItem {
    fn from(post: &BlogPost) -> Self {
        let path = post
            .path
            .clone()
            .filter(|p| !p.is_empty())
            .or_else(|| post.content_path.clone())
            .unwrap_or_default();
        BlogItem::File(BlogFile {
            id: post.id.clone(),
            path,
            title: post.title.clone(),
            description: post.description.clone(),
            date: post.date.clone(),
            tags: Vec::new(),
            author: None,
            references: Vec::new(),
            content: post.content.clone(),
        })
    }
}

/// File referenced by a category's `indexUrl`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestedBlogIndex {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<BlogItem>,
}

/// A node of a category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlogItem {
    File(BlogFile),
    Directory(BlogDirectory),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFile {
    pub id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    /// Inline markdown used when no path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDirectory {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub children: Vec<BlogItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    /// Markdown shown when the directory itself is opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Reference {
    /// `authors` when present, otherwise the single `author`
    pub fn all_authors(&self) -> Vec<&str> {
        if !self.authors.is_empty() {
            self.authors.iter().map(String::as_str).collect()
        } else {
            self.author.as_deref().into_iter().collect()
        }
    }
}

impl BlogItem {
    pub fn id(&self) -> &str {
        match self {
            BlogItem::File(f) => &f.id,
            BlogItem::Directory(d) => &d.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BlogItem::File(f) => &f.title,
            BlogItem::Directory(d) => &d.title,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            BlogItem::File(f) => f.description.as_deref(),
            BlogItem::Directory(d) => d.description.as_deref(),
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            BlogItem::File(f) => f.author.as_deref(),
            BlogItem::Directory(d) => d.author.as_deref(),
        }
    }

    pub fn references(&self) -> &[Reference] {
        match self {
            BlogItem::File(f) => &f.references,
            BlogItem::Directory(d) => &d.references,
        }
    }

    pub fn children(&self) -> &[BlogItem] {
        match self {
            BlogItem::File(_) => &[],
            BlogItem::Directory(d) => &d.children,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, BlogItem::File(_))
    }

    /// Sidebar selection key: the file path, or the id for directories
    pub fn selection_key(&self) -> &str {
        match self {
            BlogItem::File(f) => &f.path,
            BlogItem::Directory(d) => &d.id,
        }
    }
}

/// A category with its items resolved, loaded once at startup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedCategory {
    #[serde(flatten)]
    pub category: BlogCategory,
    pub items: Vec<BlogItem>,
}

/// Every category of the site
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogLibrary {
    pub categories: Vec<LoadedCategory>,
}

impl BlogLibrary {
    pub fn category(&self, id: &str) -> Option<&LoadedCategory> {
        self.categories.iter().find(|c| c.category.id == id)
    }
}

/// A flattened, scored search record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub item: BlogItem,
    pub category_id: String,
    pub category_title: String,
    /// Breadcrumb of titles from the category root down to the item
    pub path: Vec<String>,
    pub relevance_score: u32,
}

/// Markdown rendering result
#[derive(Debug, Clone)]
pub struct MarkdownResult {
    pub html: String,
    pub toc: String,
    pub title: Option<String>,
}

/// Template rendering context
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub title: String,
    pub content: String,
    pub sidebar: String,
}

/// Landing page data from `portfolio.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub personal: PersonalInfo,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub title: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credential_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_tree() {
        let json = r#"{
            "children": [
                {"type": "directory", "id": "basics", "title": "Basics", "children": [
                    {"type": "file", "id": "intro", "path": "/blogs/oops/01-basics/01-intro.md",
                     "title": "Intro", "tags": ["oop"]}
                ]},
                {"type": "file", "id": "solo", "path": "/blogs/oops/solo.md", "title": "Solo"}
            ]
        }"#;
        let index: NestedBlogIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.children.len(), 2);
        let dir = &index.children[0];
        assert!(!dir.is_file());
        assert_eq!(dir.children()[0].title(), "Intro");
        assert_eq!(dir.selection_key(), "basics");
        assert_eq!(index.children[1].selection_key(), "/blogs/oops/solo.md");
    }

    #[test]
    fn category_accepts_posts_alias() {
        let json = r#"{"id": "react", "title": "React", "indexUrl": null,
            "posts": [{"id": "hooks", "title": "Hooks", "contentPath": "blogs/react/hooks.md"}]}"#;
        let category: BlogCategory = serde_json::from_str(json).unwrap();
        assert_eq!(category.children.len(), 1);
        match BlogItem::from(&category.children[0]) {
            BlogItem::File(file) => assert_eq!(file.path, "blogs/react/hooks.md"),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn reference_authors_fall_back_to_single_author() {
        let single = Reference {
            title: "GoF".into(),
            author: Some("Gamma".into()),
            authors: vec![],
            publisher: None,
            link: None,
        };
        assert_eq!(single.all_authors(), vec!["Gamma"]);
        let many = Reference { authors: vec!["Helm".into(), "Johnson".into()], ..single };
        assert_eq!(many.all_authors(), vec!["Helm", "Johnson"]);
    }
}
