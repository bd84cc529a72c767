use log::{debug, info, warn};

use crate::services::index_service;
use crate::types::{BlogItem, BlogLibrary, SearchResult};
use crate::utils::escape_html;

/// Lowercased query plus its whitespace-separated terms
struct Query {
    phrase: String,
    terms: Vec<String>,
}

impl Query {
    fn parse(raw: &str) -> Option<Self> {
        let phrase = raw.trim().to_lowercase();
        if phrase.is_empty() {
            return None;
        }
        let terms = phrase.split_whitespace().map(str::to_string).collect();
        Some(Self { phrase, terms })
    }

    /// `whole` if the field contains the full query, plus `per_term` per contained term
    fn weigh(&self, field: &str, whole: u32, per_term: u32) -> u32 {
        if field.is_empty() {
            return 0;
        }
        let field = field.to_lowercase();
        let mut score = 0;
        if field.contains(&self.phrase) {
            score += whole;
        }
        for term in &self.terms {
            if field.contains(term.as_str()) {
                score += per_term;
            }
        }
        score
    }

    /// Exact tag equality outranks containment
    fn weigh_tag(&self, tag: &str) -> u32 {
        let tag = tag.to_lowercase();
        let mut score = 0;
        if tag == self.phrase {
            score += 20;
        } else if tag.contains(&self.phrase) {
            score += 10;
        }
        for term in &self.terms {
            if tag == *term {
                score += 15;
            } else if tag.contains(term.as_str()) {
                score += 5;
            }
        }
        score
    }
}

/// Ranks flattened blog records against free-text queries
pub struct SearchService {
    records: Vec<SearchResult>,
}

impl SearchService {
    /// Create a search service over already-flattened records
    pub fn new(records: Vec<SearchResult>) -> Self {
        Self { records }
    }

    /// Flatten the library and index it
    pub fn from_library(library: &BlogLibrary) -> Self {
        Self::new(index_service::build_index(library))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Score, filter and rank every record. Equal scores keep index order.
    pub fn search(&self, raw_query: &str, limit: Option<usize>) -> Vec<SearchResult> {
        let Some(query) = Query::parse(raw_query) else {
            debug!("Empty search query received");
            return Vec::new();
        };

        info!("Starting search for query: '{}'", query.phrase);
        let start_time = std::time::Instant::now();

        let mut results: Vec<SearchResult> = self
            .records
            .iter()
            .filter_map(|record| {
                let score = score_record(record, &query);
                (score > 0).then(|| SearchResult { relevance_score: score, ..record.clone() })
            })
            .collect();
        results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        if let Some(limit) = limit {
            results.truncate(limit);
        }

        info!(
            "Search completed in {}ms, found {} results",
            start_time.elapsed().as_millis(),
            results.len()
        );
        match results.first() {
            Some(top) => debug!("Top result '{}' scored {}", top.item.title(), top.relevance_score),
            None => warn!("No results found for query: '{}'", query.phrase),
        }
        results
    }
}

/// Relevance of a single record; 0 means no match
pub fn score(record: &SearchResult, raw_query: &str) -> u32 {
    Query::parse(raw_query).map_or(0, |q| score_record(record, &q))
}

fn score_record(record: &SearchResult, query: &Query) -> u32 {
    let item = &record.item;
    let mut score = 0;

    score += query.weigh(item.title(), 15, 8);
    score += query.weigh(item.description().unwrap_or(""), 12, 6);

    score += query.weigh(item.author().unwrap_or(""), 8, 4);

    // directories score on their own text only
    if let BlogItem::File(file) = item {
        score += file.tags.iter().map(|tag| query.weigh_tag(tag)).sum::<u32>();
        for reference in &file.references {
            score += query.weigh(&reference.title, 6, 3);
            for author in reference.all_authors() {
                score += query.weigh(author, 5, 2);
            }
            score += query.weigh(reference.publisher.as_deref().unwrap_or(""), 4, 2);
        }
    }

    score += query.weigh(&record.category_title, 5, 2);
    score
}

/// HTML-escape `text` and wrap each case-insensitive occurrence of a query term in `<mark>`
pub fn highlight(text: &str, raw_query: &str) -> String {
    let terms: Vec<Vec<char>> = raw_query
        .split_whitespace()
        .map(|t| t.to_lowercase().chars().collect())
        .collect();
    if terms.is_empty() {
        return escape_html(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<char> = chars.iter().map(|c| c.to_lowercase().next().unwrap_or(*c)).collect();
    let mut marked = vec![false; chars.len()];
    for term in &terms {
        if term.is_empty() || term.len() > lowered.len() {
            continue;
        }
        for start in 0..=lowered.len() - term.len() {
            if lowered[start..start + term.len()] == term[..] {
                marked[start..start + term.len()].iter_mut().for_each(|m| *m = true);
            }
        }
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut open = false;
    for (i, c) in chars.iter().enumerate() {
        if marked[i] && !open {
            out.push_str("<mark>");
            open = true;
        } else if !marked[i] && open {
            out.push_str("</mark>");
            open = false;
        }
        out.push_str(&escape_html(&c.to_string()));
    }
    if open {
        out.push_str("</mark>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlogDirectory, BlogFile, Reference};

    fn record(item: BlogItem, category_title: &str) -> SearchResult {
        SearchResult {
            path: vec![item.title().to_string()],
            item,
            category_id: "cat".into(),
            category_title: category_title.into(),
            relevance_score: 0,
        }
    }

    fn file(title: &str, description: Option<&str>, tags: &[&str]) -> BlogItem {
        BlogItem::File(BlogFile {
            id: title.to_lowercase(),
            path: String::new(),
            title: title.into(),
            description: description.map(str::to_string),
            date: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: None,
            references: vec![],
            content: None,
        })
    }

    #[test]
    fn title_phrase_and_term_weights() {
        let r = record(file("Observer Pattern", None, &[]), "Misc");
        // phrase 15 + "observer" 8
        assert_eq!(score(&r, "observer"), 23);
        // phrase 15 + two terms 16
        assert_eq!(score(&r, "observer pattern"), 31);
        // only "pattern" term matches
        assert_eq!(score(&r, "strategy pattern"), 8);
    }

    #[test]
    fn tag_equality_beats_containment() {
        let exact = record(file("A", None, &["rust"]), "Misc");
        let partial = record(file("B", None, &["rustlang"]), "Misc");
        assert_eq!(score(&exact, "rust"), 20 + 15);
        assert_eq!(score(&partial, "rust"), 10 + 5);
    }

    #[test]
    fn directories_ignore_tags_and_references() {
        let reference = Reference {
            title: "Design Patterns".into(),
            author: None,
            authors: vec!["Erich Gamma".into()],
            publisher: Some("Addison-Wesley".into()),
            link: None,
        };
        let dir = record(
            BlogItem::Directory(BlogDirectory {
                id: "gof".into(),
                title: "Patterns".into(),
                description: None,
                author: Some("Jane Doe".into()),
                children: vec![],
                references: vec![reference.clone()],
                index_url: None,
            }),
            "Books",
        );
        assert_eq!(score(&dir, "gamma"), 0);
        assert_eq!(score(&dir, "addison"), 0);
        assert_eq!(score(&dir, "doe"), 8 + 4);
        assert_eq!(score(&dir, "patterns"), 15 + 8);

        let mut post = file("Patterns", None, &[]);
        if let BlogItem::File(f) = &mut post {
            f.references.push(reference);
        }
        let post = record(post, "Books");
        assert_eq!(score(&post, "gamma"), 5 + 2);
        assert_eq!(score(&post, "addison"), 4 + 2);
        // title 15+8, reference title 6+3
        assert_eq!(score(&post, "patterns"), 23 + 9);
    }

    #[test]
    fn category_title_contributes() {
        let r = record(file("Intro", None, &[]), "System Design");
        assert_eq!(score(&r, "design"), 5 + 2);
    }

    #[test]
    fn search_filters_sorts_and_limits() {
        let service = SearchService::new(vec![
            record(file("Caching", Some("cache layers"), &[]), "Systems"),
            record(file("Queues", None, &[]), "Systems"),
            record(file("Cache Invalidation", None, &["cache"]), "Systems"),
            record(file("Another cache note", None, &[]), "Systems"),
        ]);

        let results = service.search("cache", None);
        let titles: Vec<&str> = results.iter().map(|r| r.item.title()).collect();
        // 58 (title + exact tag), 23 (title), 18 (description only: "caching" lacks "cache")
        assert_eq!(titles, vec!["Cache Invalidation", "Another cache note", "Caching"]);
        assert!(results.windows(2).all(|w| w[0].relevance_score >= w[1].relevance_score));

        assert_eq!(service.search("cache", Some(1)).len(), 1);
        assert!(service.search("   ", None).is_empty());
        assert!(service.search("kafka", None).is_empty());
    }

    #[test]
    fn ties_keep_index_order() {
        let service = SearchService::new(vec![
            record(file("Graph One", None, &[]), "X"),
            record(file("Graph Two", None, &[]), "X"),
        ]);
        let results = service.search("graph", None);
        assert_eq!(results[0].item.title(), "Graph One");
        assert_eq!(results[1].item.title(), "Graph Two");
    }

    #[test]
    fn highlight_marks_terms_and_escapes() {
        assert_eq!(highlight("Rust <3 rust", "RUST"), "<mark>Rust</mark> &lt;3 <mark>rust</mark>");
        assert_eq!(highlight("Event Loop", "event loop"), "<mark>Event</mark> <mark>Loop</mark>");
        assert_eq!(highlight("overlap", "over lap"), "<mark>overlap</mark>");
        assert_eq!(highlight("a & b", ""), "a &amp; b");
    }
}
