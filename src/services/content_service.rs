use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;

use crate::errors::FolioError;
use crate::types::{BlogItem, BlogLibrary, BlogsData, LoadedCategory, NestedBlogIndex, Portfolio};
use crate::utils::resolve_under;

const BLOGS_FILE: &str = "blogs.json";
const PORTFOLIO_FILE: &str = "portfolio.json";

struct CachedDocument {
    body: Arc<str>,
    fetched_at: Instant,
}

/// Reads the static content tree: category list, nested indexes and markdown documents
#[derive(Clone)]
pub struct ContentService {
    root: PathBuf,
    ttl: Duration,
    cache: Arc<Mutex<HashMap<PathBuf, CachedDocument>>>,
}

impl ContentService {
    /// Create a content service rooted at `root`
    pub fn new(root: PathBuf, ttl: Duration) -> Self {
        debug!("Creating ContentService with root: {:?}", root);
        Self {
            root,
            ttl,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Map a site URL to a path below the content root
    pub fn resolve(&self, url: &str) -> Result<PathBuf, FolioError> {
        resolve_under(&self.root, url)
    }

    fn read_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FolioError> {
        let full_path = self.resolve(url)?;
        if !full_path.is_file() {
            warn!("JSON file does not exist: {:?}", full_path);
            return Err(FolioError::NotFound);
        }
        let raw = fs::read_to_string(&full_path).map_err(|e| {
            error!("Failed to read {:?}: {}", full_path, e);
            FolioError::Io(e)
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse {:?}: {}", full_path, e);
            FolioError::Json(e)
        })
    }

    /// Load the category list from `blogs.json`
    pub fn load_blogs(&self) -> Result<BlogsData, FolioError> {
        let data: BlogsData = self.read_json(BLOGS_FILE)?;
        info!("Loaded {} blog categories", data.categories.len());
        Ok(data)
    }

    /// Load a nested category index referenced by `indexUrl`
    pub fn load_nested_index(&self, index_url: &str) -> Result<NestedBlogIndex, FolioError> {
        debug!("Loading nested index: {}", index_url);
        self.read_json(index_url)
    }

    /// Load `portfolio.json`, or an empty portfolio when the site has none
    pub fn load_portfolio(&self) -> Result<Portfolio, FolioError> {
        match self.read_json(PORTFOLIO_FILE) {
            Ok(portfolio) => Ok(portfolio),
            Err(FolioError::NotFound) => {
                warn!("No {} found, landing page will be minimal", PORTFOLIO_FILE);
                Ok(Portfolio::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Load every category and resolve its items. A category whose nested index
    /// cannot be read is kept with no items.
    pub fn load_library(&self) -> Result<BlogLibrary, FolioError> {
        let data = self.load_blogs()?;
        let mut categories = Vec::with_capacity(data.categories.len());

        for category in data.categories {
            let items: Vec<BlogItem> = match category.index_url.as_deref() {
                Some(url) => match self.load_nested_index(url) {
                    Ok(index) => index.children,
                    Err(e) => {
                        error!("Failed to load nested index for {}: {}", category.id, e);
                        Vec::new()
                    }
                },
                None => category.children.iter().map(BlogItem::from).collect(),
            };
            debug!("Category '{}' has {} top-level items", category.id, items.len());
            categories.push(LoadedCategory { category, items });
        }

        Ok(BlogLibrary { categories })
    }

    /// Read a markdown document, served from cache while it is fresh
    pub fn read_document(&self, url: &str) -> Result<Arc<str>, FolioError> {
        let full_path = self.resolve(url)?;

        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&full_path) {
                if cached.fetched_at.elapsed() < self.ttl {
                    debug!("Cache hit for {:?}", full_path);
                    return Ok(Arc::clone(&cached.body));
                }
            }
        }

        if !full_path.is_file() {
            warn!("Document does not exist: {:?}", full_path);
            return Err(FolioError::NotFound);
        }

        let body: Arc<str> = fs::read_to_string(&full_path)
            .map_err(|e| {
                error!("Failed to read document {:?}: {}", full_path, e);
                FolioError::Io(e)
            })?
            .into();
        info!("Read document {:?}, {} bytes", full_path, body.len());

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                full_path,
                CachedDocument { body: Arc::clone(&body), fetched_at: Instant::now() },
            );
        }
        Ok(body)
    }

    /// Drop every cached document
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}
