use std::path::{Component, Path, PathBuf};

use time::Date;
use time::macros::format_description;

use crate::errors::FolioError;

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape HTML attribute values
pub fn escape_attr(text: &str) -> String {
    escape_html(text)
}

/// Normalize request path
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a site URL such as `/blogs/oops/index.json` to a file below `root`.
/// Parent-directory components are rejected.
pub fn resolve_under(root: &Path, url: &str) -> Result<PathBuf, FolioError> {
    let relative = normalize_path(url.split(['?', '#']).next().unwrap_or(""));
    if relative.is_empty() {
        return Err(FolioError::InvalidPath);
    }
    let path = Path::new(&relative);
    for comp in path.components() {
        match comp {
            Component::Normal(_) => {}
            _ => return Err(FolioError::InvalidPath),
        }
    }
    Ok(root.join(path))
}

/// Format a `YYYY-MM-DD` date as `January 5, 2024`; anything else is returned as-is
pub fn format_post_date(date: &str) -> String {
    let input = format_description!("[year]-[month]-[day]");
    let output = format_description!("[month repr:long] [day padding:none], [year]");
    // Accept full timestamps by looking at the date part only
    let day_part = date.get(..10).unwrap_or(date);
    match Date::parse(day_part, input) {
        Ok(parsed) => parsed.format(output).unwrap_or_else(|_| date.to_string()),
        Err(_) => date.to_string(),
    }
}

/// Determine content type for a file based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    }

    #[test]
    fn normalizes_slashes_and_dots() {
        assert_eq!(normalize_path("//blogs/./oops//intro/"), "blogs/oops/intro");
        assert_eq!(normalize_path("/"), "");
    }

    #[test]
    fn resolve_under_rejects_traversal() {
        let root = Path::new("/srv/content");
        assert_eq!(
            resolve_under(root, "/blogs/oops/index.json").unwrap(),
            PathBuf::from("/srv/content/blogs/oops/index.json")
        );
        assert!(matches!(resolve_under(root, "../etc/passwd"), Err(FolioError::InvalidPath)));
        assert!(matches!(resolve_under(root, "blogs/../../x"), Err(FolioError::InvalidPath)));
        assert!(matches!(resolve_under(root, "/"), Err(FolioError::InvalidPath)));
    }

    #[test]
    fn formats_dates_long_form() {
        assert_eq!(format_post_date("2024-03-05"), "March 5, 2024");
        assert_eq!(format_post_date("2023-12-31T10:00:00Z"), "December 31, 2023");
        assert_eq!(format_post_date("sometime"), "sometime");
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for(Path::new("a/b.MD")), "text/markdown; charset=utf-8");
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }
}
