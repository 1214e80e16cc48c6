use crate::error::RetrievalError;
use crate::models::snapshot::SiteSnapshot;
use log::warn;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Resolves a URL to a rendered snapshot. Rendering and fetching live behind
/// this seam; the core treats it as one blocking call.
pub trait SnapshotProvider: Send + Sync {
    fn capture(&self, url: &str) -> Result<SiteSnapshot, RetrievalError>;
}

/// Prefix `https://` when no scheme is given.
pub fn normalize_url(url: &str) -> Result<String, RetrievalError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(RetrievalError::InvalidUrl(url.to_string()));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}

/// Bounded retry at the collaborator boundary. `attempts` of 0 is treated as 1.
pub fn capture_with_retry(
    provider: &dyn SnapshotProvider,
    url: &str,
    attempts: u32,
) -> Result<SiteSnapshot, RetrievalError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match provider.capture(url) {
            Ok(snapshot) => return Ok(snapshot),
            Err(err) if attempt < attempts && is_transient(&err) => {
                warn!("capture of {url} failed (attempt {attempt}/{attempts}): {err}");
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_transient(err: &RetrievalError) -> bool {
    !matches!(err, RetrievalError::InvalidUrl(_))
}

/// Snapshots captured ahead of time and held in memory, keyed by URL.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    snapshots: HashMap<String, SiteSnapshot>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: SiteSnapshot) {
        self.snapshots.insert(snapshot.url.clone(), snapshot);
    }

    pub fn with(mut self, snapshot: SiteSnapshot) -> Self {
        self.insert(snapshot);
        self
    }
}

impl SnapshotProvider for MemoryProvider {
    fn capture(&self, url: &str) -> Result<SiteSnapshot, RetrievalError> {
        self.snapshots
            .get(url)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(url.to_string()))
    }
}

/// Offline captures on disk: `<slug>.png` (or `.jpg`) next to `<slug>.html`,
/// where the slug is derived from the URL host and path.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SnapshotProvider for DirectoryProvider {
    fn capture(&self, url: &str) -> Result<SiteSnapshot, RetrievalError> {
        let slug = url_slug(url);
        let markup_path = self.root.join(format!("{slug}.html"));
        let image_path = ["png", "jpg", "jpeg"]
            .iter()
            .map(|ext| self.root.join(format!("{slug}.{ext}")))
            .find(|p| p.exists())
            .ok_or_else(|| RetrievalError::NotFound(url.to_string()))?;
        if !markup_path.exists() {
            return Err(RetrievalError::NotFound(url.to_string()));
        }

        let io_err = |source| RetrievalError::Io {
            url: url.to_string(),
            source,
        };
        let bytes = fs::read(&image_path).map_err(io_err)?;
        let markup = fs::read_to_string(&markup_path).map_err(io_err)?;
        let image = image::load_from_memory(&bytes).map_err(|source| RetrievalError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(SiteSnapshot::new(url, image, markup))
    }
}

/// `https://Example.com/about/` → `example_com_about`
pub fn url_slug(url: &str) -> String {
    let without_scheme = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut slug = String::with_capacity(without_scheme.len());
    let mut last_sep = true;
    for c in without_scheme.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_sep = false;
        } else if !last_sep {
            slug.push('_');
            last_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
