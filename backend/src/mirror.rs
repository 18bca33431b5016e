//! Local mirror of the collection pages.
//!
//! The index page of a collection and every book page it links to are stored
//! under the mirror directory at their locator path, which is what
//! `MirrorDirSource` reads back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::collections::CollectionConfig;
use crate::document::Document;
use crate::page_source::{locator_to_relative_path, MirrorDirSource};
use crate::parser::book_links;
use crate::URL_ROOT;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    pub slug: String,
    pub index_path: PathBuf,
    pub book_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCheck {
    pub slug: String,
    pub has_index: bool,
    pub expected_books: usize,
    pub found_books: usize,
}

impl MirrorCheck {
    pub fn is_complete(&self) -> bool {
        self.has_index && self.found_books >= self.expected_books
    }
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))
}

fn fetch_page(client: &reqwest::blocking::Client, locator: &str) -> Result<Vec<u8>> {
    let url = format!("http://{}", locator_to_relative_path(locator).to_string_lossy());
    let response = client
        .get(&url)
        .send()
        .map_err(|e| anyhow!("Failed to fetch {}: {}", url, e))?;

    if !response.status().is_success() {
        return Err(anyhow!("{} returned error status: {}", url, response.status()));
    }

    let bytes = response
        .bytes()
        .map_err(|e| anyhow!("Failed to read {}: {}", url, e))?;
    Ok(bytes.to_vec())
}

fn save_page(mirror: &MirrorDirSource, locator: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = mirror.path_for(locator);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Download the index page and its book pages, one level deep.
///
/// `on_page` is called with each book locator after it is saved.
pub fn fetch_collection<F>(
    client: &reqwest::blocking::Client,
    config: &CollectionConfig,
    mirror_dir: &Path,
    mut on_page: F,
) -> Result<MirrorReport>
where
    F: FnMut(&str),
{
    let mirror = MirrorDirSource::new(mirror_dir);
    let index_locator = config.index_locator();

    let index_bytes = fetch_page(client, &index_locator)?;
    let index_path = save_page(&mirror, &index_locator, &index_bytes)?;

    let doc = Document::from_bytes(&index_bytes);
    let links = book_links(config, &doc, &index_locator)?;
    info!("{}: fetching {} book pages", config.slug, links.len());

    for link in links.iter() {
        let bytes = fetch_page(client, &link.locator)?;
        save_page(&mirror, &link.locator, &bytes)?;
        on_page(&link.locator);
    }

    Ok(MirrorReport {
        slug: config.slug.to_string(),
        index_path,
        book_pages: links.len(),
    })
}

/// Count the mirrored book pages of a collection.
pub fn verify_mirror(mirror_dir: &Path, config: &CollectionConfig) -> MirrorCheck {
    let mirror = MirrorDirSource::new(mirror_dir);
    let has_index = mirror.path_for(&config.index_locator()).is_file();

    let book_dir = mirror_dir.join(locator_to_relative_path(&format!("{}{}", URL_ROOT, config.book_dir)));
    let found_books = WalkDir::new(&book_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "html" | "shtml" | "htm"))
        })
        .count();

    if found_books < config.expected_books {
        warn!("{}: {} of {} book pages in {}", config.slug, found_books, config.expected_books, book_dir.display());
    }

    MirrorCheck {
        slug: config.slug.to_string(),
        has_index,
        expected_books: config.expected_books,
        found_books,
    }
}
