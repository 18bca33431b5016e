use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::SourceError;

/// Supplies raw page bytes by locator, e.g. `www.thelatinlibrary.com/verg.html`.
pub trait PageSource {
    fn load(&self, locator: &str) -> Result<Vec<u8>, SourceError>;
}

/// Pages stored under a mirror directory, in the layout a recursive download
/// produces: `<root>/www.thelatinlibrary.com/vergil/aen1.shtml`.
pub struct MirrorDirSource {
    root: PathBuf,
}

impl MirrorDirSource {
    pub fn new(root: &Path) -> Self {
        MirrorDirSource { root: root.to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.root.join(locator_to_relative_path(locator))
    }
}

impl PageSource for MirrorDirSource {
    fn load(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.path_for(locator);
        if !path.is_file() {
            return Err(SourceError::NotFound(locator.to_string()));
        }
        fs::read(&path).map_err(|e| SourceError::Io {
            locator: locator.to_string(),
            source: e,
        })
    }
}

/// Fragment and query removed, scheme dropped, no leading slash.
pub fn locator_to_relative_path(locator: &str) -> PathBuf {
    let s = locator.split(['#', '?']).next().unwrap_or(locator);
    let s = s
        .strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"))
        .unwrap_or(s);
    PathBuf::from(s.trim_start_matches('/'))
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPageSource {
    pages: HashMap<String, Vec<u8>>,
}

impl MemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: &str, content: impl Into<Vec<u8>>) {
        self.pages.insert(locator_key(locator), content.into());
    }

    pub fn remove(&mut self, locator: &str) -> Option<Vec<u8>> {
        self.pages.remove(&locator_key(locator))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn locator_key(locator: &str) -> String {
    locator_to_relative_path(locator).to_string_lossy().to_string()
}

impl PageSource for MemoryPageSource {
    fn load(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        self.pages
            .get(&locator_key(locator))
            .cloned()
            .ok_or_else(|| SourceError::NotFound(locator.to_string()))
    }
}
