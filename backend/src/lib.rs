pub mod types;
pub mod logger;
pub mod encoding;
pub mod document;
pub mod tokenizer;
pub mod collections;
pub mod page_source;
pub mod parser;
pub mod aggregator;
pub mod validation;
pub mod mirror;
pub mod translate;
pub mod query;
pub mod db;

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::error::Error;

use app_dirs::{get_app_root, AppDataType, AppInfo};
use dotenvy::dotenv;

/// Root shared by all collection locators, as laid out by a one-level web mirror.
pub static URL_ROOT: &str = "www.thelatinlibrary.com/";

pub static LANGUAGE: &str = "Latin";

pub static TRANSLATION_API_URL: &str = "https://api.mymemory.translated.net/get";

pub const APP_INFO: AppInfo = AppInfo{name: "latin-library", author: "latin-library"};

/// Returns the data directory, creating it when missing.
///
/// LATIN_LIBRARY_DIR overrides the per-user application data directory.
pub fn get_create_latin_library_dir() -> Result<PathBuf, Box<dyn Error>> {
    let p = match env::var("LATIN_LIBRARY_DIR") {
        Ok(s) if !s.is_empty() => PathBuf::from(s),
        _ => get_app_root(AppDataType::UserData, &APP_INFO)?,
    };
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}

/// Resolved file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub mirror_dir: PathBuf,
    pub db_path: PathBuf,
}

impl AppPaths {
    /// Resolve paths from explicit values, falling back to the environment
    /// (and a .env file) and then to defaults under the data directory.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        mirror_dir: Option<PathBuf>,
        db_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn Error>> {
        dotenv().ok();

        let data_dir = match data_dir {
            Some(p) => {
                create_dir_all(&p)?;
                p
            }
            None => get_create_latin_library_dir()?,
        };

        let mirror_dir = mirror_dir
            .or_else(|| env_path("LATIN_LIBRARY_MIRROR_DIR"))
            .unwrap_or_else(|| data_dir.join("mirror"));

        let db_path = db_path
            .or_else(|| env_path("LATIN_LIBRARY_DB"))
            .unwrap_or_else(|| data_dir.join("latin_library.sqlite3"));

        Ok(AppPaths { data_dir, mirror_dir, db_path })
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    match env::var(key) {
        Ok(s) if !s.is_empty() => Some(PathBuf::from(s)),
        _ => None,
    }
}

/// The translation endpoint, TRANSLATION_API_URL in the environment wins.
pub fn translation_api_url() -> String {
    match env::var("TRANSLATION_API_URL") {
        Ok(s) if !s.is_empty() => s,
        _ => TRANSLATION_API_URL.to_string(),
    }
}
