use anyhow::Result;

use latin_library_backend::db::DatabaseHandle;
use latin_library_backend::logger;
use latin_library_backend::query::{search_passages, SearchHit};
use latin_library_backend::types::Chapter;
use latin_library_backend::translate::{MyMemoryTranslator, Translator};
use latin_library_backend::{translation_api_url, AppPaths};

/// The Latin term to search for, translating from English when asked.
pub fn latin_term(term: &str, english: bool) -> Result<String> {
    if !english {
        return Ok(term.to_string());
    }
    let translator = MyMemoryTranslator::new(&translation_api_url())?;
    let latin = translator.translate(term)?;
    logger::info(&format!("Translated '{}' to '{}'", term, latin));
    Ok(latin)
}

pub fn format_hit(hit: &SearchHit) -> String {
    let mut s = format!(
        "Search Result\n-------------\n{}\n\nFull Text: {}\nCollection: {}\nBook: {}\n",
        hit.passage, hit.link, hit.title, hit.book
    );
    if let Chapter::Named(label) = hit.chapter() {
        s.push_str(&format!("Chapter: {}\n", label));
    }
    s.push_str(&format!("Verse: {}\n", hit.verse));
    s
}

/// All hits as printed, or "No Results".
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No Results\n".to_string();
    }
    hits.iter().map(format_hit).collect::<Vec<String>>().join("\n")
}

pub fn search_db(handle: &DatabaseHandle, term: &str, english: bool) -> Result<String> {
    let latin = latin_term(term, english)?;
    let hits = handle.do_read(|conn| search_passages(conn, &latin))?;
    Ok(format_hits(&hits))
}

pub fn run_search(paths: &AppPaths, term: &str, english: bool) -> Result<()> {
    let handle = DatabaseHandle::open(&paths.db_path)?;
    print!("{}", search_db(&handle, term, english)?);
    Ok(())
}
