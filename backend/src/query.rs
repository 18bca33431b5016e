use std::time::Instant;

use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use serde::Serialize;
use tracing::debug;

use crate::types::Chapter;

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct SearchHit {
    #[diesel(sql_type = Text)]
    pub passage: String,
    #[diesel(sql_type = Text)]
    pub link: String,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub book: String,
    #[diesel(sql_type = Text)]
    pub chapter: String,
    #[diesel(sql_type = BigInt)]
    pub verse: i64,
}

impl SearchHit {
    pub fn chapter(&self) -> Chapter {
        Chapter::named(&self.chapter)
    }
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct BookUsage {
    #[diesel(sql_type = Text)]
    pub book: String,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Quote every whitespace-separated word of a user term as an FTS5 string,
/// so operators and punctuation in the input are matched as text.
///
/// Returns None when the term has no words.
pub fn fts_query(term: &str) -> Option<String> {
    let words: Vec<String> = term
        .split_whitespace()
        .map(|w| w.replace('"', ""))
        .filter(|w| !w.is_empty())
        .map(|w| format!("\"{}\"", w))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub fn search_passages(conn: &mut SqliteConnection, term: &str) -> Result<Vec<SearchHit>> {
    let Some(query) = fts_query(term) else {
        return Ok(Vec::new());
    };
    let timer = Instant::now();

    // Without an ORDER BY, FTS5 results are not in a stable order.
    let hits: Vec<SearchHit> = sql_query(
        r#"
        SELECT passage, link, title, book, chapter, CAST(verse AS INTEGER) AS verse
        FROM latin_fts
        WHERE latin_fts MATCH ?
        ORDER BY rowid
        "#
    )
    .bind::<Text, _>(&query)
    .load(conn)
    .with_context(|| format!("Search failed for: {}", term))?;

    debug!("search_passages({}): {} hits in {:?}", query, hits.len(), timer.elapsed());
    Ok(hits)
}

/// Hit counts per book, most frequent first.
pub fn usage_by_book(conn: &mut SqliteConnection, term: &str) -> Result<Vec<BookUsage>> {
    let Some(query) = fts_query(term) else {
        return Ok(Vec::new());
    };

    let usage: Vec<BookUsage> = sql_query(
        r#"
        SELECT book, title, COUNT(*) AS count
        FROM latin_fts
        WHERE latin_fts MATCH ?
        GROUP BY title, book
        ORDER BY count DESC, book ASC
        "#
    )
    .bind::<Text, _>(&query)
    .load(conn)
    .with_context(|| format!("Usage count failed for: {}", term))?;

    Ok(usage)
}
