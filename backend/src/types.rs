use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize, Serializer};
use thiserror::Error;

use crate::LANGUAGE;

/// Stored and displayed in place of a chapter label for books without chapters.
pub static NO_CHAPTER: &str = "null";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Chapter {
    Named(String),
    None,
}

impl Chapter {
    /// An empty or sentinel label becomes Chapter::None, so a record never
    /// carries an empty chapter.
    pub fn named(label: &str) -> Self {
        let label = strip_newlines(label.trim());
        if label.is_empty() || label == NO_CHAPTER {
            Chapter::None
        } else {
            Chapter::Named(label)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Chapter::Named(s) => s,
            Chapter::None => NO_CHAPTER,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Chapter::None)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Chapter {
    fn from(s: String) -> Self {
        Chapter::named(&s)
    }
}

impl Serialize for Chapter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid chapter label: {0:?}")]
pub struct ParseChapterError(String);

impl FromStr for Chapter {
    type Err = ParseChapterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.contains('\n') {
            return Err(ParseChapterError(s.to_string()));
        }
        Ok(Chapter::named(s))
    }
}

/// Collection-level metadata shared by every record of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionMeta {
    pub title: String,
    pub author: String,
    pub dates: String,
}

impl CollectionMeta {
    pub fn new(title: &str, author: &str, dates: &str) -> Self {
        CollectionMeta {
            title: strip_newlines(title),
            author: strip_newlines(author),
            dates: strip_newlines(dates),
        }
    }
}

/// One verse of one book, the unit handed to the storage sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub book: String,
    pub language: String,
    pub author: String,
    pub dates: String,
    pub chapter: Chapter,
    pub verse: u32,
    pub passage: String,
    pub link: String,
}

impl Record {
    pub fn new(
        meta: &CollectionMeta,
        book: &str,
        chapter: &Chapter,
        verse: u32,
        passage: &str,
        link: &str,
    ) -> Self {
        Record {
            title: strip_newlines(&meta.title),
            book: strip_newlines(book),
            language: LANGUAGE.to_string(),
            author: strip_newlines(&meta.author),
            dates: strip_newlines(&meta.dates),
            chapter: chapter.clone(),
            verse,
            passage: collapse_line_breaks(passage),
            link: strip_newlines(link),
        }
    }
}

/// Remove line break characters from a metadata value.
pub fn strip_newlines(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Join the lines of a passage with single spaces.
pub fn collapse_line_breaks(s: &str) -> String {
    s.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("page not found: {0}")]
    NotFound(String),
    #[error("failed to read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal for the whole collection: no records of that collection are kept.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("{collection}: missing {what} on {locator}")]
    MissingElement {
        collection: String,
        locator: String,
        what: String,
    },
    #[error("{collection}: no book links left on {locator} after dropping {trailing} trailing links")]
    NoBookLinks {
        collection: String,
        locator: String,
        trailing: usize,
    },
    #[error("{collection}: {source}")]
    Source {
        collection: String,
        #[source]
        source: SourceError,
    },
}

impl CollectionError {
    pub fn missing(collection: &str, locator: &str, what: &str) -> Self {
        CollectionError::MissingElement {
            collection: collection.to_string(),
            locator: locator.to_string(),
            what: what.to_string(),
        }
    }
}
