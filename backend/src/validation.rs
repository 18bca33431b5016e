use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::types::{Chapter, Record};

/// A record that breaks one of the output invariants. `index` is the
/// position of the offending record in the checked sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("record {index}: verse {verse} after {previous} in {title} / {book} / {chapter}")]
    VerseNotIncreasing {
        index: usize,
        title: String,
        book: String,
        chapter: String,
        previous: u32,
        verse: u32,
    },
    #[error("record {index}: verse is zero")]
    ZeroVerse { index: usize },
    #[error("record {index}: empty chapter label")]
    EmptyChapter { index: usize },
    #[error("record {index}: line break in {field}")]
    LineBreak { index: usize, field: &'static str },
    #[error("record {index}: link {link} was not walked")]
    UnwalkedLink { index: usize, link: String },
}

/// Check verse order, chapter labels, line breaks and, when `walked_links`
/// is given, that every link is one of the walked book pages.
pub fn check_records(records: &[Record], walked_links: Option<&[String]>) -> Vec<InvariantViolation> {
    let mut violations: Vec<InvariantViolation> = Vec::new();
    let mut last_verse: HashMap<(&str, &str, &str), u32> = HashMap::new();
    let walked: Option<HashSet<&str>> = walked_links.map(|links| links.iter().map(|l| l.as_str()).collect());

    for (index, r) in records.iter().enumerate() {
        if r.verse == 0 {
            violations.push(InvariantViolation::ZeroVerse { index });
        }

        if let Chapter::Named(label) = &r.chapter {
            if label.trim().is_empty() {
                violations.push(InvariantViolation::EmptyChapter { index });
            }
        }

        let fields: [(&'static str, &str); 8] = [
            ("title", r.title.as_str()),
            ("book", r.book.as_str()),
            ("language", r.language.as_str()),
            ("author", r.author.as_str()),
            ("dates", r.dates.as_str()),
            ("chapter", r.chapter.as_str()),
            ("passage", r.passage.as_str()),
            ("link", r.link.as_str()),
        ];
        for (field, value) in fields {
            if value.contains(['\n', '\r']) {
                violations.push(InvariantViolation::LineBreak { index, field });
            }
        }

        let key = (r.title.as_str(), r.book.as_str(), r.chapter.as_str());
        if let Some(previous) = last_verse.insert(key, r.verse) {
            if r.verse <= previous {
                violations.push(InvariantViolation::VerseNotIncreasing {
                    index,
                    title: r.title.clone(),
                    book: r.book.clone(),
                    chapter: r.chapter.to_string(),
                    previous,
                    verse: r.verse,
                });
            }
        }

        if let Some(walked) = &walked {
            if !walked.contains(r.link.as_str()) {
                violations.push(InvariantViolation::UnwalkedLink { index, link: r.link.clone() });
            }
        }
    }

    violations
}
