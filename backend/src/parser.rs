//! The generic collection parser.
//!
//! One pass per collection: read the index page metadata, enumerate the book
//! links, then walk every book page with the plan its `CollectionConfig`
//! resolves for it. Any structural problem aborts the whole collection.

use tracing::{debug, info};

use crate::collections::{BookNameSource, BookPlan, ChapterLabel, CollectionConfig, ContentLayout, MetaSource};
use crate::document::{Document, Node};
use crate::page_source::PageSource;
use crate::tokenizer::{merge_detached_numerals, strip_speaker_prefix, NumberingConvention, Segment, Tokenized, Tokenizer};
use crate::types::{Chapter, CollectionError, CollectionMeta, Record};
use crate::URL_ROOT;

/// Paragraph blocks this short after trimming are layout noise.
pub const NEAR_EMPTY_BLOCK_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLink {
    /// Link text on the index page.
    pub name: String,
    pub href: String,
    /// `www.thelatinlibrary.com/<href>`
    pub locator: String,
}

pub fn parse_collection(config: &CollectionConfig, source: &dyn PageSource) -> Result<Vec<Record>, CollectionError> {
    parse_collection_with_links(config, source).map(|(records, _)| records)
}

/// Like `parse_collection`, also returning the book links that were walked.
pub fn parse_collection_with_links(
    config: &CollectionConfig,
    source: &dyn PageSource,
) -> Result<(Vec<Record>, Vec<BookLink>), CollectionError> {
    let index_locator = config.index_locator();
    let doc = load_document(config, source, &index_locator, false)?;

    let meta = read_meta(config, &doc, &index_locator)?;
    let links = book_links(config, &doc, &index_locator)?;

    info!("{}: {} books, title '{}'", config.slug, links.len(), meta.title);

    let mut records: Vec<Record> = Vec::new();
    for (book_index, link) in links.iter().enumerate() {
        let book_records = parse_book(config, source, &meta, book_index, link)?;
        debug!("{}: book {} '{}' gave {} records", config.slug, book_index, link.name, book_records.len());
        records.extend(book_records);
    }

    Ok((records, links))
}

fn load_document(
    config: &CollectionConfig,
    source: &dyn PageSource,
    locator: &str,
    line_breaks: bool,
) -> Result<Document, CollectionError> {
    let bytes = source.load(locator).map_err(|e| CollectionError::Source {
        collection: config.slug.to_string(),
        source: e,
    })?;
    let doc = Document::from_bytes_with(&bytes, line_breaks);
    if doc.had_decode_errors() {
        debug!("{}: replaced undecodable bytes in {}", config.slug, locator);
    }
    Ok(doc)
}

pub fn read_meta(config: &CollectionConfig, doc: &Document, locator: &str) -> Result<CollectionMeta, CollectionError> {
    let read = |source: &MetaSource, what: &str| -> Result<String, CollectionError> {
        read_meta_value(doc, source)
            .ok_or_else(|| CollectionError::missing(config.slug, locator, &format!("{} ({})", what, describe(source))))
    };

    let title = read(&config.title, "title")?;
    let author = read(&config.author, "author")?;
    let dates = read(&config.dates, "dates")?;

    Ok(CollectionMeta::new(&title, &author, &strip_enclosing(&dates)))
}

fn read_meta_value(doc: &Document, source: &MetaSource) -> Option<String> {
    match source {
        MetaSource::Fixed(s) => Some(s.to_string()),
        MetaSource::PageTitle => doc.title(),
        MetaSource::FirstElement(tag) => doc.first(tag).map(|n| doc.text_of(n).trim().to_string()),
        MetaSource::ClassText(class) => doc
            .find_by_class(class)
            .first()
            .map(|n| doc.text_of(*n).trim().to_string()),
        MetaSource::ClassLine { class, line } => doc.find_by_class(class).first().and_then(|n| {
            doc.text_of(*n)
                .trim()
                .split('\n')
                .nth(*line)
                .map(|l| l.trim().to_string())
        }),
    }
}

fn describe(source: &MetaSource) -> String {
    match source {
        MetaSource::Fixed(s) => format!("fixed '{}'", s),
        MetaSource::PageTitle => "<title>".to_string(),
        MetaSource::FirstElement(tag) => format!("<{}>", tag),
        MetaSource::ClassText(class) => format!(".{}", class),
        MetaSource::ClassLine { class, line } => format!(".{} line {}", class, line),
    }
}

/// Remove one enclosing pair of brackets, `(c. 45 - c. 96 A.D.)` -> `c. 45 - c. 96 A.D.`
pub fn strip_enclosing(s: &str) -> String {
    let s = s.trim();
    for (open, close) in [('(', ')'), ('[', ']')] {
        if let Some(inner) = s.strip_prefix(open).and_then(|r| r.strip_suffix(close)) {
            return inner.trim().to_string();
        }
    }
    s.to_string()
}

/// All index page links except the collection's trailing administrative ones.
pub fn book_links(config: &CollectionConfig, doc: &Document, locator: &str) -> Result<Vec<BookLink>, CollectionError> {
    let anchors = doc.find_all("a");
    if anchors.len() <= config.trailing_links {
        return Err(CollectionError::NoBookLinks {
            collection: config.slug.to_string(),
            locator: locator.to_string(),
            trailing: config.trailing_links,
        });
    }

    let book_anchors = &anchors[..anchors.len() - config.trailing_links];
    let mut links: Vec<BookLink> = Vec::with_capacity(book_anchors.len());

    for (n, a) in book_anchors.iter().enumerate() {
        let href = doc
            .attr(*a, "href")
            .ok_or_else(|| CollectionError::missing(config.slug, locator, &format!("href of link {}", n)))?;
        links.push(BookLink {
            name: doc.text_of(*a).trim().to_string(),
            href: href.to_string(),
            locator: format!("{}{}", URL_ROOT, href.trim_start_matches('/')),
        });
    }

    Ok(links)
}

/// Running state while walking one book page.
struct BookWalk<'a> {
    meta: &'a CollectionMeta,
    book: String,
    link: &'a str,
    chapter: Chapter,
    next_verse: u32,
    records: Vec<Record>,
}

impl<'a> BookWalk<'a> {
    fn new(meta: &'a CollectionMeta, book: String, link: &'a str) -> Self {
        BookWalk {
            meta,
            book,
            link,
            chapter: Chapter::None,
            next_verse: 1,
            records: Vec::new(),
        }
    }

    fn start_chapter(&mut self, label: &str) {
        self.chapter = Chapter::named(label);
        self.next_verse = 1;
    }

    fn emit(&mut self, tokenized: Tokenized) {
        self.next_verse = tokenized.next_verse;
        for segment in tokenized.segments {
            self.push(segment);
        }
    }

    fn push(&mut self, segment: Segment) {
        self.records.push(Record::new(
            self.meta,
            &self.book,
            &self.chapter,
            segment.verse,
            &segment.passage,
            self.link,
        ));
    }
}

fn parse_book(
    config: &CollectionConfig,
    source: &dyn PageSource,
    meta: &CollectionMeta,
    book_index: usize,
    link: &BookLink,
) -> Result<Vec<Record>, CollectionError> {
    let plan = config.plan_for(book_index);
    let doc = load_document(config, source, &link.locator, plan.reinsert_line_breaks)?;

    let book = book_name(config, &doc, book_index, link)?;
    let mut walk = BookWalk::new(meta, book, &link.locator);

    match plan.layout {
        ContentLayout::Paragraphs(region) | ContentLayout::ParagraphLines(region) => {
            let paragraphs = doc.find_all("p");
            let mut blocks = region.apply(&paragraphs);

            if plan.leading_chapter_pair {
                if blocks.len() < 2 {
                    return Err(CollectionError::missing(config.slug, &link.locator, "leading chapter and passage paragraphs"));
                }
                walk.start_chapter(&doc.text_of(blocks[0]));
                walk.emit(Tokenizer::new(NumberingConvention::Counted).tokenize(&doc.text_of(blocks[1]), 1));
                blocks = &blocks[2..];
            }

            walk_paragraphs(&doc, &plan, blocks, &mut walk);
        }

        ContentLayout::DocumentLines(region) => {
            let text = doc.text();
            let all_lines: Vec<String> = text.trim().split('\n').map(|l| l.to_string()).collect();
            let mut lines: Vec<String> = region.apply(&all_lines).to_vec();

            if plan.strip_speaker_prefixes {
                lines = lines.iter().map(|l| strip_speaker_prefix(l)).collect();
            }
            if plan.merge_detached_numerals {
                lines = merge_detached_numerals(&lines);
            }

            for line in lines.iter() {
                let tokenized = plan.tokenizer.tokenize(line, walk.next_verse);
                walk.emit(tokenized);
            }
        }
    }

    Ok(walk.records)
}

fn walk_paragraphs(doc: &Document, plan: &BookPlan, blocks: &[Node<'_>], walk: &mut BookWalk<'_>) {
    for p in blocks {
        let text = doc.text_of(*p);

        if plan.chapter_label != ChapterLabel::Ignore {
            if let Some(bold) = doc.find_emphasis_child(*p) {
                let label = match plan.chapter_label {
                    ChapterLabel::Emphasis => doc.text_of(bold),
                    _ => text.clone(),
                };
                walk.start_chapter(&label);
                continue;
            }
        }

        if text.trim().chars().count() <= NEAR_EMPTY_BLOCK_LEN {
            continue;
        }

        match plan.layout {
            ContentLayout::ParagraphLines(_) => {
                let lines: Vec<&str> = text.split('\n').collect();
                // The first and last line of each paragraph are the markup's own line breaks.
                let inner: &[&str] = if lines.len() > 2 { &lines[1..lines.len() - 1] } else { &[] };
                for line in inner {
                    let tokenized = plan.tokenizer.tokenize(line, walk.next_verse);
                    walk.emit(tokenized);
                }
            }
            _ => {
                let tokenized = plan.tokenizer.tokenize(&text, walk.next_verse);
                walk.emit(tokenized);
            }
        }
    }
}

fn book_name(config: &CollectionConfig, doc: &Document, book_index: usize, link: &BookLink) -> Result<String, CollectionError> {
    let name = match config.book_name {
        BookNameSource::LinkText => link.name.clone(),
        BookNameSource::PageTitle { skip_chars, first_books } => {
            if first_books.is_none_or(|n| book_index < n) {
                let title = doc
                    .title()
                    .ok_or_else(|| CollectionError::missing(config.slug, &link.locator, "<title>"))?;
                title.chars().skip(skip_chars).collect::<String>().trim().to_string()
            } else {
                link.name.clone()
            }
        }
    };

    Ok(config.rewrite_label(&name))
}
