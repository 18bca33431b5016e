//! Per-collection parsing configuration.
//!
//! Each Latin Library collection differs in where its metadata sits, how its
//! book pages lay out their text and how verses are numbered. The generic
//! pipeline in `parser` reads all of that from a `CollectionConfig`, with
//! irregular book pages listed as sparse `BookException` overrides.
//!
//! The fixed offsets below (elements skipped at the head and tail of a page)
//! are tied to the current upstream markup and are the first thing to check
//! when a collection stops parsing.

use crate::tokenizer::{NumberingConvention, Tokenizer};
use crate::URL_ROOT;

/// Where a piece of collection metadata is read from on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaSource {
    Fixed(&'static str),
    /// Text of `<title>`.
    PageTitle,
    /// Text of the first element with this tag.
    FirstElement(&'static str),
    /// One line of the first element with this class.
    ClassLine { class: &'static str, line: usize },
    /// Text of the first element with this class.
    ClassText(&'static str),
}

/// How the display name of a book is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookNameSource {
    /// Text of the index page link.
    LinkText,
    /// The book page `<title>` minus a fixed-length prefix. With `first_books`
    /// set, only that many leading books are renamed, the rest keep the link text.
    PageTitle { skip_chars: usize, first_books: Option<usize> },
}

/// A slice of a list by fixed counts from each end, `take` limits the length
/// after the head is skipped. Out-of-range counts give an empty slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub skip_head: usize,
    pub skip_tail: usize,
    pub take: Option<usize>,
}

impl Region {
    pub const fn trim(skip_head: usize, skip_tail: usize) -> Self {
        Region { skip_head, skip_tail, take: None }
    }

    pub const fn take(skip_head: usize, take: usize) -> Self {
        Region { skip_head, skip_tail: 0, take: Some(take) }
    }

    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.skip_head.min(items.len());
        let mut end = items.len().saturating_sub(self.skip_tail);
        if let Some(n) = self.take {
            end = end.min(start.saturating_add(n));
        }
        if end <= start {
            return &[];
        }
        &items[start..end]
    }
}

/// Which part of a book page holds the passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLayout {
    /// Each `<p>` in the region is one block.
    Paragraphs(Region),
    /// Each `<p>` in the region is split into lines, dropping its first and
    /// last line, and every line is one block.
    ParagraphLines(Region),
    /// The visible text of the whole page, trimmed and split into lines.
    DocumentLines(Region),
}

impl ContentLayout {
    pub fn region(&self) -> Region {
        match self {
            ContentLayout::Paragraphs(r) | ContentLayout::ParagraphLines(r) | ContentLayout::DocumentLines(r) => *r,
        }
    }

    pub fn with_region(&self, region: Region) -> Self {
        match self {
            ContentLayout::Paragraphs(_) => ContentLayout::Paragraphs(region),
            ContentLayout::ParagraphLines(_) => ContentLayout::ParagraphLines(region),
            ContentLayout::DocumentLines(_) => ContentLayout::DocumentLines(region),
        }
    }
}

/// How a paragraph with a bold child becomes a chapter label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterLabel {
    /// Text of the bold element.
    Emphasis,
    /// Text of the whole paragraph.
    WholeBlock,
    /// Bold text is not a heading, every paragraph is passage text.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookRule {
    /// Add a newline after each `<br>` before parsing the page.
    ReinsertLineBreaks,
    /// Append numeral-only lines to the line before them.
    MergeDetachedNumerals,
    /// The first two blocks are a chapter label and its first passage.
    LeadingChapterPair,
    Region(Region),
    Tokenizer(Tokenizer),
    ChapterLabel(ChapterLabel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookException {
    /// 0-based positions of the books in the index page link list.
    pub books: Vec<usize>,
    pub rules: Vec<BookRule>,
}

impl BookException {
    pub fn new(books: impl IntoIterator<Item = usize>, rules: &[BookRule]) -> Self {
        BookException {
            books: books.into_iter().collect(),
            rules: rules.to_vec(),
        }
    }
}

/// The effective settings for one book after exceptions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookPlan {
    pub layout: ContentLayout,
    pub tokenizer: Tokenizer,
    pub chapter_label: ChapterLabel,
    pub strip_speaker_prefixes: bool,
    pub reinsert_line_breaks: bool,
    pub merge_detached_numerals: bool,
    pub leading_chapter_pair: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Index page name, `www.thelatinlibrary.com/<slug>.html`.
    pub slug: &'static str,
    /// Directory of the book pages on the site.
    pub book_dir: &'static str,
    pub expected_books: usize,
    pub title: MetaSource,
    pub author: MetaSource,
    pub dates: MetaSource,
    /// Administrative links at the end of the index page which are not books.
    pub trailing_links: usize,
    pub book_name: BookNameSource,
    /// `(from, to)` substitution applied to book names.
    pub label_rewrite: Option<(&'static str, &'static str)>,
    pub layout: ContentLayout,
    pub tokenizer: Tokenizer,
    pub chapter_label: ChapterLabel,
    pub strip_speaker_prefixes: bool,
    pub exceptions: Vec<BookException>,
}

impl CollectionConfig {
    pub fn index_locator(&self) -> String {
        format!("{}{}.html", URL_ROOT, self.slug)
    }

    pub fn plan_for(&self, book_index: usize) -> BookPlan {
        let mut plan = BookPlan {
            layout: self.layout,
            tokenizer: self.tokenizer,
            chapter_label: self.chapter_label,
            strip_speaker_prefixes: self.strip_speaker_prefixes,
            reinsert_line_breaks: false,
            merge_detached_numerals: false,
            leading_chapter_pair: false,
        };

        for exception in self.exceptions.iter().filter(|e| e.books.contains(&book_index)) {
            for rule in exception.rules.iter() {
                match rule {
                    BookRule::ReinsertLineBreaks => plan.reinsert_line_breaks = true,
                    BookRule::MergeDetachedNumerals => plan.merge_detached_numerals = true,
                    BookRule::LeadingChapterPair => plan.leading_chapter_pair = true,
                    BookRule::Region(r) => plan.layout = plan.layout.with_region(*r),
                    BookRule::Tokenizer(t) => plan.tokenizer = *t,
                    BookRule::ChapterLabel(c) => plan.chapter_label = *c,
                }
            }
        }

        plan
    }

    /// Book display name with the collection's label rewrite applied.
    pub fn rewrite_label(&self, name: &str) -> String {
        match self.label_rewrite {
            Some((from, to)) if name.contains(from) => name.replace(from, to),
            _ => name.to_string(),
        }
    }
}

pub fn cassiodorus() -> CollectionConfig {
    CollectionConfig {
        slug: "cassiodorus",
        book_dir: "cassiodorus/",
        expected_books: 17,
        title: MetaSource::PageTitle,
        author: MetaSource::ClassLine { class: "pagehead", line: 0 },
        dates: MetaSource::ClassLine { class: "pagehead", line: 1 },
        trailing_links: 3,
        // "Cassiodorus: Variae I" -> "Variae I"
        book_name: BookNameSource::PageTitle { skip_chars: 13, first_books: Some(13) },
        label_rewrite: None,
        layout: ContentLayout::Paragraphs(Region::trim(2, 2)),
        tokenizer: Tokenizer::new(NumberingConvention::Bracketed).synthesize_missing_marker(),
        chapter_label: ChapterLabel::Emphasis,
        strip_speaker_prefixes: false,
        exceptions: vec![
            // Orationum Reliquiae
            BookException::new([14], &[
                BookRule::Tokenizer(Tokenizer::new(NumberingConvention::Counted)),
                BookRule::ChapterLabel(ChapterLabel::Ignore),
            ]),
            // De Musica
            BookException::new([16], &[
                BookRule::Tokenizer(Tokenizer::new(NumberingConvention::Dotted)),
            ]),
        ],
    }
}

pub fn statius() -> CollectionConfig {
    CollectionConfig {
        slug: "statius",
        book_dir: "statius/",
        expected_books: 19,
        title: MetaSource::PageTitle,
        author: MetaSource::FirstElement("h1"),
        dates: MetaSource::ClassText("date"),
        trailing_links: 2,
        // "Statius: Thebaid I" -> "Thebaid I"
        book_name: BookNameSource::PageTitle { skip_chars: 9, first_books: None },
        label_rewrite: None,
        layout: ContentLayout::ParagraphLines(Region::take(2, 1)),
        tokenizer: Tokenizer::new(NumberingConvention::LineNumeral),
        chapter_label: ChapterLabel::WholeBlock,
        strip_speaker_prefixes: false,
        exceptions: vec![
            // Silvae
            BookException::new(12..=16, &[
                BookRule::Region(Region::trim(2, 1)),
                BookRule::LeadingChapterPair,
            ]),
            BookException::new([13, 16], &[BookRule::ReinsertLineBreaks]),
        ],
    }
}

pub fn vergil() -> CollectionConfig {
    CollectionConfig {
        slug: "verg",
        book_dir: "vergil/",
        expected_books: 26,
        title: MetaSource::PageTitle,
        author: MetaSource::FirstElement("h1"),
        dates: MetaSource::FirstElement("h2"),
        trailing_links: 2,
        book_name: BookNameSource::LinkText,
        label_rewrite: Some(("Liber", "Georgicon")),
        layout: ContentLayout::DocumentLines(Region::trim(9, 5)),
        tokenizer: Tokenizer::new(NumberingConvention::LineNumeral),
        chapter_label: ChapterLabel::Ignore,
        strip_speaker_prefixes: true,
        exceptions: vec![
            BookException::new((16..=21).chain([24, 25]), &[BookRule::ReinsertLineBreaks]),
        ],
    }
}

pub fn silius() -> CollectionConfig {
    CollectionConfig {
        slug: "silius",
        book_dir: "silius/",
        expected_books: 17,
        title: MetaSource::Fixed("Silius"),
        author: MetaSource::FirstElement("h1"),
        dates: MetaSource::FirstElement("h2"),
        trailing_links: 2,
        book_name: BookNameSource::LinkText,
        label_rewrite: Some(("Liber", "Punica")),
        layout: ContentLayout::DocumentLines(Region::trim(9, 6)),
        tokenizer: Tokenizer::new(NumberingConvention::LineNumeral),
        chapter_label: ChapterLabel::Ignore,
        strip_speaker_prefixes: false,
        exceptions: vec![
            BookException::new([15, 16], &[BookRule::MergeDetachedNumerals]),
        ],
    }
}

/// All collections in aggregation order.
pub fn all_collections() -> Vec<CollectionConfig> {
    vec![cassiodorus(), statius(), vergil(), silius()]
}

pub fn find_collection(slug: &str) -> Option<CollectionConfig> {
    all_collections().into_iter().find(|c| c.slug == slug)
}
