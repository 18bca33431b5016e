use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_BRACKETED: Regex = Regex::new(r"\[([0-9]*)\]").unwrap();
    static ref RE_DOTTED: Regex = Regex::new(r"([0-9]+)\.").unwrap();
    static ref RE_NUMERAL: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// How verse boundaries are marked in a block of passage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingConvention {
    /// `[12] text`
    Bracketed,
    /// `12. text`
    Dotted,
    /// One passage per line, a bare numeral on the line gives its verse number.
    LineNumeral,
    /// No numbering in the text, every block is the next verse.
    Counted,
}

/// What happens to text in front of the first verse marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadingText {
    /// Page preamble, dropped.
    Discard,
    /// An unmarked first passage, numbered from the running counter.
    Synthesize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub verse: u32,
    pub passage: String,
}

impl Segment {
    pub fn new(verse: u32, passage: &str) -> Self {
        Segment { verse, passage: passage.to_string() }
    }
}

/// Segments of one block and the counter value for the next unmarked passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub segments: Vec<Segment>,
    pub next_verse: u32,
}

impl Tokenized {
    fn new(next_verse: u32) -> Self {
        Tokenized { segments: Vec::new(), next_verse }
    }

    /// Whitespace-only text is dropped without touching the counter.
    /// An explicit number always wins over the counter, even when it is
    /// lower. The counter stops at `u32::MAX`.
    fn push(&mut self, explicit: Option<u32>, text: &str) {
        let passage = text.trim();
        if passage.is_empty() {
            return;
        }
        let verse = explicit.filter(|n| *n > 0).unwrap_or(self.next_verse);
        self.segments.push(Segment::new(verse, passage));
        self.next_verse = verse.saturating_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    pub convention: NumberingConvention,
    pub leading: LeadingText,
}

impl Tokenizer {
    pub const fn new(convention: NumberingConvention) -> Self {
        Tokenizer { convention, leading: LeadingText::Discard }
    }

    /// Number unmarked leading text from the counter instead of dropping it.
    pub const fn synthesize_missing_marker(self) -> Self {
        Tokenizer { convention: self.convention, leading: LeadingText::Synthesize }
    }

    /// Split a block into (verse, passage) segments.
    ///
    /// `next_verse` is the number an unmarked passage receives, the updated
    /// value is returned with the segments for the caller to thread into the
    /// next block.
    pub fn tokenize(&self, block: &str, next_verse: u32) -> Tokenized {
        match self.convention {
            NumberingConvention::Bracketed => self.split_on_markers(block, &RE_BRACKETED, next_verse),
            NumberingConvention::Dotted => self.split_on_markers(block, &RE_DOTTED, next_verse),
            NumberingConvention::LineNumeral => split_lines(block, next_verse),
            NumberingConvention::Counted => {
                let mut out = Tokenized::new(next_verse);
                out.push(None, block);
                out
            }
        }
    }

    fn split_on_markers(&self, block: &str, re: &Regex, next_verse: u32) -> Tokenized {
        let block = block.trim();
        let mut out = Tokenized::new(next_verse);

        // (marker start, marker end, number)
        let markers: Vec<(usize, usize, Option<u32>)> = re
            .captures_iter(block)
            .filter_map(|cap| {
                let m = cap.get(0)?;
                let number = cap.get(1).and_then(|n| n.as_str().parse::<u32>().ok());
                Some((m.start(), m.end(), number))
            })
            .collect();

        let first_start = markers.first().map(|m| m.0).unwrap_or(block.len());
        if first_start > 0 && self.leading == LeadingText::Synthesize {
            out.push(None, &block[..first_start]);
        }

        for (i, (_, end, number)) in markers.iter().enumerate() {
            let until = markers.get(i + 1).map(|m| m.0).unwrap_or(block.len());
            out.push(*number, &block[*end..until]);
        }

        out
    }
}

fn split_lines(block: &str, next_verse: u32) -> Tokenized {
    let mut out = Tokenized::new(next_verse);

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match RE_NUMERAL.find(line) {
            Some(m) => {
                let number = m.as_str().parse::<u32>().ok();
                let before = line[..m.start()].trim();
                let passage = if before.is_empty() { line[m.end()..].trim() } else { before };
                out.push(number, passage);
            }
            None => out.push(None, line),
        }
    }

    out
}

/// Speaker names in eclogues sit on lines indented by ten or more spaces.
/// Strip the indentation and the capitalised name running from the first
/// character through the following lowercase letters.
pub fn strip_speaker_prefix(line: &str) -> String {
    let indent = line.chars().take_while(|c| c.is_whitespace()).count();
    if indent < 10 {
        return line.to_string();
    }

    let trimmed = line.trim();
    let name_len: usize = trimmed
        .char_indices()
        .skip(1)
        .find(|(_, c)| !c.is_lowercase())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    trimmed[name_len..].trim().to_string()
}

/// Append every numeral-only line to the line before it, for pages where the
/// verse number sits detached on its own line.
pub fn merge_detached_numerals(lines: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        let trimmed = line.trim();
        let is_numeral = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());
        match merged.last_mut() {
            Some(prev) if is_numeral => prev.push_str(trimmed),
            _ => merged.push(line.clone()),
        }
    }

    merged
}
