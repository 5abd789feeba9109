// WHY: Canonical tokenized form of text and aliases so whole-word alias search reduces to
// plain substring search with surrounding spaces

use std::borrow::Cow;

/// Reduces a token to a base form
///
/// Tokens arrive without whitespace; the result must be non-empty and whitespace-free too.
pub trait Stemmer: Send + Sync {
    fn stem<'a>(&self, token: &'a str) -> Cow<'a, str>;
}

/// Strips regular English plural endings
/// WHY: acronyms and short tokens are left alone so abbreviations like "MS" or "US" survive stemming.
/// Lowercased text has no acronyms left, so there every long plural is reduced
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralStemmer;

impl Stemmer for PluralStemmer {
    fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if token.chars().count() <= 3 || !token.chars().any(char::is_lowercase) {
            return Cow::Borrowed(token);
        }

        if let Some(base) = token.strip_suffix("ies") {
            if base.chars().count() > 1 {
                return Cow::Owned(format!("{base}y"));
            }
        }
        if token.ends_with("sses")
            || token.ends_with("xes")
            || token.ends_with("ches")
            || token.ends_with("shes")
        {
            return Cow::Borrowed(&token[..token.len() - 2]);
        }
        if token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return Cow::Borrowed(&token[..token.len() - 1]);
        }
        Cow::Borrowed(token)
    }
}

/// One token of normalized text and the source bytes it was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Byte range in the normalized text
    pub start: usize,
    pub end: usize,
    /// Byte range in the input text
    pub source_start: usize,
    pub source_end: usize,
}

/// Normalized text with its token layout
///
/// The cased and lowercased forms of one text always have the same number of tokens with the
/// same source ranges, so token indices translate offsets between the forms even when stemming
/// makes the token texts differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    tokens: Vec<TokenSpan>,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tokens(&self) -> &[TokenSpan] {
        &self.tokens
    }

    /// Index of the token whose first byte is at `offset`
    pub fn token_starting_at(&self, offset: usize) -> Option<usize> {
        self.tokens.binary_search_by_key(&offset, |token| token.start).ok()
    }

    /// Index of the token ending (exclusive) at `offset`
    pub fn token_ending_at(&self, offset: usize) -> Option<usize> {
        self.tokens.binary_search_by_key(&offset, |token| token.end).ok()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Text normalization strategy
///
/// Implementors decide how text splits into tokens and may rewrite each token; joining,
/// padding, dot spacing and lowercasing are shared so every strategy produces the same layout.
pub trait Normalizer: Send + Sync {
    /// Split text into case-preserved, whitespace-free tokens with their byte offsets, in order
    fn tokens<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)>;

    /// Per-token rewrite applied last; lowercased output passes tokens in already lowercased
    fn rewrite<'a>(&self, token: Cow<'a, str>) -> Cow<'a, str> {
        token
    }

    /// Normalize with new allocation
    fn normalize(&self, text: &str, lowercase: bool) -> String {
        let mut buffer = String::with_capacity(text.len() + 2);
        self.normalize_into(text, lowercase, &mut buffer);
        buffer
    }

    /// Normalize into supplied buffer
    fn normalize_into(&self, text: &str, lowercase: bool, buffer: &mut String) {
        assemble_into(self, text, lowercase, buffer, None);
    }

    /// Normalize and keep the token layout for offset mapping
    fn normalize_with_spans(&self, text: &str, lowercase: bool) -> NormalizedText {
        let mut normalized = NormalizedText::default();
        normalized.text.reserve(text.len() + 2);
        assemble_into(self, text, lowercase, &mut normalized.text, Some(&mut normalized.tokens));
        normalized
    }
}

/// Punctuation-aware word tokens (default strategy)
#[derive(Debug, Clone, Copy, Default)]
pub struct WordNormalizer;

impl Normalizer for WordNormalizer {
    fn tokens<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        word_tokens(text)
    }
}

/// Whitespace-only tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceNormalizer;

impl Normalizer for WhitespaceNormalizer {
    fn tokens<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        whitespace_chunks(text)
    }
}

/// Word tokens reduced by a stemmer
#[derive(Debug, Clone, Copy, Default)]
pub struct StemmingNormalizer<S = PluralStemmer> {
    stemmer: S,
}

impl<S: Stemmer> StemmingNormalizer<S> {
    pub fn new(stemmer: S) -> Self {
        Self { stemmer }
    }
}

impl<S: Stemmer> Normalizer for StemmingNormalizer<S> {
    fn tokens<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        word_tokens(text)
    }

    fn rewrite<'a>(&self, token: Cow<'a, str>) -> Cow<'a, str> {
        match token {
            Cow::Borrowed(token) => self.stemmer.stem(token),
            Cow::Owned(token) => Cow::Owned(self.stemmer.stem(&token).into_owned()),
        }
    }
}

/// Normalize with one of the two standard strategies
pub fn normalize_text(text: &str, lowercase: bool, use_stemmer: bool) -> String {
    if use_stemmer {
        StemmingNormalizer::<PluralStemmer>::default().normalize(text, lowercase)
    } else {
        WordNormalizer.normalize(text, lowercase)
    }
}

/// Lowercase without moving any byte offset
/// WHY: without stemming the cased and lowercased forms then index identically, which keeps
/// uppercase-window checks and time-fragment lookups on plain byte offsets
pub fn lowercase_aligned(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        let mut lower = ch.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) if l.len_utf8() == ch.len_utf8() => result.push(l),
            _ => result.push(ch),
        }
    }
    result
}

/// Join tokens with single spaces, pad both ends, separate dots from following words
fn assemble_into<N: Normalizer + ?Sized>(
    normalizer: &N,
    text: &str,
    lowercase: bool,
    buffer: &mut String,
    mut spans: Option<&mut Vec<TokenSpan>>,
) {
    buffer.clear();
    if let Some(spans) = spans.as_mut() {
        spans.clear();
    }

    let tokens = normalizer.tokens(text);
    if tokens.is_empty() {
        return;
    }

    buffer.push(' ');
    for (offset, token) in tokens {
        for (piece_offset, piece) in split_after_dots(token) {
            let piece_text = if lowercase {
                Cow::Owned(lowercase_aligned(piece))
            } else {
                Cow::Borrowed(piece)
            };
            let rewritten = normalizer.rewrite(piece_text);

            let start = buffer.len();
            buffer.push_str(&rewritten);
            if let Some(spans) = spans.as_mut() {
                let source_start = offset + piece_offset;
                spans.push(TokenSpan {
                    start,
                    end: buffer.len(),
                    source_start,
                    source_end: source_start + piece.len(),
                });
            }
            buffer.push(' ');
        }
    }
}

/// Pieces of a token split after every dot that is followed by a letter
/// WHY: digits after a dot are decimals or clock fragments and stay attached
fn split_after_dots(token: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut chars = token.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if ch == '.' && chars.peek().is_some_and(|(_, next)| next.is_alphabetic()) {
            pieces.push((piece_start, &token[piece_start..=i]));
            piece_start = i + 1;
        }
    }
    pieces.push((piece_start, &token[piece_start..]));
    pieces
}

fn is_split_punctuation(ch: char) -> bool {
    matches!(
        ch,
        ',' | ';'
            | ':'
            | '!'
            | '?'
            | '"'
            | '\''
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '\u{AB}'
            | '\u{BB}'
            | '\u{201C}'
            | '\u{201D}'
            | '\u{2018}'
            | '\u{2019}'
    )
}

/// A trailing dot belongs to the word for initials ("J.") and dotted abbreviations ("U.S.")
fn keeps_trailing_dot(word: &str) -> bool {
    let Some(inner) = word.strip_suffix('.') else {
        return false;
    };
    if inner.is_empty() || inner.ends_with('.') {
        return false;
    }
    let mut chars = inner.chars();
    let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    single_letter || inner.contains('.')
}

/// Maximal runs of non-whitespace characters with their byte offsets
fn whitespace_chunks(text: &str) -> Vec<(usize, &str)> {
    let mut chunks = Vec::new();
    let mut chunk_start = None;
    for (i, ch) in text.char_indices() {
        match (ch.is_whitespace(), chunk_start) {
            (true, Some(start)) => {
                chunks.push((start, &text[start..i]));
                chunk_start = None;
            }
            (false, None) => chunk_start = Some(i),
            _ => {}
        }
    }
    if let Some(start) = chunk_start {
        chunks.push((start, &text[start..]));
    }
    chunks
}

fn word_tokens(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut trailing = Vec::new();

    for (chunk_offset, chunk) in whitespace_chunks(text) {
        let mut core = chunk;
        let mut core_offset = chunk_offset;

        while let Some(ch) = core.chars().next().filter(|c| is_split_punctuation(*c)) {
            let (head, rest) = core.split_at(ch.len_utf8());
            tokens.push((core_offset, head));
            core_offset += head.len();
            core = rest;
        }

        trailing.clear();
        while let Some(ch) = core.chars().next_back() {
            let split = is_split_punctuation(ch) || (ch == '.' && !keeps_trailing_dot(core));
            if !split {
                break;
            }
            let (rest, tail) = core.split_at(core.len() - ch.len_utf8());
            trailing.push((core_offset + rest.len(), tail));
            core = rest;
        }

        if !core.is_empty() {
            tokens.push((core_offset, core));
        }
        tokens.extend(trailing.iter().rev());
    }

    tokens
}
