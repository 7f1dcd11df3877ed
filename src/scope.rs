//! Lexical scope resolution: brackets, quotes, arguments, indentation blocks.
//!
//! Everything here is linear text scanning over a character snapshot of the
//! document; there is no parser. Each resolver either returns a range or
//! signals "no match" so the caller can fall through to the next heuristic,
//! and unbalanced input degrades to a no-op rather than an error.

use std::ops::Range;

use tracing::trace;

use crate::caret::Caret;
use crate::document::Document;
use crate::language::LanguageProfile;
use crate::util::{char_type, indent_width, is_blank, is_word_char, CharType};

/// How far the block resolver climbs looking for a header line
const BLOCK_CLIMB_LIMIT: usize = 200;

/// Lexical class of a character position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Code,
    StringDelim,
    StringBody,
    Comment,
}

/// One forward classification pass over the document.
///
/// Delimiter scans consult this map so that brackets inside string
/// literals and line comments are never treated as candidates.
#[derive(Debug)]
pub struct LexMap {
    classes: Vec<CharClass>,
    /// Quote literal spans as (open_delim, close_delim) indices
    strings: Vec<(usize, usize)>,
}

impl LexMap {
    /// Classify every character: string literals are single/double quoted
    /// with backslash escapes and terminate at end of line; comments run
    /// from the profile's introducer to end of line. Unterminated
    /// literals stay classified as code so scans degrade safely.
    pub fn scan(chars: &[char], profile: &LanguageProfile) -> Self {
        let comment: Vec<char> = profile.line_comment.chars().collect();
        let mut classes = vec![CharClass::Code; chars.len()];
        let mut strings = Vec::new();

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            if ch == '"' || ch == '\'' {
                let open = i;
                let mut j = i + 1;
                let mut close = None;
                while j < chars.len() && chars[j] != '\n' {
                    if chars[j] == '\\' {
                        if j + 1 >= chars.len() || chars[j + 1] == '\n' {
                            break;
                        }
                        j += 2;
                        continue;
                    }
                    if chars[j] == ch {
                        close = Some(j);
                        break;
                    }
                    j += 1;
                }
                if let Some(close) = close {
                    classes[open] = CharClass::StringDelim;
                    classes[close] = CharClass::StringDelim;
                    for class in classes.iter_mut().take(close).skip(open + 1) {
                        *class = CharClass::StringBody;
                    }
                    strings.push((open, close));
                    i = close + 1;
                } else {
                    i += 1;
                }
            } else if !comment.is_empty() && chars[i..].starts_with(&comment[..]) {
                while i < chars.len() && chars[i] != '\n' {
                    classes[i] = CharClass::Comment;
                    i += 1;
                }
            } else {
                i += 1;
            }
        }
        Self { classes, strings }
    }

    /// Whether position `i` participates in delimiter scans
    pub fn is_code(&self, i: usize) -> bool {
        self.classes.get(i).copied() == Some(CharClass::Code)
    }

    /// Innermost quote literal strictly containing `[start, end)`
    fn string_around(&self, start: usize, end: usize) -> Option<Scope> {
        self.strings
            .iter()
            .find(|(open, close)| *open < start && end <= *close)
            .map(|&(open, close)| Scope { open, close })
    }
}

/// A matched delimiter pair (bracket or quote)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Index of the opening delimiter
    pub open: usize,
    /// Index of the closing delimiter
    pub close: usize,
}

impl Scope {
    /// Content between the delimiters
    pub fn inner(&self) -> Range<usize> {
        self.open + 1..self.close
    }

    /// Content including both delimiters
    pub fn outer(&self) -> Range<usize> {
        self.open..self.close + 1
    }
}

fn close_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn open_for(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

fn is_open_bracket(ch: char) -> bool {
    close_for(ch).is_some()
}

fn is_close_bracket(ch: char) -> bool {
    open_for(ch).is_some()
}

fn is_bracket(ch: char) -> bool {
    is_open_bracket(ch) || is_close_bracket(ch)
}

/// Scan backward from a closing bracket to its opener. `from` must hold
/// the closing character. Returns None when depth never returns to zero.
fn scan_back_to_opener(chars: &[char], lex: &LexMap, from: usize, close_ch: char) -> Option<usize> {
    let open_ch = open_for(close_ch)?;
    let mut depth = 1usize;
    let mut i = from;
    while i > 0 {
        i -= 1;
        if !lex.is_code(i) {
            continue;
        }
        if chars[i] == close_ch {
            depth += 1;
        } else if chars[i] == open_ch {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Matching-bracket scan from a delimiter position: if `pos` holds a code
/// bracket, returns its `(open, close)` pair, maintaining a nesting depth
/// counter in the scan direction. None on non-delimiters and unbalanced
/// input.
pub fn pair_from(chars: &[char], lex: &LexMap, pos: usize) -> Option<(usize, usize)> {
    if pos >= chars.len() || !lex.is_code(pos) {
        return None;
    }
    let ch = chars[pos];
    if let Some(close_ch) = close_for(ch) {
        let mut depth = 0usize;
        for (i, &c) in chars.iter().enumerate().skip(pos) {
            if !lex.is_code(i) {
                continue;
            }
            if c == ch {
                depth += 1;
            } else if c == close_ch {
                depth -= 1;
                if depth == 0 {
                    return Some((pos, i));
                }
            }
        }
        None
    } else if is_close_bracket(ch) {
        scan_back_to_opener(chars, lex, pos, ch).map(|open| (open, pos))
    } else {
        None
    }
}

/// Nearest bracket or quote scope strictly containing `[start, end)`.
///
/// The backward scan skips balanced sibling regions and everything inside
/// literals and comments; the matched closer must sit at or beyond `end`.
pub fn enclosing_scope(chars: &[char], lex: &LexMap, start: usize, end: usize) -> Option<Scope> {
    if let Some(scope) = lex.string_around(start, end) {
        return Some(scope);
    }

    let mut i = start;
    while i > 0 {
        i -= 1;
        if !lex.is_code(i) {
            continue;
        }
        let ch = chars[i];
        if is_close_bracket(ch) {
            // Skip over the balanced sibling region ending here
            match scan_back_to_opener(chars, lex, i, ch) {
                Some(open) => {
                    i = open;
                    continue;
                }
                None => return None,
            }
        }
        if is_open_bracket(ch) {
            if let Some((open, close)) = pair_from(chars, lex, i) {
                if close >= end {
                    return Some(Scope { open, close });
                }
                // Closes before the range ends: not enclosing, keep looking
            }
            // Unmatched opener: ignore it
        }
    }
    None
}

/// The comma-delimited argument around `pos` within its enclosing bracket
/// scope, whitespace-trimmed. None outside bracket scopes and for empty
/// arguments.
pub fn argument_span(chars: &[char], lex: &LexMap, pos: usize) -> Option<Range<usize>> {
    let scope = enclosing_scope(chars, lex, pos, pos)?;
    if !is_open_bracket(chars[scope.open]) {
        return None;
    }

    let mut left = scope.open + 1;
    let mut depth = 0usize;
    let mut i = pos;
    while i > scope.open + 1 {
        i -= 1;
        if !lex.is_code(i) {
            continue;
        }
        let ch = chars[i];
        if is_close_bracket(ch) {
            depth += 1;
        } else if is_open_bracket(ch) {
            if depth == 0 {
                break;
            }
            depth -= 1;
        } else if ch == ',' && depth == 0 {
            left = i + 1;
            break;
        }
    }

    let mut right = scope.close;
    let mut depth = 0usize;
    let mut i = pos;
    while i < scope.close {
        if lex.is_code(i) {
            let ch = chars[i];
            if is_open_bracket(ch) {
                depth += 1;
            } else if is_close_bracket(ch) {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if ch == ',' && depth == 0 {
                right = i;
                break;
            }
        }
        i += 1;
    }

    while left < right && chars[left].is_whitespace() {
        left += 1;
    }
    while right > left && chars[right - 1].is_whitespace() {
        right -= 1;
    }
    if left >= right {
        None
    } else {
        Some(left..right)
    }
}

/// Indentation-delimited block around `line`.
///
/// The header is `line` itself when forced or marker-terminated, else the
/// nearest prior marker-terminated line with strictly smaller indentation.
/// The block runs through the last subsequent line indented strictly
/// deeper than the header; blank lines continue the block and count
/// toward its span.
pub fn block_span<D: Document + ?Sized>(
    doc: &D,
    line: usize,
    profile: &LanguageProfile,
    line_is_header: bool,
) -> Option<Range<usize>> {
    let text = doc.line_text(line)?;
    let header = if line_is_header || profile.line_ends_with_marker(&text) {
        line
    } else {
        let cur_indent = indent_width(&text);
        let mut found = None;
        let mut b = line;
        let mut tries = 0;
        while b > 0 && tries < BLOCK_CLIMB_LIMIT {
            b -= 1;
            tries += 1;
            let Some(t) = doc.line_text(b) else { break };
            if !is_blank(&t) && profile.line_ends_with_marker(&t) && indent_width(&t) < cur_indent {
                found = Some(b);
                break;
            }
        }
        found?
    };

    let header_text = doc.line_text(header)?;
    let header_indent = indent_width(&header_text);
    let mut last = header;
    let mut b = header + 1;
    while b < doc.line_count() {
        let Some(t) = doc.line_text(b) else { break };
        if !is_blank(&t) && indent_width(&t) <= header_indent {
            break;
        }
        last = b;
        b += 1;
    }
    Some(doc.line_start(header)..doc.line_end(last))
}

/// Contiguous same-class character run at `pos`, preferring a word run at
/// or immediately left of the caret, falling back to a punctuation run.
/// None on whitespace-only surroundings.
pub fn word_span(chars: &[char], pos: usize) -> Option<Range<usize>> {
    let at = chars.get(pos).map(|&c| char_type(c));
    let before = pos
        .checked_sub(1)
        .and_then(|i| chars.get(i))
        .map(|&c| char_type(c));

    let idx = if at == Some(CharType::WordChar) {
        pos
    } else if before == Some(CharType::WordChar) {
        pos - 1
    } else if at.is_some() && at != Some(CharType::Whitespace) {
        pos
    } else if before.is_some() && before != Some(CharType::Whitespace) {
        pos - 1
    } else {
        return None;
    };

    let target = char_type(chars[idx]);
    let mut start = idx;
    while start > 0 && char_type(chars[start - 1]) == target {
        start -= 1;
    }
    let mut end = idx + 1;
    while end < chars.len() && char_type(chars[end]) == target {
        end += 1;
    }
    Some(start..end)
}

// =============================================================================
// Per-caret expand/shrink
// =============================================================================

/// Expand one caret to the next syntactic level. None leaves it untouched.
pub fn expand_caret<D: Document + ?Sized>(
    doc: &D,
    chars: &[char],
    lex: &LexMap,
    profile: &LanguageProfile,
    caret: Caret,
) -> Option<Caret> {
    if caret.has_selection() {
        expand_from_selection(doc, chars, lex, profile, caret)
    } else {
        expand_from_caret(doc, chars, lex, profile, caret.position)
    }
}

fn expand_from_caret<D: Document + ?Sized>(
    doc: &D,
    chars: &[char],
    lex: &LexMap,
    profile: &LanguageProfile,
    pos: usize,
) -> Option<Caret> {
    let (line, _) = doc.offset_to_line_col(pos);
    let line_text = doc.line_text(line).unwrap_or_default();
    let at = chars.get(pos).copied();
    let before = pos.checked_sub(1).and_then(|i| chars.get(i)).copied();

    // Block-opening marker wins over everything else
    let on_marker = profile.marker_char().is_some() && at == profile.marker_char();
    if on_marker || profile.line_ends_with_marker(&line_text) {
        if let Some(range) = block_span(doc, line, profile, true) {
            return Some(Caret::from_range(range));
        }
    }

    // Separator inside a bracket scope selects the whole scope
    if at == Some(',') && lex.is_code(pos) {
        if let Some(scope) = enclosing_scope(chars, lex, pos, pos) {
            if is_open_bracket(chars[scope.open]) {
                return Some(Caret::from_range(scope.outer()));
            }
        }
    }

    // On a bracket right after an identifier the word was meant,
    // not the scope
    if at.is_some_and(is_bracket) && lex.is_code(pos) {
        if before.is_some_and(is_word_char) {
            if let Some(range) = word_span(chars, pos) {
                return Some(Caret::from_range(range));
            }
        } else if let Some((open, close)) = pair_from(chars, lex, pos) {
            return Some(Caret::from_range(open..close + 1));
        }
    }

    // On or adjacent to an identifier: the word
    if at.is_some_and(is_word_char) || before.is_some_and(is_word_char) {
        if let Some(range) = word_span(chars, pos) {
            return Some(Caret::from_range(range));
        }
    }

    // Nearest enclosing bracket/quote scope
    if let Some(scope) = enclosing_scope(chars, lex, pos, pos) {
        let range = if pos == scope.close || scope.inner().is_empty() {
            scope.outer()
        } else {
            scope.inner()
        };
        return Some(Caret::from_range(range));
    }

    trace!(pos, "no expansion heuristic matched");
    None
}

fn expand_from_selection<D: Document + ?Sized>(
    doc: &D,
    chars: &[char],
    lex: &LexMap,
    profile: &LanguageProfile,
    caret: Caret,
) -> Option<Caret> {
    let (start, end) = (caret.start(), caret.end());

    if let Some(scope) = enclosing_scope(chars, lex, start, end) {
        let inner = scope.inner();
        if start == inner.start && end == inner.end {
            // Inner content grows to the delimiters, absorbing a call
            // name and an import-style prefix for parenthesis scopes
            let mut out_start = scope.open;
            let out_end = scope.close + 1;
            if chars[scope.open] == '(' {
                out_start = absorb_call_name(chars, scope.open);
                if let Some(prefix) = absorb_import_prefix(doc, chars, scope.open) {
                    out_start = out_start.min(prefix);
                }
            }
            return Some(Caret::from_range(out_start..out_end));
        }
        return Some(Caret::from_range(inner));
    }

    let (start_line, _) = doc.offset_to_line_col(start);
    if let Some(range) = block_span(doc, start_line, profile, false) {
        if range.start != start || range.end != end {
            return Some(Caret::from_range(range));
        }
    }

    // Fallback: full lines covering the selection
    let (end_line, _) = doc.offset_to_line_col(end);
    Some(Caret::from_range(
        doc.line_start(start_line)..doc.line_end(end_line),
    ))
}

/// Start of the dotted identifier immediately preceding an opening paren
/// (`name(...)` selects as one unit). Returns `open` when there is none.
fn absorb_call_name(chars: &[char], open: usize) -> usize {
    let mut i = open;
    while i > 0 {
        let ch = chars[i - 1];
        if is_word_char(ch) || ch == '.' {
            i -= 1;
        } else {
            break;
        }
    }
    i
}

/// Start offset of a `from <ident> import`-shaped prefix on the opening
/// paren's line, if present.
fn absorb_import_prefix<D: Document + ?Sized>(
    doc: &D,
    chars: &[char],
    open: usize,
) -> Option<usize> {
    let (line, _) = doc.offset_to_line_col(open);
    let line_start = doc.line_start(line);

    let mut tokens: Vec<(usize, String)> = Vec::new();
    let mut i = line_start;
    while i < open {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        while i < open && !chars[i].is_whitespace() {
            i += 1;
        }
        tokens.push((start, chars[start..i].iter().collect()));
    }

    for w in 0..tokens.len().saturating_sub(2) {
        if tokens[w].1 == "from" && tokens[w + 2].1 == "import" {
            return Some(tokens[w].0);
        }
    }
    None
}

/// Shrink one caret: a selection reduces to the word at its start, a bare
/// caret selects its whole line content. Deliberately not the inverse of
/// [`expand_caret`].
pub fn shrink_caret<D: Document + ?Sized>(
    doc: &D,
    chars: &[char],
    caret: Caret,
) -> Option<Caret> {
    if caret.has_selection() {
        word_span(chars, caret.start()).map(Caret::from_range)
    } else {
        let (line, _) = doc.offset_to_line_col(caret.position);
        Some(Caret::span(doc.line_start(line), doc.line_end(line)))
    }
}
