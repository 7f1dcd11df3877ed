//! The collection of secondary carets and its creation policies.
//!
//! The primary caret belongs to the host editor's native cursor and is
//! never stored here; operations that need it take it as a parameter.
//! No two carets may share an identical `(start, end)` pair, but
//! partially overlapping carets are deliberately kept distinct.

use tracing::debug;

use crate::caret::Caret;
use crate::document::Document;
use crate::language::LanguageProfile;
use crate::scope::{self, LexMap};

/// Ordered list of secondary carets.
#[derive(Debug, Clone, Default)]
pub struct CaretSet {
    carets: Vec<Caret>,
}

impl CaretSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every secondary caret
    pub fn clear(&mut self) {
        if !self.carets.is_empty() {
            debug!(count = self.carets.len(), "clearing secondary carets");
        }
        self.carets.clear();
    }

    /// True iff at least one secondary caret exists
    pub fn has_multi(&self) -> bool {
        !self.carets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.carets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carets.is_empty()
    }

    pub fn carets(&self) -> &[Caret] {
        &self.carets
    }

    pub fn get(&self, index: usize) -> Option<Caret> {
        self.carets.get(index).copied()
    }

    /// Overwrite one caret in place (drag adjustment)
    pub fn set(&mut self, index: usize, caret: Caret) {
        if let Some(slot) = self.carets.get_mut(index) {
            *slot = caret;
        }
    }

    /// Replace the whole list (column-drag preview)
    pub fn replace_all(&mut self, carets: Vec<Caret>) {
        self.carets = carets;
    }

    /// Append a caret unless an identical `(start, end)` range exists
    pub fn push_or_merge(&mut self, caret: Caret) {
        if self.carets.iter().any(|c| c.key() == caret.key()) {
            return;
        }
        self.carets.push(caret);
    }

    /// Add a caret at `position`, optionally selecting the word under it
    /// or an explicit `(start, end)` range. Identical ranges merge
    /// instead of duplicating.
    pub fn add_at<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        position: usize,
        select_word: bool,
        selection: Option<(usize, usize)>,
    ) {
        let caret = if let Some((start, end)) = selection {
            Caret::span(start, end)
        } else if select_word {
            let chars: Vec<char> = doc.content().chars().collect();
            scope::word_span(&chars, position)
                .map(Caret::from_range)
                .unwrap_or(Caret::at(position))
        } else {
            Caret::at(position)
        };
        self.push_or_merge(caret);
    }

    /// Remove a zero-width caret exactly at `position` if present,
    /// otherwise add one. Returns true when a caret was added.
    pub fn toggle_at(&mut self, position: usize) -> bool {
        if let Some(idx) = self
            .carets
            .iter()
            .position(|c| !c.has_selection() && c.position == position)
        {
            self.carets.remove(idx);
            return false;
        }
        self.push_or_merge(Caret::at(position));
        true
    }

    /// Primary first, then secondaries in stored order, deduplicated by
    /// `(start, end)` identity.
    pub fn all_with_primary(&self, primary: Caret) -> Vec<Caret> {
        let mut unique: Vec<Caret> = Vec::with_capacity(self.carets.len() + 1);
        let mut seen: Vec<(usize, usize)> = Vec::with_capacity(self.carets.len() + 1);
        for caret in std::iter::once(primary).chain(self.carets.iter().copied()) {
            let key = caret.key();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            unique.push(caret);
        }
        unique
    }

    /// Add a caret on the line above every current caret (primary
    /// included). The column target is always the primary caret's column
    /// so alignment survives short and blank lines. Returns true when
    /// anything was added.
    pub fn add_above<D: Document + ?Sized>(&mut self, doc: &D, primary: Caret) -> bool {
        self.add_adjacent(doc, primary, true)
    }

    /// Mirror of [`Self::add_above`] for the line below.
    pub fn add_below<D: Document + ?Sized>(&mut self, doc: &D, primary: Caret) -> bool {
        self.add_adjacent(doc, primary, false)
    }

    fn add_adjacent<D: Document + ?Sized>(&mut self, doc: &D, primary: Caret, above: bool) -> bool {
        let (_, base_col) = doc.offset_to_line_col(primary.position);
        let mut new_carets = Vec::new();
        for caret in self.all_with_primary(primary) {
            let (line, _) = doc.offset_to_line_col(caret.position);
            let target = if above {
                match line.checked_sub(1) {
                    Some(l) => l,
                    None => continue,
                }
            } else {
                if line + 1 >= doc.line_count() {
                    continue;
                }
                line + 1
            };
            let col = base_col.min(doc.line_length(target));
            new_carets.push(Caret::at(doc.line_col_to_offset(target, col)));
        }
        let added = !new_carets.is_empty();
        for caret in new_carets {
            self.push_or_merge(caret);
        }
        added
    }

    /// One caret at the end of each line covered by the primary selection.
    /// Returns true when anything was added.
    pub fn add_at_line_ends<D: Document + ?Sized>(&mut self, doc: &D, primary: Caret) -> bool {
        let (start_line, _) = doc.offset_to_line_col(primary.start());
        let (end_line, _) = doc.offset_to_line_col(primary.end());
        let mut added = false;
        for line in start_line..=end_line {
            self.push_or_merge(Caret::at(doc.line_end(line)));
            added = true;
        }
        added
    }

    /// Expand every caret (primary included) to the next syntactic level.
    /// The first result becomes the new primary; the rest replace the
    /// secondary list.
    pub fn expand_selection<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        primary: &mut Caret,
        profile: &LanguageProfile,
    ) {
        self.resolve_each(doc, primary, profile, |doc, chars, lex, profile, caret| {
            scope::expand_caret(doc, chars, lex, profile, caret)
        });
    }

    /// Shrink every caret: selections reduce to the word at their start,
    /// bare carets select their whole line.
    pub fn shrink_selection<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        primary: &mut Caret,
        profile: &LanguageProfile,
    ) {
        self.resolve_each(doc, primary, profile, |doc, chars, _lex, _profile, caret| {
            scope::shrink_caret(doc, chars, caret)
        });
    }

    fn resolve_each<D, F>(&mut self, doc: &D, primary: &mut Caret, profile: &LanguageProfile, f: F)
    where
        D: Document + ?Sized,
        F: Fn(&D, &[char], &LexMap, &LanguageProfile, Caret) -> Option<Caret>,
    {
        let chars: Vec<char> = doc.content().chars().collect();
        let lex = LexMap::scan(&chars, profile);

        let mut resolved = Vec::new();
        for caret in self.all_with_primary(*primary) {
            resolved.push(f(doc, &chars, &lex, profile, caret).unwrap_or(caret));
        }
        let mut iter = resolved.into_iter();
        if let Some(first) = iter.next() {
            *primary = first;
        }
        self.carets = iter.collect();
    }
}
