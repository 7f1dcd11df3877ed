//! Occurrence matching: add the next identical span, or all of them.

use tracing::debug;

use crate::caret::Caret;
use crate::caret_set::CaretSet;
use crate::document::Document;
use crate::scope::word_span;

/// Select the word under a bare primary caret. Returns false when there
/// is nothing selectable at the caret.
fn select_word_under<D: Document + ?Sized>(doc: &D, primary: &mut Caret) -> bool {
    let chars: Vec<char> = doc.content().chars().collect();
    match word_span(&chars, primary.position) {
        Some(range) => {
            *primary = Caret::from_range(range);
            true
        }
        None => false,
    }
}

/// Add the next occurrence of the primary selection as a secondary caret,
/// wrapping to document start when no forward match exists. A bare
/// primary selects the word under it first, then the search runs from
/// that selection's end. Returns true when caret state changed.
pub fn select_next_occurrence<D: Document + ?Sized>(
    doc: &D,
    primary: &mut Caret,
    set: &mut CaretSet,
) -> bool {
    let mut changed = false;
    if !primary.has_selection() {
        if !select_word_under(doc, primary) {
            return false;
        }
        changed = true;
    }

    let needle = doc.slice(primary.range());
    if needle.is_empty() {
        return changed;
    }

    let found = doc
        .find_forward(&needle, primary.end())
        .or_else(|| doc.find_from_start(&needle));
    match found {
        // Wrapping all the way around to the primary itself adds nothing
        Some((start, end)) if (start, end) != primary.key() => {
            set.push_or_merge(Caret::span(start, end));
            changed = true;
        }
        _ => debug!(%needle, "no further occurrence"),
    }
    changed
}

/// Replace the whole caret set with every occurrence of the primary
/// selection: the match equal to the current primary range stays primary,
/// every other one becomes a secondary. Returns true when caret state
/// changed.
pub fn select_all_occurrences<D: Document + ?Sized>(
    doc: &D,
    primary: &mut Caret,
    set: &mut CaretSet,
) -> bool {
    if !primary.has_selection() && !select_word_under(doc, primary) {
        return false;
    }

    let needle = doc.slice(primary.range());
    if needle.is_empty() {
        return false;
    }

    set.clear();
    let current = primary.key();
    let mut kept_primary = false;
    for (start, end) in doc.find_all(&needle) {
        if !kept_primary && (start, end) == current {
            kept_primary = true;
        } else {
            set.push_or_merge(Caret::span(start, end));
        }
    }
    debug!(%needle, count = set.len() + 1, "selected all occurrences");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RopeDocument;

    #[test]
    fn test_bare_caret_selects_word_then_matches() {
        let doc = RopeDocument::from_text("foo bar foo");
        let mut primary = Caret::at(1);
        let mut set = CaretSet::new();

        assert!(select_next_occurrence(&doc, &mut primary, &mut set));
        assert_eq!(primary.key(), (0, 3), "word under the caret is selected");
        assert_eq!(
            set.carets(),
            &[Caret::span(8, 11)],
            "the search runs in the same invocation"
        );
    }

    #[test]
    fn test_next_occurrence_appends() {
        let doc = RopeDocument::from_text("foo bar foo");
        let mut primary = Caret::span(0, 3);
        let mut set = CaretSet::new();

        assert!(select_next_occurrence(&doc, &mut primary, &mut set));
        assert_eq!(set.carets(), &[Caret::span(8, 11)]);
    }

    #[test]
    fn test_next_occurrence_wraps() {
        let doc = RopeDocument::from_text("foo bar foo");
        let mut primary = Caret::span(8, 11);
        let mut set = CaretSet::new();

        assert!(select_next_occurrence(&doc, &mut primary, &mut set));
        assert_eq!(set.carets(), &[Caret::span(0, 3)]);
    }

    #[test]
    fn test_sole_occurrence_does_not_duplicate() {
        let doc = RopeDocument::from_text("unique word");
        let mut primary = Caret::span(0, 6);
        let mut set = CaretSet::new();

        assert!(!select_next_occurrence(&doc, &mut primary, &mut set));
        assert!(set.is_empty());
    }

    #[test]
    fn test_select_all_keeps_matching_primary() {
        let doc = RopeDocument::from_text("foo bar foo baz foo");
        let mut primary = Caret::span(0, 3);
        let mut set = CaretSet::new();

        assert!(select_all_occurrences(&doc, &mut primary, &mut set));
        assert_eq!(primary.key(), (0, 3), "primary selection is retained");
        assert_eq!(set.carets(), &[Caret::span(8, 11), Caret::span(16, 19)]);
    }

    #[test]
    fn test_select_all_from_bare_caret() {
        let doc = RopeDocument::from_text("foo bar foo");
        let mut primary = Caret::at(9);
        let mut set = CaretSet::new();

        assert!(select_all_occurrences(&doc, &mut primary, &mut set));
        assert_eq!(primary.key(), (8, 11));
        assert_eq!(set.carets(), &[Caret::span(0, 3)]);
    }
}
