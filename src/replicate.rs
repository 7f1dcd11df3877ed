//! Replicates one logical edit across every active caret.
//!
//! Every operation here collects the full caret list (primary first),
//! sorts it by selection start in strictly descending order, and applies
//! the edit caret by caret inside one document batch. Descending order
//! keeps every still-unprocessed caret's stored offset valid, because
//! all edits already applied sit to its right; carets already processed
//! are shifted by each subsequent edit's length delta so the returned
//! positions are correct without re-reading the document.

use std::collections::HashMap;

use tracing::debug;

use crate::caret::Caret;
use crate::caret_set::CaretSet;
use crate::document::DocumentMut;
use crate::language::LanguageProfile;
use crate::util::leading_indent;

/// Apply `edit` to every caret inside one batch. The closure receives
/// the caret's original index in the unsorted list and must return the
/// caret's new shape plus the signed length delta of its edit (0 for
/// no-ops).
fn apply_to_all<D, F>(doc: &mut D, primary: &mut Caret, set: &mut CaretSet, mut edit: F)
where
    D: DocumentMut + ?Sized,
    F: FnMut(&mut D, usize, Caret) -> (Caret, isize),
{
    let all = set.all_with_primary(*primary);
    let mut order: Vec<(usize, Caret)> = all.into_iter().enumerate().collect();
    order.sort_by(|(_, a), (_, b)| b.start().cmp(&a.start()));

    doc.begin_batch();
    let mut done: Vec<(usize, Caret)> = Vec::with_capacity(order.len());
    for (index, caret) in order {
        let (new_caret, delta) = edit(doc, index, caret);
        if delta != 0 {
            // Everything already processed sits at higher offsets
            for (_, c) in done.iter_mut() {
                c.shift(delta);
            }
        }
        done.push((index, new_caret));
    }
    doc.end_batch();

    done.sort_by_key(|(index, _)| *index);
    let mut results = done.into_iter().map(|(_, c)| c);
    if let Some(first) = results.next() {
        *primary = first;
    }
    set.replace_all(results.collect());
}

/// Remove the caret's selection if any; returns the insertion offset and
/// the number of characters removed.
fn remove_selection<D: DocumentMut + ?Sized>(doc: &mut D, caret: Caret) -> (usize, usize) {
    let start = caret.start();
    let removed = caret.len();
    if removed > 0 {
        doc.remove_range(start, caret.end());
    }
    (start, removed)
}

/// Insert `text` at every caret, replacing selections.
pub fn insert_text<D: DocumentMut + ?Sized>(
    doc: &mut D,
    primary: &mut Caret,
    set: &mut CaretSet,
    text: &str,
) {
    let text_len = text.chars().count();
    debug!(carets = set.len() + 1, len = text_len, "replicating insert");
    apply_to_all(doc, primary, set, |doc, _, caret| {
        let (start, removed) = remove_selection(doc, caret);
        doc.insert_at(start, text);
        (
            Caret::at(start + text_len),
            text_len as isize - removed as isize,
        )
    });
}

/// Backspace at every caret: selections are removed, otherwise one
/// character before the caret, never crossing the start of its line.
pub fn backspace<D: DocumentMut + ?Sized>(doc: &mut D, primary: &mut Caret, set: &mut CaretSet) {
    apply_to_all(doc, primary, set, |doc, _, caret| {
        if caret.has_selection() {
            let (start, removed) = remove_selection(doc, caret);
            return (Caret::at(start), -(removed as isize));
        }
        let pos = caret.position;
        let (_, col) = doc.offset_to_line_col(pos);
        if col == 0 {
            return (caret, 0);
        }
        doc.remove_range(pos - 1, pos);
        (Caret::at(pos - 1), -1)
    });
}

/// Forward delete at every caret, bounded by the end of its line.
pub fn delete_forward<D: DocumentMut + ?Sized>(
    doc: &mut D,
    primary: &mut Caret,
    set: &mut CaretSet,
) {
    apply_to_all(doc, primary, set, |doc, _, caret| {
        if caret.has_selection() {
            let (start, removed) = remove_selection(doc, caret);
            return (Caret::at(start), -(removed as isize));
        }
        let pos = caret.position;
        let (line, col) = doc.offset_to_line_col(pos);
        if col >= doc.line_length(line) {
            return (caret, 0);
        }
        doc.remove_range(pos, pos + 1);
        (Caret::at(pos), -1)
    });
}

/// Newline at every caret, carrying the line's leading whitespace and
/// indenting one unit deeper after block-opening lines per the profile.
pub fn insert_newline<D: DocumentMut + ?Sized>(
    doc: &mut D,
    primary: &mut Caret,
    set: &mut CaretSet,
    profile: &LanguageProfile,
) {
    apply_to_all(doc, primary, set, |doc, _, caret| {
        let (start, removed) = remove_selection(doc, caret);
        let (line, _) = doc.offset_to_line_col(start);
        let line_text = doc.line_text(line).unwrap_or_default();
        let mut inserted = String::from("\n");
        inserted.push_str(leading_indent(&line_text));
        if profile.line_opens_block(&line_text) {
            inserted.push_str(&profile.indent_unit);
        }
        doc.insert_at(start, &inserted);
        let len = inserted.chars().count();
        (Caret::at(start + len), len as isize - removed as isize)
    });
}

/// Paste into every caret. When the clipboard line count matches the
/// number of selections (or, with no selections at all, the caret
/// count), lines are mapped to carets top-to-bottom by position and
/// applied bottom-to-top; otherwise the whole text is broadcast.
pub fn paste<D: DocumentMut + ?Sized>(
    doc: &mut D,
    primary: &mut Caret,
    set: &mut CaretSet,
    text: &str,
) {
    let all = set.all_with_primary(*primary);
    let parts: Vec<&str> = text.lines().collect();

    let mut selected: Vec<usize> = (0..all.len()).filter(|&i| all[i].has_selection()).collect();
    selected.sort_by_key(|&i| all[i].start());

    let assignment: Option<HashMap<usize, String>> = if !selected.is_empty()
        && parts.len() == selected.len()
    {
        Some(
            selected
                .iter()
                .zip(&parts)
                .map(|(&i, part)| (i, part.to_string()))
                .collect(),
        )
    } else if selected.is_empty() && parts.len() == all.len() {
        let mut ordered: Vec<usize> = (0..all.len()).collect();
        ordered.sort_by_key(|&i| all[i].start());
        Some(
            ordered
                .iter()
                .zip(&parts)
                .map(|(&i, part)| (i, part.to_string()))
                .collect(),
        )
    } else {
        None
    };

    match assignment {
        Some(map) => {
            debug!(lines = parts.len(), "line-wise paste");
            apply_to_all(doc, primary, set, |doc, index, caret| {
                let Some(part) = map.get(&index) else {
                    // Carets without an assigned line are left untouched
                    return (caret, 0);
                };
                let (start, removed) = remove_selection(doc, caret);
                doc.insert_at(start, part);
                let len = part.chars().count();
                (Caret::at(start + len), len as isize - removed as isize)
            });
        }
        None => insert_text(doc, primary, set, text),
    }
}
