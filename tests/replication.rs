//! Edit replication tests
//!
//! Every replicated edit must land as one atomic batch: a single undo
//! entry, a single revision bump, and correct caret positions regardless
//! of processing order.

mod common;

use common::{caret_at, doc, engine, key, select};
use multicaret::{Caret, Document, DocumentMut, Key, Modifiers};

// ========================================================================
// Insertion
// ========================================================================

#[test]
fn test_insert_grows_document_by_caret_count() {
    let mut d = doc("alpha\nbeta\ngamma\n");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 2);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 2));
    eng.caret_set_mut().push_or_merge(caret_at(&d, 2, 2));

    let len_before = d.len_chars();
    assert!(eng.key_pressed(&mut d, &mut primary, key(Key::Char('x'), Modifiers::NONE)));

    assert_eq!(
        d.len_chars(),
        len_before + 3,
        "length grows by exactly N * len(s)"
    );
    assert_eq!(d.content(), "alxpha\nbexta\ngaxmma\n");
}

#[test]
fn test_insert_positions_carets_after_text() {
    let mut d = doc("a b");
    let mut eng = engine();
    let mut primary = Caret::at(1);
    eng.caret_set_mut().push_or_merge(Caret::at(3));

    eng.key_pressed(&mut d, &mut primary, key(Key::Char('!'), Modifiers::NONE));
    assert_eq!(d.content(), "a! b!");
    assert_eq!(primary, Caret::at(2));
    assert_eq!(eng.caret_set().carets(), &[Caret::at(5)]);
}

#[test]
fn test_tab_inserts_indent_unit_at_every_caret() {
    let mut d = doc("one\ntwo");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 0);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 0));

    assert!(eng.key_pressed(&mut d, &mut primary, key(Key::Tab, Modifiers::NONE)));
    assert_eq!(d.content(), "    one\n    two");
}

// ========================================================================
// Backspace / Delete
// ========================================================================

#[test]
fn test_backspace_batch_ordering() {
    // Carets at offsets 5, 10, 15 on one line: exactly one character is
    // removed before each original position
    let mut d = doc("abcdefghijklmnop");
    let mut eng = engine();
    let mut primary = Caret::at(5);
    eng.caret_set_mut().push_or_merge(Caret::at(10));
    eng.caret_set_mut().push_or_merge(Caret::at(15));

    assert!(eng.key_pressed(&mut d, &mut primary, key(Key::Backspace, Modifiers::NONE)));
    assert_eq!(d.content(), "abcdfghiklmnp");
}

#[test]
fn test_backspace_never_crosses_line_start() {
    let mut d = doc("one\ntwo\nthree");
    let mut eng = engine();
    let mut primary = caret_at(&d, 1, 0);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 2, 1));

    eng.key_pressed(&mut d, &mut primary, key(Key::Backspace, Modifiers::NONE));
    // Line 1's caret sits at column 0 and must not join lines
    assert_eq!(d.content(), "one\ntwo\nhree");
}

#[test]
fn test_delete_never_crosses_line_end() {
    let mut d = doc("one\ntwo");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 3);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 0));

    eng.key_pressed(&mut d, &mut primary, key(Key::Delete, Modifiers::NONE));
    assert_eq!(d.content(), "one\nwo");
}

#[test]
fn test_backspace_removes_selections() {
    let mut d = doc("foo bar foo");
    let mut eng = engine();
    let mut primary = select(&d, "foo");
    eng.caret_set_mut().push_or_merge(Caret::span(8, 11));

    eng.key_pressed(&mut d, &mut primary, key(Key::Backspace, Modifiers::NONE));
    assert_eq!(d.content(), " bar ");
}

// ========================================================================
// Enter
// ========================================================================

#[test]
fn test_enter_replicates_base_indent() {
    let mut d = doc("    one\n    two");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 7);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 7));

    eng.key_pressed(&mut d, &mut primary, key(Key::Enter, Modifiers::NONE));
    assert_eq!(d.content(), "    one\n    \n    two\n    ");
}

#[test]
fn test_enter_indents_after_block_opener() {
    let mut d = doc("if ready:\nx = 1");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 9);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 5));

    eng.key_pressed(&mut d, &mut primary, key(Key::Enter, Modifiers::NONE));
    assert_eq!(d.content(), "if ready:\n    \nx = 1\n");
}

#[test]
fn test_enter_uses_injected_profile() {
    let mut d = doc("fn main() {\nlet x = 1;");
    let mut eng = engine();
    eng.set_profile(multicaret::LanguageProfile::brace_blocks());
    let mut primary = caret_at(&d, 0, 11);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 10));

    eng.key_pressed(&mut d, &mut primary, key(Key::Enter, Modifiers::NONE));
    assert_eq!(d.content(), "fn main() {\n    \nlet x = 1;\n");
}

// ========================================================================
// Paste
// ========================================================================

#[test]
fn test_paste_maps_lines_to_selections_top_to_bottom() {
    // Three selections covering "x", "y", "z" receive "a", "b", "c"
    let mut d = doc("x + y + z");
    let mut eng = engine();
    let mut primary = select(&d, "x");
    eng.caret_set_mut().push_or_merge(select(&d, "y"));
    eng.caret_set_mut().push_or_merge(select(&d, "z"));

    assert!(eng.paste_text(&mut d, &mut primary, "a\nb\nc"));
    assert_eq!(d.content(), "a + b + c");
}

#[test]
fn test_paste_line_per_caret_without_selections() {
    let mut d = doc("\n\n\n");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 0);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 0));
    eng.caret_set_mut().push_or_merge(caret_at(&d, 2, 0));

    assert!(eng.paste_text(&mut d, &mut primary, "1\n2\n3"));
    assert_eq!(d.content(), "1\n2\n3\n");
}

#[test]
fn test_paste_broadcasts_on_mismatch() {
    let mut d = doc("a b");
    let mut eng = engine();
    let mut primary = Caret::at(1);
    eng.caret_set_mut().push_or_merge(Caret::at(3));

    assert!(eng.paste_text(&mut d, &mut primary, "one\ntwo\nthree"));
    assert_eq!(d.content(), "aone\ntwo\nthree bone\ntwo\nthree");
}

#[test]
fn test_paste_without_multi_is_left_to_host() {
    let mut d = doc("a b");
    let mut eng = engine();
    let mut primary = Caret::at(1);

    assert!(!eng.paste_text(&mut d, &mut primary, "clip"));
    assert_eq!(d.content(), "a b");
}

// ========================================================================
// Atomicity
// ========================================================================

#[test]
fn test_replicated_edit_is_single_transaction() {
    let mut d = doc("alpha\nbeta\ngamma");
    let mut eng = engine();
    let mut primary = caret_at(&d, 0, 5);
    eng.caret_set_mut().push_or_merge(caret_at(&d, 1, 4));
    eng.caret_set_mut().push_or_merge(caret_at(&d, 2, 5));

    let revision_before = d.revision();
    eng.key_pressed(&mut d, &mut primary, key(Key::Char(';'), Modifiers::NONE));

    assert_eq!(
        d.revision(),
        revision_before + 1,
        "observers see exactly one change"
    );

    assert!(d.undo());
    assert_eq!(
        d.content(),
        "alpha\nbeta\ngamma",
        "one undo reverts the whole batch"
    );

    assert!(d.redo());
    assert_eq!(d.content(), "alpha;\nbeta;\ngamma;");
}
