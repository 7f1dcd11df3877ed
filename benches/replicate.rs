//! Benchmarks for multi-caret edit replication
//!
//! Run with: cargo bench replicate

use multicaret::replicate::{backspace, insert_text};
use multicaret::{Caret, CaretSet, Document, RopeDocument};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn caret_per_line(doc: &RopeDocument, count: usize) -> (Caret, CaretSet) {
    let mut set = CaretSet::new();
    for line in 1..count {
        set.push_or_merge(Caret::at(doc.line_col_to_offset(line, 0)));
    }
    (Caret::at(0), set)
}

#[divan::bench(args = [10, 100, 1_000])]
fn insert_at_carets(caret_count: usize) {
    let mut doc = RopeDocument::from_text(&"some line of text\n".repeat(caret_count));
    let (mut primary, mut set) = caret_per_line(&doc, caret_count);

    insert_text(&mut doc, &mut primary, &mut set, "x");
    divan::black_box(doc.len_chars());
}

#[divan::bench(args = [10, 100, 1_000])]
fn backspace_at_carets(caret_count: usize) {
    let mut doc = RopeDocument::from_text(&"some line of text\n".repeat(caret_count));
    let mut set = CaretSet::new();
    for line in 0..caret_count {
        set.push_or_merge(Caret::at(doc.line_col_to_offset(line, 4)));
    }
    let mut primary = Caret::at(2);

    backspace(&mut doc, &mut primary, &mut set);
    divan::black_box(doc.len_chars());
}
