//! Language profile persistence and injection tests

mod common;

use common::doc;
use multicaret::{Caret, CaretSet, Document, LanguageProfile};

#[test]
fn test_profile_yaml_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("profiles").join("rust.yaml");

    let profile = LanguageProfile::brace_blocks();
    profile.save(&path).expect("save profile");

    let loaded = LanguageProfile::load(&path).expect("load profile");
    assert_eq!(loaded, profile);
}

#[test]
fn test_profile_load_rejects_malformed_yaml() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "block_marker: [unclosed").expect("write file");

    assert!(LanguageProfile::load(&path).is_err());
}

#[test]
fn test_profile_load_missing_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    assert!(LanguageProfile::load(&dir.path().join("absent.yaml")).is_err());
}

#[test]
fn test_block_expansion_follows_profile_marker() {
    // The same document expands differently under the two stock profiles
    let d = doc("fn go() {\n    work();\n}\nafter();\n");
    let mut primary = Caret::at(8); // on the brace
    let mut set = CaretSet::new();

    let brace = LanguageProfile::brace_blocks();
    set.expand_selection(&d, &mut primary, &brace);
    assert!(primary.has_selection(), "brace profile recognizes the header");

    let mut primary = Caret::at(8);
    let colon = LanguageProfile::colon_blocks();
    set.clear();
    set.expand_selection(&d, &mut primary, &colon);
    // Under colon blocks the brace is just a bracket pair
    assert_eq!(d.slice(primary.range()), "{\n    work();\n}");
}
