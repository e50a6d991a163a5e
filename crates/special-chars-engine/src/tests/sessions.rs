//! Generated editing sessions compared against a full scan after every step.

use std::ops::Range;

use proptest::prelude::*;

use super::invariants;
use crate::changes::{Assoc, ChangeSet};
use crate::classify::Classifier;
use crate::document::{Edit, RopeDocument};
use crate::engine::SpecialChars;
use crate::options::{SpecialCharOptions, TabMode};

const ALPHABET: &[&str] = &["a", "b", "x", "\t", "\n", "\r", "\u{7}", "\u{200b}"];

/// A step whose positions are picked among the document's char boundaries
/// when the step runs.
#[derive(Debug, Clone)]
enum Action {
    Insert(usize, String),
    Delete(usize, usize),
    Replace(usize, usize, String),
    Scroll(usize, usize),
}

fn text(len: Range<usize>) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET), len).prop_map(|parts| parts.concat())
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (any::<usize>(), text(1..5)).prop_map(|(at, text)| Action::Insert(at, text)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Action::Delete(a, b)),
        (any::<usize>(), any::<usize>(), text(0..4)).prop_map(|(a, b, t)| Action::Replace(a, b, t)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Action::Scroll(a, b)),
    ]
}

fn boundary(doc: &RopeDocument, pick: usize) -> usize {
    let text = doc.text();
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain([text.len()])
        .collect();
    bounds[pick % bounds.len()]
}

fn ordered(doc: &RopeDocument, a: usize, b: usize) -> Range<usize> {
    let (a, b) = (boundary(doc, a), boundary(doc, b));
    a.min(b)..a.max(b)
}

fn run(
    initial: &str,
    options: &SpecialCharOptions,
    window: (usize, usize),
    actions: Vec<Action>,
) {
    let reference = Classifier::new(options).unwrap();
    let mut doc = RopeDocument::new(initial);
    let mut window = ordered(&doc, window.0, window.1);
    let mut engine = SpecialChars::new(options, &doc, window.clone()).unwrap();
    invariants::check(&engine, &doc, window.clone(), &reference);

    for action in actions {
        let edit = match action {
            Action::Insert(at, text) => Some(Edit::Insert {
                at: boundary(&doc, at),
                text,
            }),
            Action::Delete(a, b) => Some(Edit::Delete {
                range: ordered(&doc, a, b),
            }),
            Action::Replace(a, b, text) => Some(Edit::Replace {
                range: ordered(&doc, a, b),
                text,
            }),
            Action::Scroll(a, b) => {
                window = ordered(&doc, a, b);
                None
            }
        };

        let changes = match edit {
            Some(edit) => {
                let changes = doc.apply(edit);
                window = changes.map_pos(window.start, Assoc::Before)
                    ..changes.map_pos(window.end, Assoc::After);
                changes
            }
            None => ChangeSet::empty(),
        };

        engine.update(&doc, &changes, window.clone()).unwrap();
        invariants::check(&engine, &doc, window.clone(), &reference);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    #[test]
    fn native_sessions_match_full_scan(
        initial in text(0..30),
        window in (any::<usize>(), any::<usize>()),
        merge_gap in prop::sample::select(vec![0usize, 3, 10]),
        actions in prop::collection::vec(action(), 1..12),
    ) {
        let options = SpecialCharOptions {
            tab_mode: TabMode::Native,
            merge_gap,
            ..Default::default()
        };
        run(&initial, &options, window, actions);
    }

    #[test]
    fn replaced_tab_sessions_match_full_scan(
        initial in text(0..30),
        window in (any::<usize>(), any::<usize>()),
        merge_gap in prop::sample::select(vec![0usize, 3, 10]),
        actions in prop::collection::vec(action(), 1..12),
    ) {
        let options = SpecialCharOptions {
            tab_mode: TabMode::Replace,
            merge_gap,
            ..Default::default()
        };
        run(&initial, &options, window, actions);
    }

    #[test]
    fn tab_run_sessions_match_full_scan(
        initial in text(0..30),
        window in (any::<usize>(), any::<usize>()),
        actions in prop::collection::vec(action(), 1..12),
    ) {
        let options = SpecialCharOptions {
            extra_pattern: Some(r"\t+".to_string()),
            ..Default::default()
        };
        run(&initial, &options, window, actions);
    }
}
