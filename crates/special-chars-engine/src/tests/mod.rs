//! Engine-level behaviour: edits and window moves together.

mod sessions;

use std::cell::RefCell;
use std::ops::Range;

use pretty_assertions::assert_eq;

use crate::changes::{Assoc, ChangeSet, ChangedRange};
use crate::classify::{Classifier, Classify};
use crate::decorations::{Decoration, DecorationSet, Replacement};
use crate::document::{Edit, RopeDocument, TextSource};
use crate::engine::SpecialChars;
use crate::options::{SpecialCharOptions, TabMode};

/// Wraps a classifier and records every range it is asked to scan.
struct RecordingClassifier {
    inner: Classifier,
    calls: RefCell<Vec<Range<usize>>>,
}

impl RecordingClassifier {
    fn new(options: &SpecialCharOptions) -> Self {
        Self {
            inner: Classifier::new(options).unwrap(),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn take_calls(&self) -> Vec<Range<usize>> {
        self.calls.take()
    }
}

impl Classify for RecordingClassifier {
    fn classify<D: TextSource>(&self, doc: &D, range: Range<usize>) -> Vec<Decoration> {
        self.calls.borrow_mut().push(range.clone());
        self.inner.classify(doc, range)
    }

    fn replaces_tabs(&self) -> bool {
        self.inner.replaces_tabs()
    }
}

fn options(tab_mode: TabMode) -> SpecialCharOptions {
    SpecialCharOptions {
        tab_mode,
        ..Default::default()
    }
}

fn recording_engine(
    options: &SpecialCharOptions,
    doc: &RopeDocument,
    window: Range<usize>,
) -> SpecialChars<RecordingClassifier> {
    let engine = SpecialChars::with_classifier(
        RecordingClassifier::new(options),
        options.merge_gap,
        doc,
        window,
    )
    .unwrap();
    engine.classifier().take_calls();
    engine
}

#[test]
fn hello_bell_world() {
    let doc = RopeDocument::new("hello\u{0007}world");
    let engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..11).unwrap();

    let entries = engine.decorations().as_slice();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].range(), 5..6);
    assert_eq!(entries[0].replacement, Replacement::SpecialChar { ch: '\u{7}' });
}

#[test]
fn empty_update_with_same_window_is_idempotent() {
    let doc = RopeDocument::new("a\u{7}b\u{200b}c\u{feff}");
    let mut engine =
        SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..doc.len()).unwrap();

    let first = engine.update(&doc, &ChangeSet::empty(), 0..doc.len()).unwrap().clone();
    let second = engine.update(&doc, &ChangeSet::empty(), 0..doc.len()).unwrap().clone();

    assert_eq!(first, second);
    assert!(DecorationSet::ptr_eq(&first, &second));
}

#[test]
fn insertion_before_tab_moves_it() {
    let mut doc = RopeDocument::new("a\tb");
    let mut engine = SpecialChars::new(&options(TabMode::Replace), &doc, 0..3).unwrap();
    assert_eq!(engine.decorations().as_slice()[0].range(), 1..2);

    let changes = doc.apply(Edit::Insert {
        at: 0,
        text: "z".to_string(),
    });
    let decorations = engine.update(&doc, &changes, 0..doc.len()).unwrap();

    assert_eq!(decorations.len(), 1);
    assert_eq!(decorations.as_slice()[0].range(), 2..3);
}

#[test]
fn edit_rescans_every_later_tab_on_the_line() {
    let mut doc = RopeDocument::new("x\ty\tz");
    let mut engine = recording_engine(&options(TabMode::Replace), &doc, 0..5);
    assert_eq!(
        engine.decorations().as_slice(),
        &[Decoration::tab(1, 3.0), Decoration::tab(3, 3.0)]
    );

    let changes = doc.apply(Edit::Insert {
        at: 0,
        text: "a".to_string(),
    });
    engine.update(&doc, &changes, 0..doc.len()).unwrap();

    let calls = engine.classifier().take_calls();
    for tab in [2, 4] {
        assert!(
            calls.iter().any(|c| c.contains(&tab)),
            "tab at {tab} was not re-scanned: {calls:?}"
        );
    }
    assert_eq!(
        engine.decorations().as_slice(),
        &[Decoration::tab(2, 2.0), Decoration::tab(4, 3.0)]
    );
}

#[test]
fn shrinking_window_drops_outside_entries_without_scanning() {
    let mut text = "x".repeat(100);
    for at in [5, 50, 90] {
        text.replace_range(at..at + 1, "\u{7}");
    }
    let doc = RopeDocument::new(&text);
    let mut engine = recording_engine(&SpecialCharOptions::default(), &doc, 0..100);
    assert_eq!(engine.decorations().len(), 3);

    engine.update(&doc, &ChangeSet::empty(), 40..60).unwrap();

    assert_eq!(
        engine.decorations().as_slice(),
        &[Decoration::special_char(50, 51, '\u{7}')]
    );
    assert!(engine.classifier().take_calls().is_empty());
}

#[test]
fn nearby_changes_share_one_scan() {
    let doc = RopeDocument::new(&"x".repeat(100));
    let mut engine = recording_engine(&SpecialCharOptions::default(), &doc, 0..100);

    let changes = ChangeSet::new(vec![
        ChangedRange::new(10, 12, 10, 12),
        ChangedRange::new(15, 16, 15, 16),
    ])
    .unwrap();
    engine.update(&doc, &changes, 0..100).unwrap();

    assert_eq!(engine.classifier().take_calls(), vec![10..16]);
}

#[test]
fn distant_changes_scan_separately() {
    let doc = RopeDocument::new(&"x".repeat(100));
    let mut engine = recording_engine(&SpecialCharOptions::default(), &doc, 0..100);

    let changes = ChangeSet::new(vec![
        ChangedRange::new(10, 12, 10, 12),
        ChangedRange::new(62, 63, 62, 63),
    ])
    .unwrap();
    engine.update(&doc, &changes, 0..100).unwrap();

    assert_eq!(engine.classifier().take_calls(), vec![10..12, 62..63]);
}

#[test]
fn old_snapshots_survive_updates() {
    let mut doc = RopeDocument::new("\u{7}abc");
    let mut engine =
        SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..doc.len()).unwrap();
    let held = engine.decorations().clone();

    let changes = doc.apply(Edit::Delete { range: 0..1 });
    engine.update(&doc, &changes, 0..doc.len()).unwrap();

    assert!(engine.decorations().is_empty());
    assert_eq!(held.as_slice(), &[Decoration::special_char(0, 1, '\u{7}')]);
}

#[test]
fn stale_entries_outside_window_do_not_come_back() {
    let mut doc = RopeDocument::new("aaaa\u{7}aaaaaaaaaa");
    let mut engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..15).unwrap();
    engine.update(&doc, &ChangeSet::empty(), 8..15).unwrap();

    let changes = doc.apply(Edit::Delete { range: 4..5 });
    engine.update(&doc, &changes, 7..14).unwrap();
    engine.update(&doc, &ChangeSet::empty(), 0..14).unwrap();

    assert!(engine.decorations().is_empty());
}

#[test]
fn cr_inserted_before_lf_joins_the_line_break() {
    let mut doc = RopeDocument::new("a\nb");
    let mut engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..3).unwrap();

    let changes = doc.apply(Edit::Insert {
        at: 1,
        text: "\r".to_string(),
    });
    engine.update(&doc, &changes, 0..doc.len()).unwrap();

    assert!(engine.decorations().is_empty());
}

#[test]
fn lf_inserted_after_cr_undecorates_it() {
    let mut doc = RopeDocument::new("a\rb");
    let mut engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..3).unwrap();
    assert_eq!(
        engine.decorations().as_slice(),
        &[Decoration::special_char(1, 2, '\r')]
    );

    let changes = doc.apply(Edit::Insert {
        at: 2,
        text: "\n".to_string(),
    });
    engine.update(&doc, &changes, 0..doc.len()).unwrap();

    assert!(engine.decorations().is_empty());
}

#[test]
fn deleting_between_cr_and_lf_undecorates_the_cr() {
    let mut doc = RopeDocument::new("a\rx\nb");
    let mut engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..5).unwrap();
    assert_eq!(engine.decorations().len(), 1);

    let changes = doc.apply(Edit::Delete { range: 2..3 });
    engine.update(&doc, &changes, 0..doc.len()).unwrap();

    assert!(engine.decorations().is_empty());
}

#[test]
fn deleting_lf_of_crlf_decorates_the_cr() {
    let mut doc = RopeDocument::new("a\r\nb");
    let mut engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..4).unwrap();
    assert!(engine.decorations().is_empty());

    let changes = doc.apply(Edit::Delete { range: 2..3 });
    engine.update(&doc, &changes, 0..doc.len()).unwrap();

    assert_eq!(
        engine.decorations().as_slice(),
        &[Decoration::special_char(1, 2, '\r')]
    );
}

#[test]
fn window_ending_inside_crlf_then_growing() {
    let doc = RopeDocument::new("a\r\nb");
    let mut engine = SpecialChars::new(&SpecialCharOptions::default(), &doc, 0..2).unwrap();
    assert!(engine.decorations().is_empty());

    engine.update(&doc, &ChangeSet::empty(), 0..4).unwrap();
    assert!(engine.decorations().is_empty());
}

/// One step of a scripted editing session.
enum Step {
    Edit(Edit),
    Scroll(Range<usize>),
}

fn run_session(text: &str, tab_mode: TabMode, window: Range<usize>, steps: Vec<Step>) {
    let options = options(tab_mode);
    let reference = Classifier::new(&options).unwrap();
    let mut doc = RopeDocument::new(text);
    let mut window = window;
    let mut engine = SpecialChars::new(&options, &doc, window.clone()).unwrap();
    invariants::check(&engine, &doc, window.clone(), &reference);

    for step in steps {
        let changes = match step {
            Step::Edit(edit) => {
                // Hosts grow the window over text typed at its end
                let changes = doc.apply(edit);
                window = changes.map_pos(window.start, Assoc::Before)
                    ..changes.map_pos(window.end, Assoc::After);
                changes
            }
            Step::Scroll(to) => {
                window = to;
                ChangeSet::empty()
            }
        };
        engine.update(&doc, &changes, window.clone()).unwrap();
        invariants::check(&engine, &doc, window.clone(), &reference);
    }
}

fn insert(at: usize, text: &str) -> Step {
    Step::Edit(Edit::Insert {
        at,
        text: text.to_string(),
    })
}

#[test]
fn editing_session_matches_full_scan() {
    run_session(
        "line one\u{7}\nsecond\u{200b} line\nthird\u{1b}\u{1b}\n\u{feff}fourth\n",
        TabMode::Native,
        0..20,
        vec![
            insert(0, "\u{8}"),
            insert(3, "ab\u{0}cd"),
            Step::Scroll(10..42),
            Step::Edit(Edit::Delete { range: 12..20 }),
            Step::Scroll(0..17),
            Step::Edit(Edit::Replace {
                range: 2..6,
                text: "\u{202e}\n\u{7}".to_string(),
            }),
            Step::Scroll(5..8),
            insert(6, "\u{2028}"),
            Step::Scroll(0..30),
        ],
    );
}

#[test]
fn tab_session_matches_full_scan() {
    run_session(
        "a\tb\tc\n\t\tx\ny\t\u{7}\tz\n",
        TabMode::Replace,
        0..10,
        vec![
            insert(0, "xx"),
            insert(8, "\t"),
            Step::Scroll(4..19),
            Step::Edit(Edit::Delete { range: 6..9 }),
            insert(5, "\n"),
            Step::Scroll(0..8),
            Step::Edit(Edit::Delete { range: 5..6 }),
            Step::Scroll(0..16),
        ],
    );
}
