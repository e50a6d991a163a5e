use std::io::Write;
use std::ops::Range;

use anyhow::Result;
use special_chars_engine::render::label;
use special_chars_engine::{Decoration, Replacement, RopeDocument, SpecialCharOptions, SpecialChars};

/// Writes one line per decoration found in `window`.
pub fn dump(
    doc: &RopeDocument,
    options: &SpecialCharOptions,
    window: Range<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let engine = SpecialChars::new(options, doc, window)?;
    for decoration in engine.decorations() {
        writeln!(out, "{}", describe(decoration))?;
    }
    log::debug!("dumped {} decorations", engine.decorations().len());
    Ok(())
}

fn describe(decoration: &Decoration) -> String {
    let range = format!("{}..{}", decoration.from, decoration.to);
    match decoration.replacement {
        Replacement::SpecialChar { ch } => {
            format!("{range}\tspecial\tU+{:04X}\t{}", ch as u32, label(ch))
        }
        Replacement::Tab { width } => format!("{range}\ttab\twidth={width}"),
    }
}

/// Moves `pos` back onto a character boundary of `text`.
pub fn floor_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
