//! Turning decorations into something a front end can draw.
//!
//! The engine only emits [`Replacement`]s. Glyphs and labels are resolved
//! here, at render time, so identical code points share one descriptor.

use std::ops::Range;

use crate::decorations::{Decoration, Replacement};

/// What a decorated range is drawn as.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// A visible stand-in for an invisible or control character.
    Placeholder { glyph: char, label: String },
    /// A blank block `width` units wide.
    Tab { width: f32 },
    /// Whatever a [`RenderSpecialChar`] implementation chose to show.
    Custom { text: String, label: String },
}

/// Custom rendering for special characters. Returning `None` falls back to
/// the placeholder.
pub trait RenderSpecialChar {
    fn render(&self, ch: char, label: &str, placeholder: char) -> Option<Widget>;
}

/// Always falls back to the placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRender;

impl RenderSpecialChar for DefaultRender {
    fn render(&self, _ch: char, _label: &str, _placeholder: char) -> Option<Widget> {
        None
    }
}

impl<F> RenderSpecialChar for F
where
    F: Fn(char, &str, char) -> Option<Widget>,
{
    fn render(&self, ch: char, label: &str, placeholder: char) -> Option<Widget> {
        self(ch, label, placeholder)
    }
}

/// The glyph shown in place of `ch`: a Unicode control picture for C0
/// controls, a bullet for everything else.
pub fn placeholder(ch: char) -> char {
    match ch as u32 {
        // U+2424 SYMBOL FOR NEWLINE reads better than U+240A LINE FEED
        10 => '\u{2424}',
        code @ 0..32 => char::from_u32(0x2400 + code).unwrap_or('\u{2022}'),
        _ => '\u{2022}',
    }
}

pub fn char_name(ch: char) -> Option<&'static str> {
    let name = match ch as u32 {
        0 => "null",
        7 => "bell",
        8 => "backspace",
        10 => "newline",
        11 => "vertical tab",
        13 => "carriage return",
        27 => "escape",
        0x200b => "zero width space",
        0x200c => "zero width non-joiner",
        0x200d => "zero width joiner",
        0x200e => "left-to-right mark",
        0x200f => "right-to-left mark",
        0x2028 => "line separator",
        0x2029 => "paragraph separator",
        0x202d => "left-to-right override",
        0x202e => "right-to-left override",
        0x2066 => "left-to-right isolate",
        0x2067 => "right-to-left isolate",
        0x2069 => "pop directional isolate",
        0xfeff => "zero width no-break space",
        0xfffc => "object replacement",
        _ => return None,
    };
    Some(name)
}

/// Accessible description of `ch`.
pub fn label(ch: char) -> String {
    match char_name(ch) {
        Some(name) => format!("Control character {name}"),
        None => format!("Control character 0x{:x}", ch as u32),
    }
}

pub fn render(replacement: &Replacement, custom: &impl RenderSpecialChar) -> Widget {
    match *replacement {
        Replacement::Tab { width } => Widget::Tab { width },
        Replacement::SpecialChar { ch } => {
            let label = label(ch);
            let glyph = placeholder(ch);
            custom
                .render(ch, &label, glyph)
                .unwrap_or(Widget::Placeholder { glyph, label })
        }
    }
}

/// A piece of a rendered line.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Text(&'a str),
    Widget { range: Range<usize>, widget: Widget },
}

/// Splits `text`, which starts at document offset `base`, into plain text
/// and widgets. Decorations not lying wholly inside `text` are ignored.
pub fn substitute<'a>(
    text: &'a str,
    base: usize,
    decorations: &[Decoration],
    custom: &impl RenderSpecialChar,
) -> Vec<Segment<'a>> {
    let end = base + text.len();
    let mut segments = Vec::new();
    let mut cursor = 0;

    for deco in decorations {
        if deco.from < base + cursor || deco.to > end {
            continue;
        }
        let (from, to) = (deco.from - base, deco.to - base);
        let (Some(before), true) = (text.get(cursor..from), text.is_char_boundary(to)) else {
            continue;
        };

        if !before.is_empty() {
            segments.push(Segment::Text(before));
        }
        segments.push(Segment::Widget {
            range: deco.range(),
            widget: render(&deco.replacement, custom),
        });
        cursor = to;
    }

    if cursor < text.len() {
        segments.push(Segment::Text(&text[cursor..]));
    }
    segments
}
