use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use special_chars_engine::render::{DefaultRender, Segment, Widget, substitute};

use crate::app::{App, VisibleLine};

/// Rows not available for document lines: the block borders and the help
/// line.
pub const CHROME_ROWS: u16 = 3;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let visible = app.visible_lines();
    let mut cursor = None;
    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(row, line)| {
            let (spans, caret_col) = line_spans(line, app);
            if let Some(col) = caret_col {
                cursor = Some((col, row));
            }
            Line::from(spans)
        })
        .collect();

    let content = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.title()),
    );
    f.render_widget(content, chunks[0]);

    if let Some((col, row)) = cursor {
        let x = chunks[0].x + 1 + col as u16;
        let y = chunks[0].y + 1 + row as u16;
        if x < chunks[0].right().saturating_sub(1) {
            f.set_cursor_position(Position::new(x, y));
        }
    }

    let help = Line::from(vec![
        Span::raw("Esc/^Q: Quit | ^S: Save | "),
        Span::raw("↑↓/PgUp/PgDn: Scroll | ←→: Move |"),
        Span::styled(app.status().to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(help), chunks[1]);
}

/// Spans for one line, and the column the caret sits at if it is on it.
pub fn line_spans(line: &VisibleLine, app: &App) -> (Vec<Span<'static>>, Option<usize>) {
    let end = line.start + line.text.len();
    let decorations = app.decorations().between(line.start, end);
    let caret = app.caret();

    let mut spans = Vec::new();
    let mut col = 0;
    let mut caret_col = None;
    let mut pos = line.start;

    for segment in substitute(&line.text, line.start, decorations, &DefaultRender) {
        match segment {
            Segment::Text(text) => {
                let mut out = String::with_capacity(text.len());
                for ch in text.chars() {
                    if pos == caret {
                        caret_col = Some(col);
                    }
                    match (ch, app.native_tabs()) {
                        ('\t', Some(tab_size)) => {
                            let width = tab_size - col % tab_size;
                            out.extend(std::iter::repeat_n(' ', width));
                            col += width;
                        }
                        (ch, _) if ch.is_control() => {
                            out.push('\u{fffd}');
                            col += 1;
                        }
                        (ch, _) => {
                            out.push(ch);
                            col += 1;
                        }
                    }
                    pos += ch.len_utf8();
                }
                spans.push(Span::raw(out));
            }
            Segment::Widget { range, widget } => {
                if range.contains(&caret) {
                    caret_col = Some(col);
                }
                let (text, style) = widget_text(&widget);
                col += text.chars().count();
                spans.push(Span::styled(text, style));
                pos = range.end;
            }
        }
    }

    if caret == end {
        caret_col = Some(col);
    }
    (spans, caret_col)
}

fn widget_text(widget: &Widget) -> (String, Style) {
    match widget {
        Widget::Placeholder { glyph, .. } => (
            glyph.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Widget::Tab { width } => {
            let cells = (width.round() as usize).max(1);
            let mut text = String::from("→");
            text.extend(std::iter::repeat_n(' ', cells - 1));
            (text, Style::default().fg(Color::DarkGray))
        }
        Widget::Custom { text, .. } => (text.clone(), Style::default().fg(Color::Yellow)),
    }
}
