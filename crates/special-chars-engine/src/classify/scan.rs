use regex::{Match, Regex};

/// Where the next search in a chunk starts.
///
/// Scanning a chunk is a fold over this state instead of an iterator that
/// hides its cursor: each call to [`next_match`] gets the state explicitly
/// and hands back the one to use next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    pub last_end: usize,
}

/// Finds the next match at or after `state.last_end`.
///
/// Empty matches are returned like any other (callers skip them) but the
/// returned state always moves past them, so a scan terminates.
pub fn next_match<'t>(
    pattern: &Regex,
    text: &'t str,
    state: ScanState,
) -> Option<(Match<'t>, ScanState)> {
    if state.last_end > text.len() {
        return None;
    }

    let m = pattern.find_at(text, state.last_end)?;
    let last_end = if m.is_empty() {
        m.end() + text[m.end()..].chars().next().map_or(1, char::len_utf8)
    } else {
        m.end()
    };

    Some((m, ScanState { last_end }))
}
