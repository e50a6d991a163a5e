use regex::Regex;

use crate::error::EngineError;

/// Control characters and invisible formatting characters.
///
/// Tab (U+0009) is left out; it only becomes special when the host cannot
/// render tab stops itself (see [`TabMode::Replace`]).
pub const BASE_PATTERN: &str = r"[\x{0}-\x{8}\x{a}-\x{1f}\x{7f}-\x{9f}\x{ad}\x{61c}\x{200b}\x{200e}\x{200f}\x{2028}\x{2029}\x{202d}\x{202e}\x{2066}\x{2067}\x{2069}\x{feff}\x{fff9}-\x{fffc}]";

/// How tab characters are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabMode {
    /// The host renders tabs with the configured tab stop size itself.
    #[default]
    Native,
    /// The host cannot, so every tab is replaced by a widget whose width
    /// depends on its column.
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialCharOptions {
    /// Replaces [`BASE_PATTERN`] when set.
    pub pattern: Option<String>,
    /// Additional characters considered special, unioned with the pattern.
    pub extra_pattern: Option<String>,
    pub tab_mode: TabMode,
    /// Tab stop size in columns.
    pub tab_size: usize,
    /// Width of one default character, in whatever unit the host renders.
    pub char_width: f32,
    /// Changed ranges closer than this are re-scanned as one span.
    pub merge_gap: usize,
}

impl Default for SpecialCharOptions {
    fn default() -> Self {
        Self {
            pattern: None,
            extra_pattern: None,
            tab_mode: TabMode::default(),
            tab_size: 4,
            char_width: 1.0,
            merge_gap: 10,
        }
    }
}

impl SpecialCharOptions {
    /// Compiles the union of the active patterns into one regex.
    pub fn compile(&self) -> Result<Regex, EngineError> {
        let mut alternatives = vec![self.pattern.as_deref().unwrap_or(BASE_PATTERN)];
        if let Some(extra) = self.extra_pattern.as_deref() {
            alternatives.push(extra);
        }
        if self.tab_mode == TabMode::Replace {
            alternatives.push(r"\t");
        }

        // Validate each piece on its own so errors point at the culprit
        for alt in &alternatives {
            Regex::new(alt)?;
        }

        let union = alternatives
            .iter()
            .map(|alt| format!("(?:{alt})"))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Regex::new(&union)?)
    }
}
