//! Size comparison and idiom detection between an original and its translation.

use std::fmt;

/// Idioms that signal the translation moved away from a line-by-line port.
const IDIOMS: &[(&str, &str)] = &[
    ("Result<", "Added Result type for error handling"),
    ("match", "Replaced if-else statements with match expressions for pattern matching"),
    ("Vec<", "Replaced C arrays with Rust's Vec for dynamic arrays"),
    ("String", "Replaced C-style strings with Rust's String type"),
    ("println!", "Replaced printf with println! macro"),
    ("struct", "Converted C structs to Rust structs"),
    ("impl", "Added impl blocks for struct methods"),
    ("Option<", "Used Option type for nullable values"),
];

pub const NO_CHANGES: &str =
    "No significant changes detected. The transpilation might be basic or incomplete.";

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationStats {
    pub original_lines: usize,
    pub original_chars: usize,
    pub translated_lines: usize,
    pub translated_chars: usize,
}

impl TranslationStats {
    pub fn compute(original: &str, translated: &str) -> Self {
        Self {
            original_lines: line_count(original),
            original_chars: original.chars().count(),
            translated_lines: line_count(translated),
            translated_chars: translated.chars().count(),
        }
    }

    pub fn line_difference(&self) -> i64 {
        self.translated_lines as i64 - self.original_lines as i64
    }

    pub fn char_difference(&self) -> i64 {
        self.translated_chars as i64 - self.original_chars as i64
    }

    /// Translated size over original size; `None` for an empty original.
    pub fn expansion_ratio(&self) -> Option<f64> {
        if self.original_chars == 0 {
            None
        } else {
            Some(self.translated_chars as f64 / self.original_chars as f64)
        }
    }
}

/// An empty text is one (empty) line, same as splitting on '\n'.
fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

impl fmt::Display for TranslationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original: {} lines, {} characters", self.original_lines, self.original_chars)?;
        writeln!(
            f,
            "Translated: {} lines, {} characters",
            self.translated_lines, self.translated_chars
        )?;
        writeln!(f, "Line difference: {} lines", self.line_difference())?;
        writeln!(f, "Character difference: {} characters", self.char_difference())?;
        match self.expansion_ratio() {
            Some(ratio) => write!(f, "Expansion ratio: {:.2}x", ratio),
            None => write!(f, "Expansion ratio: n/a"),
        }
    }
}

/// Describe which idioms show up in the translated text.
pub fn explain_changes(translated: &str) -> Vec<&'static str> {
    let changes: Vec<&'static str> = IDIOMS
        .iter()
        .filter(|(marker, _)| translated.contains(marker))
        .map(|(_, description)| *description)
        .collect();

    if changes.is_empty() {
        vec![NO_CHANGES]
    } else {
        changes
    }
}
