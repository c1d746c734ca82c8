//! Line classifier for full card text.
//!
//! Card bodies are split on `\n` and each line is classified before its
//! remaining text goes through the segmenter. Classification precedence:
//!
//! 1. code fence toggle (a line starting with three backticks)
//! 2. heading (`#` to `######` followed by whitespace)
//! 3. blockquote (`>` prefix)
//! 4. unordered list item (`-`, `*` or `+` followed by whitespace)
//! 5. ordered list item (`N.` followed by whitespace)
//! 6. horizontal rule (only `-`, `*` or `_`, at least three)
//! 7. blank line
//! 8. paragraph
//!
//! Lines between an opening and a closing fence are captured verbatim.

use super::math::MathRenderer;
use super::render::{render_inline, Inline, RenderMode};
use serde::{Deserialize, Serialize};

const FENCE: &str = "```";

/// A classified line, borrowing its text from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Heading { level: u8, text: &'a str },
    Blockquote { text: &'a str },
    UnorderedItem { indent: usize, text: &'a str },
    OrderedItem { indent: usize, number: &'a str, text: &'a str },
    Rule,
    Blank,
    Paragraph { text: &'a str },
    CodeBlock { language: &'a str, code: String },
}

/// A rendered block, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Blockquote {
        content: Vec<Inline>,
    },
    UnorderedItem {
        indent: usize,
        content: Vec<Inline>,
    },
    OrderedItem {
        indent: usize,
        number: String,
        content: Vec<Inline>,
    },
    Rule,
    Blank,
    /// A plain line. `mode` tells the shell whether to lay it out as an
    /// inline span or a paragraph.
    Paragraph {
        mode: RenderMode,
        content: Vec<Inline>,
    },
    CodeBlock {
        language: String,
        code: String,
    },
}

enum FenceState<'a> {
    Normal,
    InCodeFence {
        language: &'a str,
        lines: Vec<&'a str>,
    },
}

/// Classify every line of `text`. Empty input yields no lines.
pub fn classify_lines(text: &str) -> Vec<Line<'_>> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut state = FenceState::Normal;

    for line in text.split('\n') {
        state = match state {
            FenceState::Normal => match line.strip_prefix(FENCE) {
                Some(rest) => FenceState::InCodeFence {
                    language: rest.trim(),
                    lines: Vec::new(),
                },
                None => {
                    lines.push(classify_line(line));
                    FenceState::Normal
                }
            },
            FenceState::InCodeFence { language, lines: mut captured } => {
                if line.starts_with(FENCE) {
                    lines.push(Line::CodeBlock {
                        language,
                        code: captured.join("\n"),
                    });
                    FenceState::Normal
                } else {
                    captured.push(line);
                    FenceState::InCodeFence {
                        language,
                        lines: captured,
                    }
                }
            }
        };
    }

    // An unterminated fence still shows what it captured.
    if let FenceState::InCodeFence { language, lines: captured } = state {
        lines.push(Line::CodeBlock {
            language,
            code: captured.join("\n"),
        });
    }

    lines
}

/// Classify and render `text` into display blocks.
pub fn render_document(text: &str, mode: RenderMode, math: &dyn MathRenderer) -> Vec<Block> {
    classify_lines(text)
        .into_iter()
        .map(|line| match line {
            Line::Heading { level, text } => Block::Heading {
                level,
                content: render_inline(text, mode, math),
            },
            Line::Blockquote { text } => Block::Blockquote {
                content: render_inline(text, mode, math),
            },
            Line::UnorderedItem { indent, text } => Block::UnorderedItem {
                indent,
                content: render_inline(text, mode, math),
            },
            Line::OrderedItem {
                indent,
                number,
                text,
            } => Block::OrderedItem {
                indent,
                number: number.to_string(),
                content: render_inline(text, mode, math),
            },
            Line::Rule => Block::Rule,
            Line::Blank => Block::Blank,
            Line::Paragraph { text } => Block::Paragraph {
                mode,
                content: render_inline(text, mode, math),
            },
            Line::CodeBlock { language, code } => Block::CodeBlock {
                language: language.to_string(),
                code,
            },
        })
        .collect()
}

fn classify_line(line: &str) -> Line<'_> {
    if let Some(heading) = heading(line) {
        return heading;
    }
    if let Some(rest) = line.strip_prefix('>') {
        return Line::Blockquote { text: rest.trim() };
    }
    if let Some(item) = unordered_item(line) {
        return item;
    }
    if let Some(item) = ordered_item(line) {
        return item;
    }
    if is_rule(line) {
        return Line::Rule;
    }
    if line.trim().is_empty() {
        return Line::Blank;
    }
    Line::Paragraph { text: line }
}

/// Text after a mandatory whitespace run that must leave at least one
/// character behind.
fn after_whitespace(rest: &str) -> Option<&str> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let trimmed = rest.trim_start();
    if !trimmed.is_empty() {
        return Some(trimmed);
    }
    // All whitespace: the last character is the text.
    let (last, _) = rest.char_indices().last()?;
    (last > 0).then(|| &rest[last..])
}

fn heading(line: &str) -> Option<Line<'_>> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = after_whitespace(&line[level..])?;
    Some(Line::Heading {
        level: level as u8,
        text,
    })
}

fn leading_whitespace(line: &str) -> (usize, &str) {
    let rest = line.trim_start();
    let indent = line[..line.len() - rest.len()].chars().count();
    (indent, rest)
}

fn unordered_item(line: &str) -> Option<Line<'_>> {
    let (indent, rest) = leading_whitespace(line);
    let after_bullet = rest.strip_prefix(&['-', '*', '+'][..])?;
    if !after_bullet.starts_with(char::is_whitespace) {
        return None;
    }
    Some(Line::UnorderedItem {
        indent,
        text: after_bullet.trim_start(),
    })
}

fn ordered_item(line: &str) -> Option<Line<'_>> {
    let (indent, rest) = leading_whitespace(line);
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let text = after_whitespace(rest[digits..].strip_prefix('.')?)?;
    Some(Line::OrderedItem {
        indent,
        number: &rest[..digits],
        text,
    })
}

fn is_rule(line: &str) -> bool {
    [b'-', b'*', b'_']
        .iter()
        .any(|&c| line.len() >= 3 && line.bytes().all(|b| b == c))
}
