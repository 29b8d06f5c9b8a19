//! Text forms of a chart snapshot.
//!
//! Chart data is published as a script that assigns one JSON object to a
//! binding (`const oricon_data = {...};`). Plain JSON is accepted as well.

use crate::domain::chart::ChartSnapshot;
use crate::domain::contract::RawChartSnapshot;
use anyhow::{bail, ensure, Context};
use std::fmt;

const DECLARATION_KEYWORDS: [&str; 3] = ["const", "let", "var"];

#[derive(Debug, Clone)]
pub struct DecodedLiteral {
    /// `None` when the text was a bare JSON object.
    pub binding: Option<String>,
    pub raw: RawChartSnapshot,
}

/// The literal ends before its strings, arrays or objects are closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedLiteral {
    pub line: usize,
    pub column: usize,
    pub kind: TruncationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationKind {
    UnterminatedString,
    UnclosedDelimiters(usize),
}

impl fmt::Display for TruncatedLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TruncationKind::UnterminatedString => write!(
                f,
                "chart literal is truncated: string opened at line {}, column {} is never closed",
                self.line, self.column
            ),
            TruncationKind::UnclosedDelimiters(open) => write!(
                f,
                "chart literal is truncated at line {}, column {}: {open} unclosed bracket(s)",
                self.line, self.column
            ),
        }
    }
}

impl std::error::Error for TruncatedLiteral {}

pub fn parse_js_assignment(text: &str) -> anyhow::Result<DecodedLiteral> {
    let (binding, body) = split_assignment(text)?;

    let raw = match serde_json::from_str::<RawChartSnapshot>(body) {
        Ok(raw) => raw,
        Err(err) => {
            if let Some(truncated) = find_truncation(text) {
                tracing::warn!(
                    line = truncated.line,
                    column = truncated.column,
                    "chart literal is truncated"
                );
                return Err(anyhow::Error::new(truncated));
            }
            return Err(err).context("chart literal is not valid chart JSON");
        }
    };

    Ok(DecodedLiteral {
        binding: binding.map(str::to_string),
        raw,
    })
}

/// Parses and validates in one step.
pub fn decode_snapshot(text: &str) -> anyhow::Result<ChartSnapshot> {
    parse_js_assignment(text)?.raw.validate_and_into_snapshot()
}

pub fn render_js_assignment(binding: &str, snapshot: &ChartSnapshot) -> anyhow::Result<String> {
    ensure!(
        is_js_identifier(binding),
        "binding must be a JavaScript identifier (got {binding:?})"
    );
    let body = to_json(snapshot)?;
    Ok(format!("const {binding} = {body};\n"))
}

pub fn to_json(snapshot: &ChartSnapshot) -> anyhow::Result<String> {
    serde_json::to_string_pretty(snapshot).context("failed to serialize chart snapshot")
}

pub fn from_json(text: &str) -> anyhow::Result<ChartSnapshot> {
    serde_json::from_str::<ChartSnapshot>(text).context("failed to parse chart snapshot JSON")
}

fn split_assignment(text: &str) -> anyhow::Result<(Option<&str>, &str)> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('{') {
        return Ok((None, trimmed));
    }

    let Some(rest) = DECLARATION_KEYWORDS.iter().find_map(|kw| {
        trimmed
            .strip_prefix(kw)
            .filter(|rest| rest.starts_with(char::is_whitespace))
    }) else {
        bail!("chart literal must be a JSON object or a `const <name> = {{...}};` assignment");
    };

    let (binding, body) = rest.split_once('=').context("assignment is missing `=`")?;
    let binding = binding.trim();
    ensure!(
        is_js_identifier(binding),
        "binding must be a JavaScript identifier (got {binding:?})"
    );

    let body = body.trim();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    Ok((Some(binding), body))
}

fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// Neither JSON nor JS string literals may contain a raw newline. A newline inside a
// string with no later quote anywhere in the text means the text was cut off there;
// a later quote means the literal goes on and is merely malformed.
fn find_truncation(text: &str) -> Option<TruncatedLiteral> {
    let mut open = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let (mut line, mut column) = (1usize, 0usize);
    let (mut string_line, mut string_column) = (1usize, 0usize);

    for (pos, ch) in text.char_indices() {
        if ch == '\n' {
            if in_string {
                if text[pos..].contains('"') {
                    return None;
                }
                break;
            }
            line += 1;
            column = 0;
            continue;
        }
        column += 1;

        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                string_line = line;
                string_column = column;
            }
            '{' | '[' => open += 1,
            '}' | ']' => match open.checked_sub(1) {
                Some(n) => open = n,
                // Stray closer: a syntax error, not a truncation.
                None => return None,
            },
            _ => {}
        }
    }

    if in_string {
        return Some(TruncatedLiteral {
            line: string_line,
            column: string_column,
            kind: TruncationKind::UnterminatedString,
        });
    }
    if open > 0 {
        return Some(TruncatedLiteral {
            line,
            column,
            kind: TruncationKind::UnclosedDelimiters(open),
        });
    }
    None
}
