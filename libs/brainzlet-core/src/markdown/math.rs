//! Math rendering delegate.
//!
//! The renderer hands every math segment to a [`MathRenderer`]. Failures
//! are local: the caller shows the original source instead.

use crate::error::MathError;
use serde::{Deserialize, Serialize};

/// How a math expression is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathMode {
    /// On its own line (`$$…$$`).
    Display,
    /// Within running text (`$…$`).
    Inline,
}

/// Renders a TeX expression into display markup.
pub trait MathRenderer {
    fn render(&self, tex: &str, mode: MathMode) -> Result<String, MathError>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, MathMode) -> Result<String, MathError>,
{
    fn render(&self, tex: &str, mode: MathMode) -> Result<String, MathError> {
        self(tex, mode)
    }
}

/// Renders TeX as a Unicode approximation.
///
/// The expression is checked for balanced braces, matching environments and
/// paired `\left`/`\right` first; symbols are converted with `unicodeit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeMath;

impl MathRenderer for UnicodeMath {
    fn render(&self, tex: &str, _mode: MathMode) -> Result<String, MathError> {
        validate(tex)?;
        let expanded = expand_fractions(tex);
        Ok(unicodeit::replace(&expanded))
    }
}

/// Structural check of a TeX expression.
pub fn validate(tex: &str) -> Result<(), MathError> {
    let bytes = tex.as_bytes();
    let mut braces: Vec<usize> = Vec::new();
    let mut environments: Vec<&str> = Vec::new();
    let mut open_lefts = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let Some(&next) = bytes.get(i + 1) else {
                    return Err(MathError::TrailingBackslash);
                };
                if !next.is_ascii_alphabetic() {
                    // Escaped symbol such as `\{` or `\\`.
                    i += 2;
                    continue;
                }
                let name_start = i + 1;
                let name_end = bytes[name_start..]
                    .iter()
                    .position(|b| !b.is_ascii_alphabetic())
                    .map_or(bytes.len(), |p| name_start + p);

                match &tex[name_start..name_end] {
                    "begin" | "end" => {
                        let (env, after) = environment_name(tex, name_end)
                            .ok_or(MathError::UnbalancedBraces { position: name_end })?;
                        if &tex[name_start..name_end] == "begin" {
                            environments.push(env);
                        } else {
                            match environments.pop() {
                                Some(open) if open == env => {}
                                open => {
                                    return Err(MathError::MismatchedEnvironment {
                                        expected: open.unwrap_or_default().to_string(),
                                        found: env.to_string(),
                                    })
                                }
                            }
                        }
                        i = after;
                        continue;
                    }
                    "left" => open_lefts += 1,
                    "right" => {
                        open_lefts = open_lefts
                            .checked_sub(1)
                            .ok_or(MathError::UnbalancedDelimiters)?;
                    }
                    _ => {}
                }
                i = name_end;
                continue;
            }
            b'{' => braces.push(i),
            b'}' => {
                if braces.pop().is_none() {
                    return Err(MathError::UnbalancedBraces { position: i });
                }
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(&position) = braces.first() {
        return Err(MathError::UnbalancedBraces { position });
    }
    if let Some(env) = environments.pop() {
        return Err(MathError::UnclosedEnvironment(env.to_string()));
    }
    if open_lefts > 0 {
        return Err(MathError::UnbalancedDelimiters);
    }
    Ok(())
}

/// Read `{name}` starting at `at`, returning the name and the index after `}`.
fn environment_name(tex: &str, at: usize) -> Option<(&str, usize)> {
    let rest = tex.get(at..)?.strip_prefix('{')?;
    let close = rest.find('}')?;
    Some((&rest[..close], at + 1 + close + 1))
}

/// Index of the `}` matching the `{` at `open`.
fn matching_brace(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, b) in s.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Rewrite `\frac{a}{b}` as `a/b`, which `unicodeit` leaves untouched.
fn expand_fractions(tex: &str) -> String {
    let mut result = tex.to_string();
    let mut from = 0;

    while let Some(found) = result[from..].find(r"\frac{") {
        let start = from + found;
        let num_open = start + 5;
        let Some(num_close) = matching_brace(&result, num_open) else {
            break;
        };
        if result.as_bytes().get(num_close + 1) != Some(&b'{') {
            from = num_close;
            continue;
        }
        let Some(den_close) = matching_brace(&result, num_close + 1) else {
            break;
        };
        let numerator = &result[num_open + 1..num_close];
        let denominator = &result[num_close + 2..den_close];
        let replacement = format!("{}/{}", wrap_operand(numerator), wrap_operand(denominator));
        result = format!("{}{}{}", &result[..start], replacement, &result[den_close + 1..]);
        from = start;
    }

    result
}

fn wrap_operand(operand: &str) -> String {
    if operand.chars().count() > 1 && operand.contains(|c: char| "+-* ".contains(c)) {
        format!("({operand})")
    } else {
        operand.to_string()
    }
}
