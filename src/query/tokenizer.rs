//! # Regex Literal Scanner
//!
//! Walks a query expression the way a JSON lexer would, tracking string
//! literals and nesting depth, and lifts out `/pattern/flags` literals that
//! sit in value position of a top-level member:
//!
//! ```text
//! { "<field>" : /<pattern>/<flags> }
//! ```
//!
//! Everything else is left for the strict JSON parser.

use std::ops::Range;

/// A `/pattern/flags` literal found in value position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLiteral {
    /// Member name the literal is bound to
    pub field: String,
    /// Pattern text with `\/` unescaped
    pub pattern: String,
    /// Trailing flag letters
    pub flags: String,
    /// Byte range of the literal in the scanned text
    pub span: Range<usize>,
}

/// Scan `raw` for regex literals.
///
/// Returns every literal found, in order. A `/` anywhere other than the
/// value position of a top-level member is an error.
pub fn scan(raw: &str) -> Result<Vec<RegexLiteral>, String> {
    let chars: Vec<(usize, char)> = raw.char_indices().collect();
    let mut literals = Vec::new();
    let mut depth: i32 = 0;
    let mut last_string: Option<String> = None;
    let mut member: Option<String> = None;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            '"' => {
                let end = string_end(&chars, i)?;
                let end_pos = chars[end].0;
                let text: String =
                    serde_json::from_str(&raw[pos..=end_pos]).map_err(|e| e.to_string())?;
                last_string = Some(text);
                prev = Some('"');
                i = end + 1;
                continue;
            }
            '{' | '[' => {
                depth += 1;
                prev = Some(c);
            }
            '}' | ']' => {
                depth -= 1;
                prev = Some(c);
            }
            ':' => {
                member = last_string.take();
                prev = Some(c);
            }
            '/' => {
                if prev != Some(':') {
                    return Err(format!("unexpected '/' at offset {}", pos));
                }
                if depth != 1 {
                    return Err(
                        "regular expressions are only supported on top-level fields".to_string(),
                    );
                }
                let field = member.take().ok_or_else(|| {
                    format!("regular expression at offset {} has no field name", pos)
                })?;
                let (pattern, flags, next) = read_literal(&chars, i)?;
                let end = chars.get(next).map(|(p, _)| *p).unwrap_or(raw.len());
                literals.push(RegexLiteral {
                    field,
                    pattern,
                    flags,
                    span: pos..end,
                });
                prev = Some('/');
                i = next;
                continue;
            }
            c if c.is_whitespace() => {}
            _ => prev = Some(c),
        }
        i += 1;
    }

    Ok(literals)
}

/// Index of the closing quote of the string opened at `start`
fn string_end(chars: &[(usize, char)], start: usize) -> Result<usize, String> {
    let mut escaped = false;
    for (j, (_, c)) in chars.iter().enumerate().skip(start + 1) {
        if escaped {
            escaped = false;
        } else if *c == '\\' {
            escaped = true;
        } else if *c == '"' {
            return Ok(j);
        }
    }
    Err(format!(
        "unterminated string starting at offset {}",
        chars[start].0
    ))
}

/// Read `/pattern/flags` starting at the opening slash.
///
/// Returns the pattern, the flags and the index just past the literal.
fn read_literal(
    chars: &[(usize, char)],
    start: usize,
) -> Result<(String, String, usize), String> {
    let unterminated = || {
        format!(
            "unterminated regular expression at offset {}",
            chars[start].0
        )
    };

    let mut pattern = String::new();
    let mut in_class = false;
    let mut j = start + 1;

    loop {
        match chars.get(j).map(|(_, c)| *c) {
            None => return Err(unterminated()),
            Some('\\') => {
                match chars.get(j + 1).map(|(_, c)| *c) {
                    Some('/') => pattern.push('/'),
                    Some(next) => {
                        pattern.push('\\');
                        pattern.push(next);
                    }
                    None => return Err(unterminated()),
                }
                j += 2;
            }
            Some('/') if !in_class => {
                j += 1;
                break;
            }
            Some(c) => {
                match c {
                    '[' => in_class = true,
                    ']' => in_class = false,
                    _ => {}
                }
                pattern.push(c);
                j += 1;
            }
        }
    }

    if pattern.is_empty() {
        return Err("empty regular expression".to_string());
    }

    let mut flags = String::new();
    while let Some((_, c)) = chars.get(j) {
        if !c.is_ascii_alphabetic() {
            break;
        }
        flags.push(*c);
        j += 1;
    }

    Ok((pattern, flags, j))
}
