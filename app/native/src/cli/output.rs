//! CLI output formatting utilities.
//!
//! - Colored delta signs and fact values for tables
//! - JSON syntax highlighting

use colored::Colorize;

use crate::engine::{Fact, Sign};

/// Formats a delta sign: green `+` for insertions, red `-` for retractions.
#[must_use]
pub fn format_sign(sign: Sign) -> String {
    match sign {
        Sign::Insert => "+".green().bold().to_string(),
        Sign::Retract => "-".red().bold().to_string(),
    }
}

/// Formats the value tuple of a fact as `(a, b, c)`.
#[must_use]
pub fn format_values(fact: &Fact) -> String {
    let values: Vec<String> = fact.values().iter().map(ToString::to_string).collect();
    format!("({})", values.join(", "))
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (default)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json));
}

/// Returns a JSON string with ANSI highlighting applied.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut after_colon = false;
    let mut token = String::new();

    for ch in json.chars() {
        if escape_next {
            token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' if in_string => {
                token.push(ch);
                let colored = if is_key { token.cyan() } else { token.green() };
                out.push_str(&colored.to_string());
                token.clear();
                in_string = false;
                is_key = false;
            }
            '"' => {
                flush_token(&mut out, &mut token, after_colon);
                token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' if !in_string => {
                flush_token(&mut out, &mut token, false);
                out.push_str(&":".white().to_string());
                after_colon = true;
            }
            ',' if !in_string => {
                flush_token(&mut out, &mut token, after_colon);
                out.push_str(&",".white().to_string());
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_token(&mut out, &mut token, after_colon);
                out.push_str(&ch.to_string().white().bold().to_string());
                // Array elements are values too.
                after_colon = ch == '[';
            }
            _ => token.push(ch),
        }
    }

    flush_token(&mut out, &mut token, after_colon);
    out
}

/// Appends the pending token with value coloring when it is a scalar.
fn flush_token(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    let start = token.find(|c: char| !c.is_whitespace());
    match start {
        Some(start) if is_value => {
            let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);
            let (prefix, value, suffix) = (&token[..start], &token[start..end], &token[end..]);

            let colored = if matches!(value, "true" | "false" | "null") {
                Some(value.magenta())
            } else if value.parse::<f64>().is_ok() {
                Some(value.yellow())
            } else {
                None
            };
            match colored {
                Some(colored) => out.push_str(&format!("{prefix}{colored}{suffix}")),
                None => out.push_str(token),
            }
        }
        _ => out.push_str(token),
    }

    token.clear();
}
