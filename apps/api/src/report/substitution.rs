//! Placeholder substitution engine.
//!
//! Template bodies carry bracket tokens like `[出险时间]`. `render` replaces
//! each token whose name has an exact (case-sensitive) key in the values map
//! and leaves every other token verbatim — partially filled documents stay
//! legible and editable. Substituted values are never re-scanned, so a value
//! containing brackets cannot trigger further expansion.

use std::collections::HashMap;

/// Renders a template body against a map of replacement values. Pure; with
/// an empty map the body passes through unchanged.
pub fn render(body: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find(['[', ']']) {
            Some(i) if after.as_bytes()[i] == b']' => {
                let name = &after[..i];
                match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('[');
                        out.push_str(name);
                        out.push(']');
                    }
                }
                rest = &after[i + 1..];
            }
            // A second `[` before any `]`, or no closer at all: the opening
            // bracket does not form a token. Emit it and keep scanning.
            _ => {
                out.push('[');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
