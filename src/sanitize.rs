//! Escaping for text embedded in generated `<script>` blocks and attributes.
//!
//! HTML ends a script element at the first `</script`, whatever the JavaScript around it
//! means, and `<!--` switches the parser into an escaped state. Both sequences are broken up
//! in a way that keeps JavaScript strings, JSX text and JSON semantically unchanged.

use std::borrow::Cow;

/// Sequences that must not appear verbatim inside a script element, with their replacements.
const SCRIPT_BREAKERS: &[(&str, &str)] = &[("</script", "<\\/script"), ("<!--", "<\\!--")];

/// Escape code for a `<script>` body.
pub fn escape_script_body(code: &str) -> Cow<'_, str> {
    let lower = code.to_ascii_lowercase();
    if !SCRIPT_BREAKERS.iter().any(|(needle, _)| lower.contains(needle)) {
        return Cow::Borrowed(code);
    }

    let mut out = String::with_capacity(code.len() + 16);
    let mut i = 0;
    while i < code.len() {
        let hit = SCRIPT_BREAKERS
            .iter()
            .find(|(needle, _)| lower[i..].starts_with(needle));
        match hit {
            Some((needle, _)) => {
                // Keep the original casing after the inserted backslash
                out.push_str(&code[i..i + 1]);
                out.push('\\');
                out.push_str(&code[i + 1..i + needle.len()]);
                i += needle.len();
            }
            None => {
                let ch = code[i..].chars().next().unwrap_or_default();
                out.push(ch);
                i += ch.len_utf8().max(1);
            }
        }
    }
    Cow::Owned(out)
}

/// Serialize JSON for embedding in a `<script type="importmap">` block.
///
/// `<\/` is a valid JSON escape for `</`, so the document stays parseable as JSON.
pub fn json_for_script(value: &serde_json::Value) -> String {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("{}"));
    json.replace("</", "<\\/").replace("<!--", "<\\u0021--")
}

/// Escape text for a double-quoted HTML attribute.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
