// Plain-text normalization for extracted sections.
//
// Extracted item text carries HTML entities, hard line breaks and runs of
// layout whitespace. Normalizing makes keyword counting insensitive to all
// of that. The result is a fixed point: normalizing twice changes nothing.

/// Decode entities, flatten newlines, collapse whitespace runs and trim.
pub fn normalize(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let flattened = decoded.replace('\n', " ");
    flattened
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unicode whitespace plus the ASCII file/group/record/unit separators
/// (U+001C..U+001F), which regex `\s` engines also treat as whitespace.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Decode HTML entities until none are left, so `&amp;lt;` ends up as `<`.
///
/// Uses full HTML5 text-context rules, including the legacy entities that
/// may appear without a trailing semicolon (`&amp`, `&nbsp`, `&copy`).
/// Each pass that changes the text consumes at least one entity, so the
/// loop terminates.
fn decode_entities(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let decoded = htmlize::unescape(text.as_str()).into_owned();
        if decoded == text {
            return text;
        }
        text = decoded;
    }
}
