//! Small string helpers shared by the parser and the enrichment rules.

/// Strip any combination of the given characters from the end of `text`.
///
/// Unlike [`str::trim_end_matches`] with a single pattern, the characters may
/// be interleaved: `"a.;."` trimmed of `['.', ';']` gives `"a"`.
pub fn trim_end_chars<'a>(text: &'a str, chars: &[char]) -> &'a str {
    text.trim_end_matches(|c| chars.contains(&c))
}

/// Lower-case the first character of `text`, leaving the rest untouched.
pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Number of whitespace-separated words.
#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse every whitespace run into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Parse the leading decimal digits of `text` (after trimming), the way a
/// lenient integer reader does: `"300px"` gives 300, `"px"` gives `None`.
pub fn leading_number(text: &str) -> Option<u32> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}
