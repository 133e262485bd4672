// ==========================================
// Offshore Logistics - Text Matching Primitives
// ==========================================
// Scope: case folding, tokenization and token-aware phrase
// containment shared by the location/vessel resolvers and the
// normalizers' marker checks
// Invariant: pure functions, no allocation-order dependence
// ==========================================

/// Lower-case, turn every non-alphanumeric run into one space, trim.
///
/// `"  Thunder-Horse (PDQ) "` → `"thunder horse pdq"`
pub fn normalize_text(value: &str) -> String {
    tokenize(value).join(" ")
}

/// Lower-cased alphanumeric tokens in source order.
pub fn tokenize(value: &str) -> Vec<String> {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Lower-cased alphanumerics only, spacing and punctuation stripped.
///
/// `"Pelican Island"` and `"pelicanisland"` share the compact form.
pub fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// True when `needle` occurs as a contiguous run of whole tokens in `haystack`.
pub fn contains_token_sequence(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

/// Token-aware phrase containment on raw text.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    contains_token_sequence(&tokenize(text), &tokenize(phrase))
}

/// True when any phrase of `markers` occurs token-aware in `text`.
pub fn contains_any_phrase<S: AsRef<str>>(text: &str, markers: &[S]) -> bool {
    let tokens = tokenize(text);
    markers
        .iter()
        .any(|m| contains_token_sequence(&tokens, &tokenize(m.as_ref())))
}
