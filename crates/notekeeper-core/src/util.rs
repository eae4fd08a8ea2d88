//! Small text helpers shared by the config layer, the CLI and API logging.

/// Longest response body excerpt written to the logs, in characters.
pub const LOG_EXCERPT_CHARS: usize = 200;

/// The trimmed value, or `None` when it is absent or only whitespace.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Whether `url` names an `http` or `https` endpoint. The scheme is matched
/// without regard to case.
pub fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// One-line excerpt of a response body for log output.
///
/// Whitespace runs (newlines from pretty-printed JSON or HTML error pages)
/// collapse to single spaces, and anything past [`LOG_EXCERPT_CHARS`] is cut
/// and marked with `...`.
pub fn log_excerpt(body: &str) -> String {
    let mut excerpt = String::new();
    let mut taken = 0;
    for (index, word) in body.split_whitespace().enumerate() {
        let separator = (index > 0).then_some(' ');
        for ch in separator.into_iter().chain(word.chars()) {
            if taken >= LOG_EXCERPT_CHARS {
                excerpt.push_str("...");
                return excerpt;
            }
            excerpt.push(ch);
            taken += 1;
        }
    }
    excerpt
}
