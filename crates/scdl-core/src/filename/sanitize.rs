//! Filesystem-safe filename stems.

/// Linux NAME_MAX, in bytes.
pub const NAME_MAX: usize = 255;

/// Makes a stem safe to use as a filename while keeping it readable.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Trims leading/trailing whitespace and dots
/// - Truncates so that stem plus `reserve` bytes fit in NAME_MAX
///
/// Spaces and the artist/title separator are preserved.
pub fn sanitize_stem(name: &str, reserve: usize) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');

    let limit = NAME_MAX.saturating_sub(reserve);
    if trimmed.len() <= limit {
        return trimmed.to_string();
    }
    let mut take = limit;
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].trim_end().to_string()
}
