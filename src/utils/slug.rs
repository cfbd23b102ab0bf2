//! URL path segment sanitizing.
//!
//! Converts free text (tags) to a single URL-safe path segment.

/// Characters forbidden in file paths and fragments
const FORBIDDEN_CHARS: &[char] = &[
    '<', '>', ':', '|', '?', '*', '#', '\\', '(', ')', '[', ']', '"',
];

/// Characters that separate tags or path segments
const RESERVED_CHARS: &[char] = &[',', '/'];

/// Sanitize text into one path segment.
///
/// Trims, removes forbidden and reserved characters, and joins whitespace
/// separated words with `-`. Case is preserved.
pub fn sanitize_segment(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !FORBIDDEN_CHARS.contains(c) && !RESERVED_CHARS.contains(c))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
