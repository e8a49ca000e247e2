// src/env/path_list.rs

//! Helpers for delimiter-separated PATH lists. Empty segments are dropped.

/// Non-empty segments of `path`, in order.
pub fn segments(path: &str, delimiter: char) -> impl Iterator<Item = &str> {
    path.split(delimiter).filter(|s| !s.is_empty())
}

pub fn join<'a>(parts: impl IntoIterator<Item = &'a str>, delimiter: char) -> String {
    let mut out = String::new();
    for part in parts.into_iter().filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push(delimiter);
        }
        out.push_str(part);
    }
    out
}

/// `front` entries, then the existing segments of `path`.
pub fn prepend(front: &[&str], path: &str, delimiter: char) -> String {
    join(
        front.iter().copied().chain(segments(path, delimiter)),
        delimiter,
    )
}

/// Existing segments of `path`, then `tail`.
pub fn append(path: &str, tail: &str, delimiter: char) -> String {
    join(
        segments(path, delimiter).chain(segments(tail, delimiter)),
        delimiter,
    )
}

/// Drop every segment that contains `needle` as a substring.
pub fn remove_containing(path: &str, needle: &str, delimiter: char) -> String {
    if needle.is_empty() {
        return join(segments(path, delimiter), delimiter);
    }
    join(
        segments(path, delimiter).filter(|s| !s.contains(needle)),
        delimiter,
    )
}

/// Segments in first-occurrence order with exact duplicates removed.
pub fn unique_segments(path: &str, delimiter: char) -> Vec<String> {
    let mut seen = Vec::new();
    for seg in segments(path, delimiter) {
        if !seen.iter().any(|s: &String| s == seg) {
            seen.push(seg.to_string());
        }
    }
    seen
}
