// src/env/expand.rs

//! `%NAME%` interpolation as performed by Windows shells.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Upper bound on substitution passes before giving up.
pub const MAX_EXPANSION_PASSES: usize = 32;

static PERCENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([^%;=]+)%").expect("static regex is valid"));

pub fn has_tokens(input: &str) -> bool {
    PERCENT_TOKEN.is_match(input)
}

/// Substitute `%NAME%` tokens until none remain.
///
/// Undefined names expand to the empty string. Values may themselves contain
/// tokens, so substitution repeats; returns `None` if tokens are still present
/// after [`MAX_EXPANSION_PASSES`] passes (self-referential input).
pub fn expand_percent_vars<F>(input: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut current = input.to_string();
    for _ in 0..MAX_EXPANSION_PASSES {
        if !has_tokens(&current) {
            return Some(current);
        }
        current = PERCENT_TOKEN
            .replace_all(&current, |caps: &Captures<'_>| {
                lookup(&caps[1]).unwrap_or_default()
            })
            .into_owned();
    }
    (!has_tokens(&current)).then_some(current)
}
