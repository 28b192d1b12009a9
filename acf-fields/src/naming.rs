//! Name normalization and opaque token generation.
//!
//! Field keys are built from two collaborators: a slug normalizer that turns
//! a human-readable field name into `snake_case`, and a token source used for
//! field types whose `name` is not meaningful (tabs).

use ulid::Ulid;

/// Convert a field name into `snake_case`.
///
/// Whitespace, hyphens, underscores and other punctuation separate words.
/// Inside a word, a lowercase letter or digit followed by an uppercase letter
/// starts a new word (`firstName` → `first_name`), and so does the last
/// capital of an acronym run (`HTMLParser` → `html_parser`).
pub fn snake_case(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut words, &mut current);
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                flush(&mut words, &mut current);
            }
        }

        current.extend(c.to_lowercase());
    }
    flush(&mut words, &mut current);

    words.join("_")
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Source of process-unique opaque tokens.
///
/// Only uniqueness matters; the format is never parsed.
pub trait TokenSource: Send {
    fn next_token(&mut self) -> String;
}

impl<F> TokenSource for F
where
    F: FnMut() -> String + Send,
{
    fn next_token(&mut self) -> String {
        self()
    }
}

/// Lowercase ULIDs. Collision resistant across sessions and processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidTokens;

impl TokenSource for UlidTokens {
    fn next_token(&mut self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// Deterministic counter tokens (`tab_1`, `tab_2`, ...).
///
/// Useful when serialized output must be reproducible between runs.
#[derive(Debug, Clone)]
pub struct SequentialTokens {
    prefix: String,
    next: u64,
}

impl SequentialTokens {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialTokens {
    fn default() -> Self {
        Self::new("tab_")
    }
}

impl TokenSource for SequentialTokens {
    fn next_token(&mut self) -> String {
        let token = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        token
    }
}
