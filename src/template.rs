//! Message templating — `{{token}}` placeholders over per-recipient fields.
//!
//! Substitution is literal, non-recursive, and single pass: known tokens are
//! replaced with the field's value, unknown tokens are left verbatim. A
//! template referencing a field one recipient lacks must never fail the
//! whole batch.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap())
}

/// Render a template against a record of named field values.
pub fn render(template: &str, fields: &HashMap<String, String>) -> String {
    token_pattern()
        .replace_all(template, |caps: &Captures<'_>| match fields.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Normalize a human-readable field label into its placeholder token:
/// first word lowercased, each later word capitalized, every
/// non-alphanumeric separator stripped. `"Phone Number"` → `"phoneNumber"`.
pub fn to_camel_token(label: &str) -> String {
    let mut token = String::with_capacity(label.len());
    let words = label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty());

    for (index, word) in words.enumerate() {
        if index == 0 {
            token.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                token.extend(first.to_uppercase());
                token.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    token
}

/// Turn a camel token back into a display label: `"phoneNumber"` →
/// `"Phone Number"`. Used for quick-insert chips and field listings.
pub fn from_camel_token(token: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for part in token.split_whitespace() {
        let mut current = String::new();
        for c in part.chars() {
            if c.is_uppercase() && !current.is_empty() {
                words.push(current);
                current = String::new();
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    words
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
