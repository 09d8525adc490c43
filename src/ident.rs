//! Identifier formatter: raw document keys → exported Go field names.
//!
//! Total function; anything unsalvageable falls back to a single underscore.
//! Well-known initialisms (ID, URL, HTML, ...) are uppercased as whole
//! segments so `foo_id` becomes `FooID`, not `FooId`.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Whole-segment matches only, never substrings. Only entries that are highly
/// unlikely to be ordinary words belong here.
static COMMON_INITIALISMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "API", "ASCII", "CPU", "CSS", "DB", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
        "IP", "JSON", "LHS", "NTP", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SSH", "TLS",
        "TTL", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML",
    ])
});

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Format a raw key as an exported Go struct field name.
///
/// Idempotent on its own output: formatting an already well-formed identifier
/// leaves it unchanged.
pub fn format_field_name(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .skip_while(|c| !is_word_char(*c))
        .collect();
    if stripped.is_empty() {
        return "_".to_string();
    }

    let named = stringify_first_char(&stripped);
    let linted = lint_field_name(&named);

    // Final sanitation: every remaining non-alphanumeric becomes an underscore, and
    // the first character must be a letter.
    let sanitized: String = linted
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let ok = if i == 0 {
                c.is_alphabetic()
            } else {
                is_word_char(c)
            };
            if ok { c } else { '_' }
        })
        .collect();
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric()
}

/// A leading digit cannot start a Go identifier; spell it out instead.
fn stringify_first_char(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => {
            let word = DIGIT_WORDS[(c as u8 - b'0') as usize];
            format!("{}_{}", word, chars.as_str())
        }
        _ => s.to_string(),
    }
}

fn lint_field_name(name: &str) -> String {
    if name == "_" {
        return name.to_string();
    }

    // Fast path: all lowercase is a single word.
    if name.chars().all(char::is_lowercase) {
        let upper = name.to_uppercase();
        if COMMON_INITIALISMS.contains(upper.as_str()) {
            return upper;
        }
        return capitalize_first(name);
    }

    // SCREAMING_SNAKE_CASE reads better lowercased before word splitting.
    let all_upper_underscore = name.chars().all(|c| c.is_uppercase() || c == '_');
    let name = if all_upper_underscore {
        name.to_lowercase()
    } else {
        name.to_string()
    };

    split_words(&name).iter().map(|w| lint_word(w)).collect()
}

/// Segment at underscore runs and at lower→non-lower (camelCase) boundaries.
/// A run of underscores collapses to a plain split, except exactly one
/// underscore survives between two adjacent digits so numeric tokens stay
/// apart.
fn split_words(name: &str) -> Vec<String> {
    let runes: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut i = 0;
    while i < runes.len() {
        let c = runes[i];
        if c == '_' {
            let prev_digit = cur.chars().last().is_some_and(|p| p.is_numeric());
            while i < runes.len() && runes[i] == '_' {
                i += 1;
            }
            let next_digit = runes.get(i).is_some_and(|n| n.is_numeric());
            if !cur.is_empty() {
                words.push(std::mem::take(&mut cur));
            }
            if prev_digit && next_digit {
                cur.push('_');
            }
            continue;
        }
        cur.push(c);
        if c.is_lowercase() {
            if let Some(&next) = runes.get(i + 1) {
                if !next.is_lowercase() && next != '_' {
                    words.push(std::mem::take(&mut cur));
                }
            }
        }
        i += 1;
    }
    if !cur.is_empty() {
        words.push(cur);
    }
    words
}

fn lint_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if COMMON_INITIALISMS.contains(upper.as_str()) {
        return upper;
    }
    if word.to_lowercase() == word {
        // Already all lowercase: capitalize only the first character.
        return capitalize_first(word);
    }
    // Irregular internal capitalization is preserved as-is.
    word.to_string()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
