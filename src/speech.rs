//! Reply cleanup and SSML construction for text-to-speech.
//!
//! Model replies tend to arrive as numbered lists with stray punctuation,
//! which reads badly aloud. [`clean_reply`] flattens them into prose and
//! [`to_ssml`] splits the prose into sentences separated by `<break>` tags.
//!
//! # Invariants
//! - [`to_ssml`] output always starts with `<speak>` and ends with `</speak>`.
//! - Sentence text inside the SSML is XML-escaped; only `<break>` tags are raw.

use regex::Regex;
use std::sync::OnceLock;

fn numbered_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+").expect("valid regex"))
}

fn symbol_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*[-*•][ \t]+").expect("valid regex"))
}

fn repeated_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(?:\s*,)+[ \t]*").expect("valid regex"))
}

fn repeated_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("valid regex"))
}

fn sentence_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([.!?]+)\s+").expect("valid regex"))
}

/// Strip list markers and collapse punctuation noise from a model reply.
///
/// - `1. ` / `2) ` at the start of a line are removed.
/// - `- `, `* `, `• ` at the start of a line are removed.
/// - Runs of commas (optionally separated by whitespace) become `", "`.
/// - Runs of spaces/tabs become one space; the result is trimmed.
pub fn clean_reply(text: &str) -> String {
    let text = numbered_bullet_re().replace_all(text, "");
    let text = symbol_bullet_re().replace_all(&text, "");
    let text = repeated_comma_re().replace_all(&text, ", ");
    let text = repeated_space_re().replace_all(&text, " ");
    text.trim().to_string()
}

/// Split prose into sentences after `.`, `!` or `?` followed by whitespace.
///
/// A run of terminators (`?!`, `...`) stays with its sentence. Trailing text
/// without a terminator becomes the final sentence. Empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;

    for caps in sentence_end_re().captures_iter(text) {
        let (Some(whole), Some(terminator)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_trimmed(&mut sentences, &text[start..terminator.end()]);
        start = whole.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Escape the five XML special characters.
pub fn escape_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build an SSML document with a `<break>` of `break_ms` between sentences.
///
/// A zero `break_ms` joins sentences with a plain space.
pub fn to_ssml(text: &str, break_ms: u32) -> String {
    let separator = if break_ms == 0 {
        " ".to_string()
    } else {
        format!(" <break time=\"{break_ms}ms\"/> ")
    };

    let body = split_sentences(text)
        .iter()
        .map(|s| escape_ssml(s))
        .collect::<Vec<_>>()
        .join(&separator);

    format!("<speak>{body}</speak>")
}
