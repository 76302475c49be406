//! Version digit extraction from header values and page markup.

use regex::Regex;
use std::sync::OnceLock;

/// Find the Drupal `<meta name="generator">` tag in a page body.
///
/// The match is case-sensitive and confined to a single line. It returns
/// the matched substring, from `<meta` up to the last `"` on that line.
pub(crate) fn meta_generator(body: &str) -> Option<&str> {
    static META_GENERATOR: OnceLock<Regex> = OnceLock::new();
    let re = META_GENERATOR.get_or_init(|| {
        Regex::new(r#"<meta name="generator" content="Drupal .*""#).expect("Invalid regex pattern")
    });

    re.find(body).map(|m| m.as_str())
}

/// Extract the first ASCII decimal digit in `text`.
///
/// Only a single digit is captured, so `Drupal 10.1` yields `1`.
pub(crate) fn first_digit(text: &str) -> Option<u8> {
    text.bytes()
        .find(u8::is_ascii_digit)
        .map(|b| b - b'0')
}
