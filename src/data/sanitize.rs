//! Turns HTML-encoded API text into plain display text.
//!
//! Raw markup tags are removed (script and style elements together with
//! their content), entities are decoded, and control characters are dropped
//! so nothing in a question can drive the terminal.

use std::borrow::Cow;

const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Decode a single API text field into display text.
pub fn decode_text(raw: &str) -> String {
    let without_tags = strip_tags(raw);
    let decoded = html_escape::decode_html_entities(without_tags.as_ref());

    decoded
        .split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_tags(raw: &str) -> Cow<'_, str> {
    if !raw.contains('<') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let opens_tag = tail[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');

        match tail.find('>') {
            Some(end) if opens_tag => {
                rest = &tail[end + 1..];
                if let Some(element) = raw_text_element(&tail[1..end]) {
                    rest = skip_element_body(rest, element);
                }
            }
            _ => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    let name: String = tag
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    RAW_TEXT_ELEMENTS.into_iter().find(|element| *element == name)
}

/// Skip past the closing tag of `element`, or everything if it never closes.
fn skip_element_body<'a>(rest: &'a str, element: &str) -> &'a str {
    let lowered = rest.to_ascii_lowercase();
    let closing = format!("</{element}");

    lowered
        .find(&closing)
        .and_then(|at| rest[at..].find('>').map(|end| &rest[at + end + 1..]))
        .unwrap_or("")
}
