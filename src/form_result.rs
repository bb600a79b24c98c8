//! Contact form result view: decodes submitted query-string pairs and
//! renders them with every value HTML-escaped.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::text::escape_html;

static FIELD_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("name", "Name"),
        ("email", "Email Address"),
        ("subject", "Subject"),
        ("showSuggestion", "Show Suggestion"),
        ("message", "Message"),
        ("subscribe", "Newsletter Subscription"),
    ])
});

const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "subject"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub value: String,
}

/// Splits `a=1&b=2` (optionally prefixed with `?`) into ordered pairs.
/// `+` decodes to a space; bytes that are not valid UTF-8 become U+FFFD.
pub fn decode_query(raw: &str) -> Vec<(String, String)> {
    raw.trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn label_for(key: &str) -> String {
    if let Some(label) = FIELD_LABELS.get(key) {
        return label.to_string();
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn describe(pairs: &[(String, String)]) -> Vec<FormField> {
    pairs
        .iter()
        .map(|(key, value)| {
            let value = if key == "subscribe" {
                if value == "yes" {
                    "Yes, subscribe me".to_string()
                } else {
                    "No".to_string()
                }
            } else if value.is_empty() {
                "Not provided".to_string()
            } else {
                value.clone()
            };
            FormField {
                label: label_for(key),
                value,
            }
        })
        .collect()
}

pub fn render_html(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return "<p>No form data received.</p>".to_string();
    }
    describe(pairs)
        .into_iter()
        .map(|f| {
            format!(
                "<div class=\"result-item\">\n    <strong>{}:</strong>\n    <span>{}</span>\n</div>",
                escape_html(&f.label),
                escape_html(&f.value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_text(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return "No form data received.\n".to_string();
    }
    describe(pairs)
        .into_iter()
        .map(|f| format!("{}: {}\n", f.label, f.value))
        .collect()
}

/// Required contact fields that are missing or blank.
pub fn missing_required(pairs: &[(String, String)]) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| {
            !pairs
                .iter()
                .any(|(k, v)| k == field && !v.trim().is_empty())
        })
        .collect()
}
