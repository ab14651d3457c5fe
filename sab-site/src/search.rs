//! Flat search-index sidecar (§4.11): one entry per record, with a short
//! plain-text excerpt. Ported from `site_generator.py`'s `search_entries`/
//! `_extract_text`/`_collect_text`.

use serde::Serialize;

use genera_encoding::charset::{LINE_BREAK_MARKER, PARAGRAPH_MARKER};
use sab_format::value::{Command, Value};
use sab_format::Record;

#[derive(Serialize)]
pub struct SearchEntry {
    pub title: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub path: String,
    pub file: String,
    pub text: String,
}

pub fn page_title(records: &[Record]) -> String {
    records
        .first()
        .map(|r| r.name.text().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Joins every text fragment reachable from a record's `contents` field,
/// stripping paragraph/line-break markers to spaces, truncated to `max_len`
/// characters for the search excerpt.
pub fn extract_text(record: &Record, max_len: usize) -> String {
    let mut texts = Vec::new();
    if let Some((_, contents)) = record.fields.iter().find(|(n, _)| n == "contents") {
        collect_text(contents, &mut texts);
    }
    let joined = texts.join(" ");
    truncate_chars(&joined, max_len)
}

fn truncate_chars(s: &str, max_len: usize) -> String {
    s.chars().take(max_len).collect()
}

fn collect_text(value: &Value, texts: &mut Vec<String>) {
    match value {
        Value::Text(s) => {
            let clean = s.replace(PARAGRAPH_MARKER, " ").replace(LINE_BREAK_MARKER, " ");
            let trimmed = clean.trim();
            if !trimmed.is_empty() {
                texts.push(trimmed.to_string());
            }
        },
        Value::Name(n) => {
            let trimmed = n.text().trim();
            if !trimmed.is_empty() {
                texts.push(trimmed.to_string());
            }
        },
        Value::List(items) => {
            for item in items {
                collect_text(item, texts);
            }
        },
        Value::Envr(envr) => {
            for item in &envr.contents {
                collect_text(item, texts);
            }
        },
        Value::Command(Command { parameter, .. }) => {
            if !parameter.is_nil() {
                collect_text(parameter, texts);
            }
        },
        _ => {},
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use sab_format::value::Name;

    #[test]
    fn extracts_and_joins_nested_text() {
        let record = Record {
            name: Name::Plain("foo".to_string()),
            type_name: "function".to_string(),
            fields: vec![(
                "contents".to_string(),
                Value::List(vec![
                    Value::Text("hello".to_string()),
                    Value::Envr(Box::new(sab_format::value::Environment {
                        name: "b".to_string(),
                        mods: vec![],
                        contents: vec![Value::Text("world".to_string())],
                    })),
                ]),
            )],
        };
        assert_eq!(extract_text(&record, 300), "hello world");
    }

    #[test]
    fn truncates_to_max_len() {
        let record = Record {
            name: Name::Plain("foo".to_string()),
            type_name: "function".to_string(),
            fields: vec![("contents".to_string(), Value::List(vec![Value::Text("x".repeat(10))]))],
        };
        assert_eq!(extract_text(&record, 5).len(), 5);
    }
}
