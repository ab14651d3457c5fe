//! Paragraph/tab fix-up (§4.10): three passes over a content list that turn
//! the paragraph-marker sentinel into structural groups, so the renderer
//! never has to special-case a bare marker mid-list. No equivalent exists in
//! `original_source` — `html_renderer.py` calls a `_fix_up_special_markup`
//! that isn't present anywhere in the retrieved source — so this is built
//! directly from the prose description of its three passes.

use std::mem;

use genera_encoding::PARAGRAPH_MARKER;
use sab_format::value::{Environment, Value};

const BLOCK_LEVEL_NAMES: &[&str] = &[
    "example", "display", "enumerate", "itemize", "verbatim", "description",
    "center", "figure", "group", "multiple", "commentary",
    "header", "heading", "majorheading",
];

enum Item {
    Value(Value),
    Marker,
}

fn wrap_envr(name: &str, contents: Vec<Value>) -> Value {
    Value::Envr(Box::new(Environment { name: name.to_string(), mods: Vec::new(), contents }))
}

/// Pass 1: split any text item containing the paragraph-marker sentinel into
/// alternating text segments and marker items.
fn split_paragraph_markers(contents: &[Value]) -> Vec<Item> {
    let mut items = Vec::new();
    for value in contents {
        match value {
            Value::Text(s) if s.contains(PARAGRAPH_MARKER) => {
                let mut first = true;
                for segment in s.split(PARAGRAPH_MARKER) {
                    if !first {
                        items.push(Item::Marker);
                    }
                    first = false;
                    if !segment.is_empty() {
                        items.push(Item::Value(Value::Text(segment.to_string())));
                    }
                }
            },
            other => items.push(Item::Value(other.clone())),
        }
    }
    items
}

fn is_tab_to_tab_stop(item: &Item) -> bool {
    matches!(item, Item::Value(Value::Command(cmd)) if cmd.name == "tab-to-tab-stop")
}

/// Pass 2: group consecutive items between `tab-to-tab-stop` commands into
/// synthetic `nex-tab-to-tab-stop` environments, also flushing on a
/// paragraph marker. A no-op when no `tab-to-tab-stop` command is present.
fn group_tab_stops(items: Vec<Item>) -> Vec<Item> {
    if !items.iter().any(is_tab_to_tab_stop) {
        return items;
    }

    let mut out = Vec::new();
    let mut current = Vec::new();
    for item in items {
        if is_tab_to_tab_stop(&item) {
            out.push(Item::Value(wrap_envr("nex-tab-to-tab-stop", mem::take(&mut current))));
            continue;
        }
        match item {
            Item::Marker => {
                if !current.is_empty() {
                    out.push(Item::Value(wrap_envr("nex-tab-to-tab-stop", mem::take(&mut current))));
                }
                out.push(Item::Marker);
            },
            Item::Value(v) => current.push(v),
        }
    }
    if !current.is_empty() {
        out.push(Item::Value(wrap_envr("nex-tab-to-tab-stop", current)));
    }
    out
}

fn is_block_level(value: &Value) -> bool {
    match value {
        Value::Envr(envr) => {
            let name = envr.name.to_lowercase();
            BLOCK_LEVEL_NAMES.contains(&name.as_str()) || name.ends_with("format")
        },
        _ => false,
    }
}

/// Pass 3: group inline items between paragraph markers into synthetic
/// `nex-paragraph` environments, flushing also on a block-level environment
/// so paragraphs never wrap block elements.
fn group_paragraphs(items: Vec<Item>) -> Vec<Value> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for item in items {
        match item {
            Item::Marker => {
                if !current.is_empty() {
                    out.push(wrap_envr("nex-paragraph", mem::take(&mut current)));
                }
            },
            Item::Value(v) if is_block_level(&v) => {
                if !current.is_empty() {
                    out.push(wrap_envr("nex-paragraph", mem::take(&mut current)));
                }
                out.push(v);
            },
            Item::Value(v) => current.push(v),
        }
    }
    if !current.is_empty() {
        out.push(wrap_envr("nex-paragraph", current));
    }
    out
}

pub fn fix_up_special_markup(contents: &[Value]) -> Vec<Value> {
    let step1 = split_paragraph_markers(contents);
    let step2 = group_tab_stops(step1);
    group_paragraphs(step2)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn envr_name(v: &Value) -> Option<&str> {
        match v {
            Value::Envr(e) => Some(&e.name),
            _ => None,
        }
    }

    #[test]
    fn wraps_plain_text_as_one_paragraph() {
        let contents = vec![Value::Text("hello".to_string())];
        let fixed = fix_up_special_markup(&contents);
        assert_eq!(fixed.len(), 1);
        assert_eq!(envr_name(&fixed[0]), Some("nex-paragraph"));
    }

    #[test]
    fn splits_on_paragraph_marker_into_two_paragraphs() {
        let text = format!("first{}second", PARAGRAPH_MARKER);
        let contents = vec![Value::Text(text)];
        let fixed = fix_up_special_markup(&contents);
        assert_eq!(fixed.len(), 2);
        assert!(fixed.iter().all(|v| envr_name(v) == Some("nex-paragraph")));
    }

    #[test]
    fn block_level_environment_breaks_out_of_paragraph() {
        let contents = vec![
            Value::Text("before".to_string()),
            Value::Envr(Box::new(Environment { name: "example".to_string(), mods: vec![], contents: vec![] })),
            Value::Text("after".to_string()),
        ];
        let fixed = fix_up_special_markup(&contents);
        assert_eq!(fixed.len(), 3);
        assert_eq!(envr_name(&fixed[0]), Some("nex-paragraph"));
        assert_eq!(envr_name(&fixed[1]), Some("example"));
        assert_eq!(envr_name(&fixed[2]), Some("nex-paragraph"));
    }

    #[test]
    fn groups_tab_stops_between_tab_commands() {
        use sab_format::value::Command;
        let contents = vec![
            Value::Text("col1".to_string()),
            Value::Command(Box::new(Command { name: "tab-to-tab-stop".to_string(), parameter: Value::nil() })),
            Value::Text("col2".to_string()),
        ];
        let fixed = fix_up_special_markup(&contents);
        // both tab-stop groups collapse into one paragraph containing two envrs
        assert_eq!(fixed.len(), 1);
        assert_eq!(envr_name(&fixed[0]), Some("nex-paragraph"));
        match &fixed[0] {
            Value::Envr(envr) => {
                assert_eq!(envr.contents.len(), 2);
                assert!(envr.contents.iter().all(|v| envr_name(v) == Some("nex-tab-to-tab-stop")));
            },
            _ => panic!("expected nex-paragraph envr"),
        }
    }
}
