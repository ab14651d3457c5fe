//! Parsed SAB AST -> HTML (§4.10). Ported from
//! `original_source/sab2html/html_renderer.py`'s environment/command/
//! reference dispatch tables. The one piece of that module with no
//! retrievable source (`_fix_up_special_markup`) lives in [`fixup`], built
//! straight from the spec prose describing its three passes.

pub mod fixup;

use std::collections::HashMap;

use sab_format::value::{Command, Environment, Name, Picture, Reference, UniqueId, Value};
use sab_format::{value_to_unique_id, IndexItem, Record};
use sab_xref::{get_html_path, relative_link, slugify, RecordRegistry};

const STRUCTURAL_TYPES: &[&str] = &["section", "subsection", "subsubsection", "chapter"];

const SILENT_COMMANDS: &[&str] = &[
    "indexsecondary", "tabdivide", "permanentstring",
    "collect-centering", "collect-right-flushing",
    "dynamic-left-margin", "plainheadingsnow", "plainheadings",
    "pagefooting", "pageheading", "pageref", "blocklabel",
    "hinge", "make", "tabclear", "tabset",
    "endexamplecompiledprologue", "replicate-pattern",
    "simpletablespecs", "dictionarytabs", "note", "bar",
    "abbreviation-period", "missing-special-character",
    "layerederror", "include", "lisp:case",
    "common-lisp:string", "lisp:string",
];

const KNOWN_ENVR_CLASSES: &[&str] = &[
    "quotation", "advancednote", "plus", "minus", "crossref",
    "table", "simpletable", "checklist", "equation", "verse",
    "text", "level", "flushright", "flushleft", "inputexample",
    "fileexample", "programexample", "outputexample", "activeexample",
    "box", "subheading", "subsubheading", "captionenv",
    "common-lisp:block", "lisp:block", "c-description",
    "bar", "old-bar-environment", "largestyle", "titlestyle",
    "transparent", "layerederrorenv", "lisp:float", "fullpagefigure",
    "fullpagetable",
];

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ if is_illegal_xml_char(c) => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
    out
}

fn is_illegal_xml_char(c: char) -> bool {
    let code = c as u32;
    matches!(code, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F..=0x84 | 0x86..=0x9F)
}

/// Per-render context: the registry to resolve links against, the HTML path
/// of the page currently being rendered, and the `unique_id` of the record
/// currently being rendered (so reference rendering can look up its callees).
pub struct RenderContext<'a> {
    pub registry: Option<&'a RecordRegistry>,
    pub current_file: Option<&'a str>,
    pub record_unique_id: Option<UniqueId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: Option<&'a RecordRegistry>, current_file: Option<&'a str>) -> Self {
        Self { registry, current_file, record_unique_id: None }
    }

    fn resolve_href(&self, unique_id: Option<&UniqueId>, topic_name: Option<&str>) -> String {
        let Some(registry) = self.registry else { return "#".to_string() };
        let Some(entry) = registry.resolve_reference(unique_id, topic_name) else {
            return "#".to_string();
        };
        let html_path = get_html_path(&entry.relpath);
        let anchor = slugify(&entry.topic_name);
        match self.current_file {
            Some(current) => relative_link(current, &html_path, &anchor),
            None => format!("{}#{}", html_path, anchor),
        }
    }
}

fn field<'r>(record: &'r Record, name: &str) -> Option<&'r Value> {
    record.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

fn content_list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::List(items)) => items,
        _ => &[],
    }
}

fn name_text(name: &Name) -> &str {
    name.text()
}

/// Strips a Lisp package prefix (`LISP:first` -> `first`), leaving keyword
/// symbols (`:foo`) untouched.
fn strip_package_prefix(name: &str) -> &str {
    if let Some(idx) = name.find(':') {
        if idx > 0 {
            return &name[idx + 1..];
        }
    }
    name
}

/// Crude approximation of Python's `str.title()`: capitalize the first
/// alphabetic character of each run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn format_type_label(type_name: &str) -> String {
    if type_name.is_empty() {
        return String::new();
    }
    title_case(strip_package_prefix(type_name).trim())
}

/// Renders a record's content list (after paragraph/tab fix-up) to an HTML
/// section with a typed heading: structural types get a plain heading,
/// everything else gets a three-part entry heading (name, arglist, type).
pub fn render_record_to_html(record: &Record, ctx: &RenderContext, heading_tag: &str) -> String {
    let title_html = format_record_title(record);
    let contents = content_list(field(record, "contents"));
    let body = render_content_list(contents, ctx);

    let display_name = match &record.name {
        Name::FunctionSpec(s) | Name::Plain(s) => s.as_str(),
    };
    let anchor = slugify(display_name);

    let is_entry = !STRUCTURAL_TYPES.contains(&record.type_name.to_lowercase().as_str());
    let class_attr = if is_entry { " class=\"entry\"" } else { "" };

    let heading = if is_entry {
        let arglist = field(record, "arglist").or_else(|| field(record, "symbolics-common-lisp:arglist"));
        let arglist_html = match arglist {
            Some(Value::List(items)) if !items.is_empty() => render_content_list(items, ctx).trim().to_string(),
            _ => String::new(),
        };
        let type_label = format_type_label(&record.type_name);

        let mut parts = vec![format!("<span class=\"entry-name\">{}</span>", title_html)];
        if !arglist_html.is_empty() {
            parts.push(format!("<span class=\"entry-args\">{}</span>", arglist_html));
        }
        if !type_label.is_empty() {
            parts.push(format!("<span class=\"entry-type\">{}</span>", type_label));
        }
        format!(
            "<{tag} class=\"entry-heading\">\n  {inner}\n</{tag}>",
            tag = heading_tag,
            inner = parts.join("\n  "),
        )
    } else {
        format!("<{tag}>{title}</{tag}>", tag = heading_tag, title = title_html)
    };

    format!(
        "<section id=\"{anchor}\"{class}>\n{heading}\n{body}\n</section>\n",
        anchor = anchor,
        class = class_attr,
    )
}

/// Renders a whole file's records to a full HTML page, with
/// `{{CSS_PATH}}`/`{{INDEX_PATH}}`/`{{LOGO_PATH}}`/`{{SEARCH_JS_PATH}}`
/// template placeholders left for the site driver to fill in.
pub fn render_records_to_html(
    records: &[Record],
    index: &[IndexItem],
    registry: Option<&RecordRegistry>,
    current_file: Option<&str>,
    title: &str,
) -> String {
    let mut parts = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let mut ctx = RenderContext::new(registry, current_file);
        ctx.record_unique_id = index.get(i).and_then(|item| {
            item.fields.iter().find(|(n, _)| n == "unique-id").and_then(|(_, v)| value_to_unique_id(v.clone()))
        });
        let tag = if i == 0 { "h1" } else { "h2" };
        parts.push(render_record_to_html(record, &ctx, tag));
    }

    let body = parts.join("\n");
    let page_title = if title.is_empty() { "SAB Document" } else { title };

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
  <meta charset=\"utf-8\">\n\
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
  <title>{page_title}</title>\n\
  <link rel=\"stylesheet\" href=\"{{{{CSS_PATH}}}}\">\n\
</head>\n\
<body>\n\
<header class=\"site-header\">\n\
  <div class=\"header-left\">\n\
    <a href=\"{{{{INDEX_PATH}}}}\" class=\"header-logo\">\n\
      <img src=\"{{{{LOGO_PATH}}}}\" alt=\"Symbolics\">\n\
    </a>\n\
    <span class=\"header-title\">Portable Genera 9.0 Documentation</span>\n\
  </div>\n\
  <div class=\"header-search\">\n\
    <input type=\"text\" id=\"header-search-input\" placeholder=\"Search documentation...\" autocomplete=\"off\">\n\
    <div id=\"header-search-results\" class=\"search-dropdown\"></div>\n\
  </div>\n\
</header>\n\
<main class=\"content\">\n\
{body}\n\
</main>\n\
<script src=\"{{{{SEARCH_JS_PATH}}}}\"></script>\n\
</body>\n\
</html>\n",
        page_title = xml_escape(page_title),
        body = body,
    )
}

fn format_record_title(record: &Record) -> String {
    if let Some(Value::List(items)) = field(record, "source-title") {
        if !items.is_empty() {
            let ctx = RenderContext::new(None, None);
            return render_content_list(items, &ctx);
        }
    }
    match &record.name {
        Name::FunctionSpec(s) => xml_escape(s),
        Name::Plain(s) => xml_escape(s),
    }
}

/// Renders a content list without paragraph fix-up: paragraph markers become
/// plain newlines instead of `<p>` boundaries. Used by pre-wrap environments
/// like `display`.
fn render_content_list_raw(contents: &[Value], ctx: &RenderContext) -> String {
    contents.iter().map(|item| render_sage(item, ctx)).collect()
}

fn render_content_list(contents: &[Value], ctx: &RenderContext) -> String {
    if contents.is_empty() {
        return String::new();
    }
    let processed = fixup::fix_up_special_markup(contents);
    processed.iter().map(|item| render_sage(item, ctx)).collect()
}

fn render_sage(value: &Value, ctx: &RenderContext) -> String {
    match value {
        Value::Text(s) => render_text(s),
        Value::Name(n) => render_text(n.text()),
        Value::Envr(envr) => render_envr(envr, ctx),
        Value::Command(cmd) => render_command(cmd, ctx),
        Value::Reference(r) => render_reference(r, ctx),
        Value::Picture(pic) => render_picture(pic, ctx),
        Value::ExampleRecordMarker(_) => "<div class=\"example-record-marker\"></div>".to_string(),
        Value::List(items) => items.iter().map(|item| render_sage(item, ctx)).collect(),
        Value::Number(n) => xml_escape(&n.to_string()),
        _ => String::new(),
    }
}

/// `LINE_BREAK_MARKER` becomes a plain newline: in `<pre>` blocks this
/// preserves the break; in flowing text the browser collapses it to a
/// space, which is correct for filled paragraphs.
fn render_text(text: &str) -> String {
    xml_escape(text)
        .replace(genera_encoding::charset::PARAGRAPH_MARKER, "</p>\n<p>")
        .replace(genera_encoding::charset::LINE_BREAK_MARKER, "\n")
}

fn render_envr(envr: &Environment, ctx: &RenderContext) -> String {
    let content = render_content_list(&envr.contents, ctx);
    let name = envr.name.to_lowercase();

    match name.as_str() {
        "b" => return format!("<b>{}</b>", content),
        "bi" => return format!("<b><i>{}</i></b>", content),
        "i" => return format!("<i>{}</i>", content),
        "r" | "g" | "w" | "p" | "s" | "f" => return format!("<span class=\"{}\">{}</span>", name, content),
        "k" | "m" | "ls" | "t" => return format!("<code class=\"{}\">{}</code>", name, content),
        "c" => return format!("<span class=\"pathname\">{}</span>", content),
        "u" | "un" | "ux" => return format!("<span class=\"underline\">{}</span>", content),
        "example" => return format!("<div class=\"example\"><pre>{}</pre></div>", content),
        "display" => {
            let raw = render_content_list_raw(&envr.contents, ctx);
            return format!("<div class=\"display\">{}</div>", raw.trim());
        },
        "enumerate" => return format!("<ol class=\"enumerate\">{}</ol>", extract_list_items(&envr.contents, ctx)),
        "itemize" => return format!("<ul class=\"itemize\">{}</ul>", extract_list_items(&envr.contents, ctx)),
        "verbatim" => return format!("<pre class=\"verbatim\">{}</pre>", content),
        "description" => return format!("<div class=\"description\">{}</div>", content),
        "center" => return format!("<div class=\"center\">{}</div>", content),
        "figure" => return format!("<div class=\"figure\">{}</div>", content),
        "group" => return format!("<div class=\"group\">{}</div>", content),
        "multiple" => return format!("<div class=\"multiple\">{}</div>", content),
        "commentary" => return format!("<div class=\"commentary\">{}</div>", content),
        "header" => return format!("<h3 class=\"header\">{}</h3>", content),
        "heading" => return format!("<h4 class=\"heading\">{}</h4>", content),
        "majorheading" => return format!("<h3 class=\"majorheading\">{}</h3>", content),
        "common-lisp:-" | "lisp:-" => return format!("<sub>{}</sub>", content),
        "common-lisp:+" | "lisp:+" => return format!("<sup>{}</sup>", content),
        "lisp:t" | "common-lisp:t" => return format!("<span class=\"true\">{}</span>", content),
        "lisp:format" | "common-lisp:format" | "global:format" => return format!("<div class=\"format\">{}</div>", content),
        "nex-tab-to-tab-stop" => return format!("<span class=\"tab-stop\">{}</span>", content),
        "nex-paragraph" => return format!("<p>{}</p>", content),
        _ => {},
    }

    if KNOWN_ENVR_CLASSES.contains(&name.as_str()) {
        return format!("<div class=\"{}\">{}</div>", xml_escape(&name), content);
    }

    format!("<div class=\"unknown-env\" data-name=\"{}\">{}</div>", xml_escape(&name), content)
}

/// Extracts list items from an itemize/enumerate body: each `nex-paragraph`
/// produced by the fix-up becomes its own `<li>`; anything else accumulates
/// into the item currently being built.
fn extract_list_items(contents: &[Value], ctx: &RenderContext) -> String {
    let processed = fixup::fix_up_special_markup(contents);
    let mut items = Vec::new();
    let mut current = String::new();
    for item in &processed {
        match item {
            Value::Envr(envr) if envr.name == "nex-paragraph" => {
                if !current.is_empty() {
                    items.push(std::mem::take(&mut current));
                }
                items.push(render_content_list(&envr.contents, ctx));
            },
            other => current.push_str(&render_sage(other, ctx)),
        }
    }
    if !current.is_empty() {
        items.push(current);
    }

    if items.is_empty() {
        return render_content_list(contents, ctx);
    }

    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .map(|item| format!("<li>{}</li>", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_command(cmd: &Command, ctx: &RenderContext) -> String {
    match cmd.name.as_str() {
        "em" => return "\u{2014}".to_string(),
        "force-line-break" => return "<br>".to_string(),
        "literal-space" => return " ".to_string(),
        "permit-word-break" => return "\u{200b}".to_string(),
        "ignore-white-space" => return String::new(),
        "tab-to-tab-stop" => return "<span class=\"tab-stop\"></span>".to_string(),
        "subsection" => return format!("<h4>{}</h4>", xml_escape(&extract_param_text(&cmd.parameter))),
        "blankspace" => return render_blankspace(&cmd.parameter),
        "tag" => return format!("<a id=\"{}\" class=\"tag\"></a>", xml_escape(&extract_param_text(&cmd.parameter))),
        "label" => return format!("<a id=\"{}\" class=\"label\"></a>", xml_escape(&extract_param_text(&cmd.parameter))),
        "ref" => {
            let target = xml_escape(&extract_param_text(&cmd.parameter));
            return format!("<a href=\"#{}\">{}</a>", target, target);
        },
        "index" => return String::new(),
        "l" => {
            let param_text = extract_param_text(&cmd.parameter);
            let display_text = xml_escape(strip_package_prefix(&param_text));
            let stripped = strip_package_prefix(&param_text).to_string();
            let href = ctx.registry.map(|_| ctx.resolve_href(None, Some(&stripped)));
            return match href {
                Some(href) if href != "#" => format!("<b><a href=\"{}\">{}</a></b>", href, display_text),
                _ => format!("<b>{}</b>", display_text),
            };
        },
        "value" => return format!("<var>{}</var>", xml_escape(&extract_param_text(&cmd.parameter))),
        "caption" => return format!("<div class=\"caption\">{}</div>", xml_escape(&extract_param_text(&cmd.parameter))),
        "newpage" => return "<hr class=\"page-break\">".to_string(),
        _ => {},
    }

    if SILENT_COMMANDS.contains(&cmd.name.as_str()) {
        return String::new();
    }

    String::new()
}

fn render_blankspace(parameter: &Value) -> String {
    let default = "<div class=\"blankspace\" style=\"height: 1em;\"></div>".to_string();

    let el = match parameter {
        Value::List(items) if !items.is_empty() => &items[0],
        _ => return default,
    };
    let Value::List(el_items) = el else { return default };

    let (count, unit) = match el_items.len() {
        3 => (&el_items[1], &el_items[2]),
        2 => (&el_items[0], &el_items[1]),
        _ => return default,
    };

    let count_str = match count {
        Value::Number(n) => n.to_string(),
        Value::Text(s) => s.clone(),
        _ => return default,
    };
    let unit_str = unit.as_text().unwrap_or("");

    let height = match unit_str {
        "lines" => format!("{}em", count_str),
        "inches" => format!("{}in", count_str),
        "cm" => format!("{}cm", count_str),
        _ => format!("{}em", count_str),
    };

    format!("<div class=\"blankspace\" style=\"height: {};\"></div>", height)
}

fn extract_param_text(parameter: &Value) -> String {
    match parameter {
        Value::Text(s) => s.clone(),
        Value::Name(n) => n.text().to_string(),
        Value::List(items) => match items.first() {
            None => String::new(),
            Some(Value::Text(s)) => s.clone(),
            Some(Value::Name(n)) => n.text().to_string(),
            Some(Value::List(inner)) => match inner.first() {
                Some(v) => extract_param_text(v),
                None => String::new(),
            },
            Some(other) => format!("{:?}", other),
        },
        Value::Number(n) => n.to_string(),
        other => format!("{:?}", other),
    }
}

/// Reference rendering (§4.10): appearance governs most of the dispatch;
/// when absent, the current record's callee-list (via `called-how`) governs
/// it instead. Every branch ends with a trailing newline so consecutive
/// references get whitespace between them in flowing HTML.
fn render_reference(reference: &Reference, ctx: &RenderContext) -> String {
    let topic_str = name_text(&reference.topic);
    let display_str = xml_escape(strip_package_prefix(topic_str));

    match reference.appearance.as_deref() {
        Some("invisible") => return String::new(),
        Some("topic") => {
            let href = resolve_reference_href(reference, ctx);
            return format!("<span class=\"ref-topic\">\u{201c}<a href=\"{}\">{}</a>\u{201d}</span>\n", href, display_str);
        },
        Some("see") => {
            let href = resolve_reference_href(reference, ctx);
            let type_str = xml_escape(strip_package_prefix(&reference.type_name));
            let cap_s = if reference.booleans.iter().any(|b| b == "initial-cap") { "S" } else { "s" };
            let period = if reference.booleans.iter().any(|b| b == "final-period") { "." } else { "" };
            return format!(
                "<span class=\"ref-see\">{}ee the {} <a href=\"{}\">{}</a>{}</span>\n",
                cap_s, type_str, href, display_str, period,
            );
        },
        _ => {},
    }

    let appearance_is_nil = match reference.appearance.as_deref() {
        None => true,
        Some(a) => {
            let lower = a.to_lowercase();
            lower == "lisp:nil" || lower == "common-lisp:nil"
        },
    };
    if appearance_is_nil {
        let callee_type = get_callee_type(reference, ctx);
        let href = resolve_reference_href(reference, ctx);
        return match callee_type {
            Some("expand") | Some("Expand") => {
                format!("<div class=\"ref-expand\"><a href=\"{}\">{}</a></div>\n", href, display_str)
            },
            Some("topic") => {
                format!("<span class=\"ref-topic\">\u{201c}<a href=\"{}\">{}</a>\u{201d}</span>\n", href, display_str)
            },
            Some("crossreference") | Some("CrossRef") | Some("crossref") => {
                format!("<span class=\"ref-crossref\"><a href=\"{}\">{}</a></span>\n", href, display_str)
            },
            Some("precis") | Some("contents") | Some("operation") => {
                format!("<span class=\"ref-topic\">\u{201c}<a href=\"{}\">{}</a>\u{201d}</span>\n", href, display_str)
            },
            _ => format!("<a href=\"{}\">{}</a>\n", href, display_str),
        };
    }

    let href = resolve_reference_href(reference, ctx);
    format!("<a href=\"{}\">{}</a>\n", href, display_str)
}

fn get_callee_type<'a>(reference: &Reference, ctx: &'a RenderContext) -> Option<&'a str> {
    let registry = ctx.registry?;
    let record_uid = ctx.record_unique_id.as_ref()?;
    let callee_uid = reference.unique_id.as_ref()?;
    registry.get_callee_type(record_uid, callee_uid)
}

fn resolve_reference_href(reference: &Reference, ctx: &RenderContext) -> String {
    ctx.resolve_href(reference.unique_id.as_ref(), Some(name_text(&reference.topic)))
}

/// Decodes and renders a picture's embedded graphics; any decode/render
/// failure degrades to a placeholder rather than aborting the page.
fn render_picture(picture: &Picture, ctx: &RenderContext) -> String {
    if picture.raw.is_empty() {
        return format!("<div class=\"picture\"><p>Picture: {}</p></div>", xml_escape(&picture.display_name));
    }

    match sab_graphics::decode(&picture.raw) {
        Ok(ops) => {
            let resolver = |text: &str| -> Option<String> {
                let registry = ctx.registry?;
                let entry = registry.resolve_reference(None, Some(text))?;
                let html_path = get_html_path(&entry.relpath);
                let anchor = slugify(&entry.topic_name);
                Some(match ctx.current_file {
                    Some(current) => relative_link(current, &html_path, &anchor),
                    None => format!("{}#{}", html_path, anchor),
                })
            };
            let link_resolver: Option<&dyn sab_graphics::LinkResolver> =
                if ctx.registry.is_some() { Some(&resolver) } else { None };
            let svg = sab_graphics::render_picture_to_svg(&ops, link_resolver);
            format!("<div class=\"picture\">\n{}\n</div>", svg)
        },
        Err(e) => format!(
            "<div class=\"picture\"><p>Picture: {} (error: {})</p></div>",
            xml_escape(&picture.display_name),
            xml_escape(&e.to_string()),
        ),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use sab_format::value::Name;

    fn record(type_name: &str, contents: Vec<Value>) -> Record {
        Record {
            name: Name::Plain("foo".to_string()),
            type_name: type_name.to_string(),
            fields: vec![("contents".to_string(), Value::List(contents))],
        }
    }

    #[test]
    fn structural_record_gets_plain_heading() {
        let rec = record("section", vec![Value::Text("body".to_string())]);
        let ctx = RenderContext::new(None, None);
        let html = render_record_to_html(&rec, &ctx, "h1");
        assert!(html.contains("<h1>foo</h1>"));
        assert!(!html.contains("class=\"entry\""));
    }

    #[test]
    fn entry_record_gets_structured_heading() {
        let rec = record("function", vec![Value::Text("body".to_string())]);
        let ctx = RenderContext::new(None, None);
        let html = render_record_to_html(&rec, &ctx, "h2");
        assert!(html.contains("class=\"entry\""));
        assert!(html.contains("entry-name"));
        assert!(html.contains("entry-type"));
        assert!(html.contains("Function"));
    }

    #[test]
    fn bold_environment_renders_as_b_tag() {
        let envr = Environment { name: "b".to_string(), mods: vec![], contents: vec![Value::Text("x".to_string())] };
        let ctx = RenderContext::new(None, None);
        assert_eq!(render_envr(&envr, &ctx), "<b>x</b>");
    }

    #[test]
    fn invisible_reference_renders_nothing() {
        let reference = Reference {
            topic: Name::Plain("foo".to_string()),
            type_name: "function".to_string(),
            unique_id: None,
            view: Value::nil(),
            appearance: Some("invisible".to_string()),
            booleans: vec![],
            field: Value::nil(),
        };
        let ctx = RenderContext::new(None, None);
        assert_eq!(render_reference(&reference, &ctx), "");
    }

    #[test]
    fn see_reference_capitalizes_on_initial_cap_boolean() {
        let reference = Reference {
            topic: Name::Plain("bar".to_string()),
            type_name: "function".to_string(),
            unique_id: None,
            view: Value::nil(),
            appearance: Some("see".to_string()),
            booleans: vec!["initial-cap".to_string(), "final-period".to_string()],
            field: Value::nil(),
        };
        let ctx = RenderContext::new(None, None);
        let html = render_reference(&reference, &ctx);
        assert!(html.starts_with("<span class=\"ref-see\">See the Function"));
        assert!(html.trim_end().ends_with('.'));
    }

    #[test]
    fn unknown_command_is_silent() {
        let cmd = Command { name: "some-unrecognized-command".to_string(), parameter: Value::nil() };
        let ctx = RenderContext::new(None, None);
        assert_eq!(render_command(&cmd, &ctx), "");
    }

    #[test]
    fn blankspace_without_parameter_uses_default_height() {
        assert_eq!(render_blankspace(&Value::nil()), "<div class=\"blankspace\" style=\"height: 1em;\"></div>");
    }
}
