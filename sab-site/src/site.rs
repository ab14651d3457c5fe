//! The two-pass site build (§4.11): `RecordRegistry::scan_all` then a
//! per-file convert pass, ported from `site_generator.py`'s `generate_site`.
//! Category naming, CSS/JS asset copying, and the search HTML page are out
//! of scope (external presentation glue per spec.md §1) — categorization is
//! purely by path prefix and `index.html` lists files per category without a
//! display-name lookup table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use sab_format::SabFile;
use sab_xref::RecordRegistry;

use crate::error::Error;
use crate::search::{extract_text, page_title, SearchEntry};

/// Recursively collects every file under `base_dir` whose name contains
/// `.sab.`, sorted for deterministic output.
fn collect_sab_files(base_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut dirs = vec![base_dir.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
                continue;
            }
            let is_sab = path.file_name().and_then(|n| n.to_str()).map(|n| n.contains(".sab.")).unwrap_or(false);
            if is_sab {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// First path component, or `doc/<second component>` when the first is
/// `doc` — the simplified categorization spec.md's Non-goals leave in scope
/// (the full `CATEGORY_NAMES` localization table is excluded).
fn categorize(relpath: &str) -> String {
    let parts: Vec<&str> = relpath.split('/').collect();
    if parts.len() >= 2 {
        if parts[0] == "doc" {
            if parts.len() >= 3 {
                format!("doc/{}", parts[1])
            } else {
                "doc/misc".to_string()
            }
        } else {
            parts[0].to_string()
        }
    } else {
        "other".to_string()
    }
}

fn fill_template_paths(html: &str, depth: usize) -> String {
    let prefix = "../".repeat(depth);
    html.replace("{{CSS_PATH}}", &format!("{}style.css", prefix))
        .replace("{{INDEX_PATH}}", &format!("{}index.html", prefix))
        .replace("{{LOGO_PATH}}", &format!("{}logo.png", prefix))
        .replace("{{SEARCH_JS_PATH}}", &format!("{}search.js", prefix))
}

fn convert_one(
    filepath: &Path,
    input_dir: &Path,
    output_dir: &Path,
    registry: &RecordRegistry,
    emit_xml: bool,
) -> Result<(String, SabFile, String), Error> {
    let relpath = filepath.strip_prefix(input_dir).unwrap_or(filepath).to_string_lossy().replace('\\', "/");
    let html_relpath = sab_xref::get_html_path(&relpath);

    let data = fs::read(filepath)?;
    let file = SabFile::read(&data)?;

    let title = page_title(&file.records);
    let depth = html_relpath.matches('/').count();
    let html = sab_html::render_records_to_html(&file.records, &file.index, Some(registry), Some(&html_relpath), &title);
    let html = fill_template_paths(&html, depth);

    let out_path = output_dir.join(&html_relpath);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, &html)?;

    if emit_xml {
        let xml = sab_xml::emit_xml(&file, &relpath)?;
        let xml_path = out_path.with_extension("xml");
        fs::write(&xml_path, &xml)?;
    }

    Ok((relpath, file, html_relpath))
}

/// Runs the full two-pass build: registry scan, per-file HTML (and
/// optionally XML) emission, a `search-index.json` sidecar, and a minimal
/// `index.html`. Per-file failures are logged and counted; one bad file
/// does not abort the build.
pub fn build(input_dir: &Path, output_dir: &Path, emit_xml: bool) {
    info!(dir = %input_dir.display(), "scanning archive");
    let mut registry = RecordRegistry::new();
    let file_count = registry.scan_all(input_dir);
    info!(file_count, "pass 1 complete");

    let sab_files = collect_sab_files(input_dir);
    fs::create_dir_all(output_dir).expect("failed to create output directory");

    let mut ok = 0usize;
    let mut fail = 0usize;
    let mut search_entries = Vec::new();
    let mut file_index: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();

    for filepath in &sab_files {
        match convert_one(filepath, input_dir, output_dir, &registry, emit_xml) {
            Ok((relpath, file, html_relpath)) => {
                for record in &file.records {
                    search_entries.push(SearchEntry {
                        title: record.name.text().to_string(),
                        type_name: record.type_name.clone(),
                        path: html_relpath.clone(),
                        file: relpath.clone(),
                        text: extract_text(record, 300),
                    });
                }

                let title = page_title(&file.records);
                let category = categorize(&relpath);
                file_index.entry(category).or_default().push((title, html_relpath));

                ok += 1;
            },
            Err(e) => {
                fail += 1;
                let relpath = filepath.strip_prefix(input_dir).unwrap_or(filepath).to_string_lossy().into_owned();
                warn!("FAIL: {} - {}: {}", relpath, e.kind(), e);
            },
        }
    }
    info!(ok, fail, "pass 2 complete");

    let search_path = output_dir.join("search-index.json");
    let search_file = fs::File::create(&search_path).expect("failed to create search-index.json");
    serde_json::to_writer(search_file, &search_entries).expect("failed to write search-index.json");
    info!(entries = search_entries.len(), "wrote search index");

    let index_html = render_index_page(&file_index, ok, fail);
    fs::write(output_dir.join("index.html"), index_html).expect("failed to write index.html");
    info!("done");
}

fn render_index_page(file_index: &BTreeMap<String, Vec<(String, String)>>, ok: usize, fail: usize) -> String {
    let mut sections = String::new();
    for (category, files) in file_index {
        let mut sorted = files.clone();
        sorted.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
        let items: String = sorted
            .iter()
            .map(|(title, path)| format!("        <li><a href=\"{}\">{}</a></li>\n", path, xml_escape(title)))
            .collect();
        sections.push_str(&format!(
            "    <div class=\"index-section\">\n      <h2>{} ({})</h2>\n      <ul>\n{}      </ul>\n    </div>\n",
            xml_escape(category),
            sorted.len(),
            items,
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
  <meta charset=\"utf-8\">\n\
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
  <title>Symbolics Genera Documentation</title>\n\
  <link rel=\"stylesheet\" href=\"style.css\">\n\
</head>\n\
<body>\n\
<h1>Symbolics Genera Documentation</h1>\n\
<p class=\"stats\">{ok} files converted, {fail} errors</p>\n\
{sections}\
</body>\n\
</html>\n",
        ok = ok,
        fail = fail,
        sections = sections,
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_doc_subdirectories() {
        assert_eq!(categorize("doc/clim/overview.sab"), "doc/clim");
        assert_eq!(categorize("doc/overview.sab"), "doc/misc");
        assert_eq!(categorize("contributed/foo.sab"), "contributed");
        assert_eq!(categorize("onlyone.sab"), "other");
    }

    #[test]
    fn fills_template_placeholders_with_relative_prefix() {
        let html = "<link href=\"{{CSS_PATH}}\"><a href=\"{{INDEX_PATH}}\">";
        assert_eq!(fill_template_paths(html, 2), "<link href=\"../../style.css\"><a href=\"../../index.html\">");
    }
}
