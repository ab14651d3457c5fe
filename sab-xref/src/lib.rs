//! The cross-reference registry (§4.8): a two-pass index over every SAB
//! file in an archive, built once during pass 1 and consulted read-only
//! during pass 2's rendering. Ported from
//! `original_source/sab2html/cross_references.py`'s `RecordRegistry`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, instrument, warn};

use sab_format::value::{Name, UniqueId, Value};
use sab_format::{read_index_only, value_to_unique_id};

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub relpath: String,
    pub topic_name: String,
    pub type_name: String,
}

#[derive(Clone, Debug, PartialEq)]
struct NameEntry {
    relpath: String,
    unique_id: UniqueId,
    type_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalleeInfo {
    pub topic_name: String,
    pub type_name: String,
    pub called_how: String,
    pub callee_unique_id: Option<UniqueId>,
}

#[derive(Debug, Default)]
pub struct RecordRegistry {
    by_id: HashMap<UniqueId, Entry>,
    by_index: HashMap<i64, Entry>,
    by_name: HashMap<String, NameEntry>,
    callees: HashMap<UniqueId, Vec<CalleeInfo>>,
}

impl RecordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass 1: scan one file's index section, folding its records into the
    /// three lookup maps and the callee map. Scan failures are logged and
    /// skipped rather than propagated, matching the original's
    /// "Warning: could not scan ..." behavior — one unreadable file must not
    /// abort the whole archive scan.
    #[instrument(skip(self, base_dir))]
    pub fn scan_file(&mut self, filepath: &Path, base_dir: &Path) {
        let data = match fs::read(filepath) {
            Ok(d) => d,
            Err(e) => {
                warn!(path = %filepath.display(), error = %e, "could not read file");
                return;
            },
        };
        let index = match read_index_only(&data) {
            Ok(i) => i,
            Err(e) => {
                warn!(path = %filepath.display(), error = %e, "could not scan file");
                return;
            },
        };

        let relpath = filepath
            .strip_prefix(base_dir)
            .unwrap_or(filepath)
            .to_string_lossy()
            .into_owned();

        for item in &index {
            let topic_name = item.topic.text().to_string();
            let type_name = item.type_name.clone();

            let mut unique_id = None;
            let mut unique_index = None;
            let mut callee_list = None;
            for (fname, fval) in &item.fields {
                match fname.as_str() {
                    "unique-id" => unique_id = value_to_unique_id(fval.clone()),
                    "unique-index" => unique_index = value_to_unique_id(fval.clone()),
                    "callee-list" => {
                        if let Value::CalleeList(entries) = fval {
                            callee_list = Some(entries);
                        }
                    },
                    _ => {},
                }
            }

            if let Some(uid) = &unique_id {
                self.by_id.insert(
                    uid.clone(),
                    Entry { relpath: relpath.clone(), topic_name: topic_name.clone(), type_name: type_name.clone() },
                );
                self.by_name.insert(
                    topic_name.clone(),
                    NameEntry { relpath: relpath.clone(), unique_id: uid.clone(), type_name: type_name.clone() },
                );
            }

            if let Some(UniqueId::Int(n)) = unique_index {
                self.by_index.insert(
                    n,
                    Entry { relpath: relpath.clone(), topic_name: topic_name.clone(), type_name: type_name.clone() },
                );

                if let (Some(uid), Some(list)) = (&unique_id, callee_list) {
                    let callees = list
                        .iter()
                        .map(|c| CalleeInfo {
                            topic_name: c.topic.text().to_string(),
                            type_name: c.type_name.clone(),
                            called_how: c.called_how.clone(),
                            callee_unique_id: c.unique_id.clone(),
                        })
                        .collect();
                    self.callees.insert(uid.clone(), callees);
                }
            }
        }
    }

    /// Recursively walks `base_dir`, scanning every file whose name contains
    /// `.sab.` (Genera's version-suffixed naming, e.g. `foo.sab.~56~`).
    /// Returns the number of files scanned.
    #[instrument(skip(self))]
    pub fn scan_all(&mut self, base_dir: &Path) -> usize {
        let mut count = 0;
        let mut dirs = vec![base_dir.to_path_buf()];
        while let Some(dir) = dirs.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(e) => e,
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "could not read directory");
                    continue;
                },
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                    continue;
                }
                let is_sab = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.contains(".sab."))
                    .unwrap_or(false);
                if is_sab {
                    self.scan_file(&path, base_dir);
                    count += 1;
                }
            }
        }
        debug!(count, "scanned archive");
        count
    }

    /// Pass 2: resolve a reference, trying in order an exact `unique_id`
    /// match, a `unique_index` match if `unique_id` is an integer, then a
    /// topic-name fallback (exact, upper-cased, lower-cased).
    pub fn resolve_reference(&self, unique_id: Option<&UniqueId>, topic_name: Option<&str>) -> Option<Entry> {
        if let Some(uid) = unique_id {
            if let Some(entry) = self.by_id.get(uid) {
                return Some(entry.clone());
            }
            if let UniqueId::Int(n) = uid {
                if let Some(entry) = self.by_index.get(n) {
                    return Some(entry.clone());
                }
            }
        }
        if let Some(name) = topic_name {
            for candidate in [name.to_string(), name.to_uppercase(), name.to_lowercase()] {
                if let Some(found) = self.by_name.get(&candidate) {
                    return Some(Entry {
                        relpath: found.relpath.clone(),
                        topic_name: name.to_string(),
                        type_name: found.type_name.clone(),
                    });
                }
            }
        }
        None
    }

    /// How a callee of `record_uid` was invoked, if `callee_uid` is among
    /// them (`expand`, `topic`, `crossref`, ...).
    pub fn get_callee_type(&self, record_uid: &UniqueId, callee_uid: &UniqueId) -> Option<&str> {
        self.callees
            .get(record_uid)?
            .iter()
            .find(|c| c.callee_unique_id.as_ref() == Some(callee_uid))
            .map(|c| c.called_how.as_str())
    }

    pub fn topic_name(&self, name: &Name) -> String {
        name.text().to_string()
    }
}

/// Strips a Genera version suffix (`.~56~`) and replaces a terminal `.sab`
/// with `.html`. `doc/clim/foo.sab.~56~` -> `doc/clim/foo.html`.
pub fn get_html_path(relpath: &str) -> String {
    let mut path = relpath;
    if let Some(idx) = path.rfind(".~") {
        path = &path[..idx];
    }
    if let Some(stem) = path.strip_suffix(".sab") {
        format!("{}.html", stem)
    } else {
        path.to_string()
    }
}

/// Lower-cases a topic name, collapses runs of non-`[a-z0-9]` into a single
/// `-`, and trims leading/trailing `-`. An empty result becomes `section`.
pub fn slugify(topic_name: &str) -> String {
    let lowered = topic_name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut last_was_dash = false;
    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "section".to_string()
    } else {
        trimmed.to_string()
    }
}

/// If `target_html_path` is the page currently being rendered
/// (`current_html_path`), emit just `#slug`; otherwise a path relative to
/// the current file's directory.
pub fn relative_link(current_html_path: &str, target_html_path: &str, slug: &str) -> String {
    if current_html_path == target_html_path {
        return format!("#{}", slug);
    }
    let current_dir = Path::new(current_html_path).parent().unwrap_or_else(|| Path::new(""));
    let target = Path::new(target_html_path);

    let relative = pathdiff::diff_paths(target, current_dir).unwrap_or_else(|| target.to_path_buf());
    format!("{}#{}", relative.to_string_lossy().replace('\\', "/"), slug)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_path_strips_version_suffix() {
        assert_eq!(get_html_path("doc/clim/foo.sab.~56~"), "doc/clim/foo.html");
        assert_eq!(get_html_path("doc/clim/foo.sab"), "doc/clim/foo.html");
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("Common Lisp: The Language!"), "common-lisp-the-language");
        assert_eq!(slugify("***"), "section");
        assert_eq!(slugify(""), "section");
    }

    #[test]
    fn relative_link_same_file_is_just_anchor() {
        assert_eq!(relative_link("doc/clim/foo.html", "doc/clim/foo.html", "bar"), "#bar");
    }

    #[test]
    fn relative_link_crosses_directories() {
        let link = relative_link("doc/clim/foo.html", "doc/streams/bar.html", "baz");
        assert_eq!(link, "../streams/bar.html#baz");
    }

    #[test]
    fn resolve_reference_falls_back_through_name_casing() {
        let mut registry = RecordRegistry::new();
        registry.by_name.insert(
            "FOO-FUNCTION".to_string(),
            NameEntry { relpath: "doc/foo.html".to_string(), unique_id: UniqueId::Str("1".to_string()), type_name: "function".to_string() },
        );
        let resolved = registry.resolve_reference(None, Some("foo-function"));
        assert_eq!(resolved.unwrap().relpath, "doc/foo.html");
    }
}
