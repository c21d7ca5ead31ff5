//! In-place patching of the OAM application manifest.
//!
//! The manifest is edited as text, one line at a time, so that comments,
//! ordering and formatting outside the rewritten lines survive byte for byte.
//! Two regions are touched:
//!
//! - the `image:` lines inside the `components:` item introduced by
//!   `- name: <service>`, when the image repository belongs to that service
//! - the `<version key>` and `<commit key>` entries of the document-level
//!   `annotations:` block, overwritten when present and inserted otherwise
//!
//! Applying the same patch twice yields the same bytes as applying it once.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{OamTagError, Result};
use crate::store::write_atomic;

/// What to write into the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest {
    /// Component name, matched against `- name: <service>`
    pub service: String,
    /// Full image reference, e.g. `docker.io/acme/api:abc1234`
    pub image: String,
    /// Annotation key/value pairs, upserted in order
    pub annotations: Vec<(String, String)>,
}

/// One rewritten or inserted line, with a 1-based line number in the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub line: usize,
    pub before: Option<String>,
    pub after: String,
}

/// Outcome of patching manifest text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedManifest {
    pub content: String,
    pub images_updated: usize,
    /// `false` when the document has no `annotations:` block
    pub annotations_updated: bool,
    pub changes: Vec<LineChange>,
}

/// Outcome of patching the manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub images_updated: usize,
    pub annotations_updated: bool,
    pub changes: Vec<LineChange>,
    /// Whether the file was rewritten; always `false` for a dry run
    pub written: bool,
}

/// A manifest line split from its terminator, so endings survive untouched
#[derive(Debug, Clone)]
struct Line {
    body: String,
    ending: String,
}

impl Line {
    fn split(raw: &str) -> Self {
        let (body, ending) = if let Some(body) = raw.strip_suffix("\r\n") {
            (body, "\r\n")
        } else if let Some(body) = raw.strip_suffix('\n') {
            (body, "\n")
        } else {
            (raw, "")
        };

        Line {
            body: body.to_string(),
            ending: ending.to_string(),
        }
    }

    fn indent(&self) -> usize {
        self.body.len() - self.body.trim_start().len()
    }

    /// Blank and comment lines never end a block
    fn is_filler(&self) -> bool {
        let trimmed = self.body.trim_start();
        trimmed.is_empty() || trimmed.starts_with('#')
    }
}

/// Patches one manifest file
#[derive(Debug, Clone)]
pub struct ManifestPatcher {
    path: PathBuf,
}

impl ManifestPatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestPatcher { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Patch the manifest file.
    ///
    /// With `dry_run` the patch is computed and reported but nothing is
    /// written. The file is also left alone when the patch changes nothing.
    ///
    /// # Returns
    /// * `Ok(PatchReport)` - The patch applied (or would apply) cleanly
    /// * `Err(ManifestNotFound)` - The manifest does not exist
    /// * `Err(ServiceBlockNotFound)` - No `- name: <service>` block; file untouched
    /// * `Err(Write)` - The patched file could not be written
    pub fn apply(&self, request: &PatchRequest, dry_run: bool) -> Result<PatchReport> {
        if !self.path.is_file() {
            return Err(OamTagError::ManifestNotFound(self.path.clone()));
        }

        let original = fs::read_to_string(&self.path)?;
        let patched = self.patch_text(&original, request)?;

        let written = !dry_run && patched.content != original;
        if written {
            write_atomic(&self.path, patched.content.as_bytes())?;
        }

        Ok(PatchReport {
            path: self.path.clone(),
            images_updated: patched.images_updated,
            annotations_updated: patched.annotations_updated,
            changes: patched.changes,
            written,
        })
    }

    /// Patch manifest text without touching the filesystem
    pub fn patch_text(&self, text: &str, request: &PatchRequest) -> Result<PatchedManifest> {
        let mut lines: Vec<Line> = text.split_inclusive('\n').map(Line::split).collect();
        let mut changes = Vec::new();

        let blocks = find_component_blocks(&lines, &request.service)?;
        if blocks.is_empty() {
            return Err(OamTagError::ServiceBlockNotFound {
                service: request.service.clone(),
                path: self.path.clone(),
            });
        }

        let image_line = compile(
            r#"^(?P<lead>\s*(?:-\s+)?image:\s*)(?P<value>"[^"]*"|'[^']*'|[^\s#"']+)(?P<rest>.*)$"#,
        )?;

        let mut images_updated = 0;
        for (start, end) in blocks {
            for index in start..end {
                let Some(body) = rewrite_image_line(&image_line, &lines[index].body, request) else {
                    continue;
                };

                images_updated += 1;
                if body != lines[index].body {
                    changes.push(LineChange {
                        line: index + 1,
                        before: Some(lines[index].body.clone()),
                        after: body.clone(),
                    });
                    lines[index].body = body;
                }
            }
        }

        let annotations_updated = upsert_annotations(&mut lines, &request.annotations, &mut changes)?;

        let content = lines
            .iter()
            .map(|line| format!("{}{}", line.body, line.ending))
            .collect();

        Ok(PatchedManifest {
            content,
            images_updated,
            annotations_updated,
            changes,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| OamTagError::config(format!("invalid pattern: {}", e)))
}

/// Line range and item indent of a `components:` list, or `None` when the
/// key has no block-style items under it
fn components_list(lines: &[Line], marker: usize) -> Option<(usize, usize, usize)> {
    let marker_indent = lines[marker].indent();
    let first = lines[marker + 1..]
        .iter()
        .position(|l| !l.is_filler())
        .map(|offset| marker + 1 + offset)?;

    let item_indent = lines[first].indent();
    let is_item = |l: &Line| l.body.trim_start().starts_with('-');
    if !is_item(&lines[first]) || item_indent < marker_indent {
        return None;
    }

    let end = lines[first..]
        .iter()
        .position(|l| {
            !l.is_filler()
                && (l.indent() < item_indent || (l.indent() == item_indent && !is_item(l)))
        })
        .map_or(lines.len(), |offset| first + offset);

    Some((first, end, item_indent))
}

/// Half-open line ranges `[start, end)` of every block introduced by
/// `- name: <service>`, header line included.
///
/// Only direct items of a `components:` list count, so a nested
/// `- name: <service>` (an env entry, a policy) never opens a block.
fn find_component_blocks(lines: &[Line], service: &str) -> Result<Vec<(usize, usize)>> {
    let components = compile(r"^\s*components:\s*(?:#.*)?$")?;
    let header = compile(&format!(
        r#"^\s*-\s+name:\s*(?:{0}|"{0}"|'{0}')\s*(?:#.*)?$"#,
        regex::escape(service)
    ))?;

    let mut blocks = Vec::new();
    for marker in (0..lines.len()).filter(|&i| components.is_match(&lines[i].body)) {
        let Some((first, list_end, item_indent)) = components_list(lines, marker) else {
            continue;
        };

        for (start, line) in lines.iter().enumerate().take(list_end).skip(first) {
            if line.indent() != item_indent || !header.is_match(&line.body) {
                continue;
            }

            let end = lines[start + 1..list_end]
                .iter()
                .position(|l| !l.is_filler() && l.indent() <= item_indent)
                .map_or(list_end, |offset| start + 1 + offset);

            blocks.push((start, end));
        }
    }

    Ok(blocks)
}

/// Repository part of an image reference: no `@digest`, no `:tag`
fn image_repository(reference: &str) -> &str {
    let without_digest = reference.split('@').next().unwrap_or(reference);
    match (without_digest.rfind(':'), without_digest.rfind('/')) {
        (Some(colon), Some(slash)) if colon > slash => &without_digest[..colon],
        (Some(colon), None) => &without_digest[..colon],
        _ => without_digest,
    }
}

/// The repository path ends with the service name on a segment boundary,
/// so `team/api` matches `docker.io/team/api` but `api` never matches `my-api`
fn belongs_to_service(reference: &str, service: &str) -> bool {
    let repository = image_repository(reference);
    match repository.strip_suffix(service) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('/'),
        None => false,
    }
}

/// New body for an `image:` line that references `request.service`, or
/// `None` to leave the line alone
fn rewrite_image_line(image_line: &Regex, body: &str, request: &PatchRequest) -> Option<String> {
    let caps = image_line.captures(body)?;

    let value = &caps["value"];
    let quote = match value.chars().next() {
        Some(q @ ('"' | '\'')) => Some(q),
        _ => None,
    };
    let current = match quote {
        Some(q) => value.trim_matches(q),
        None => value,
    };

    if !belongs_to_service(current, &request.service) {
        return None;
    }

    let new_value = match quote {
        Some(q) => format!("{q}{}{q}", request.image),
        None => request.image.clone(),
    };

    Some(format!("{}{}{}", &caps["lead"], new_value, &caps["rest"]))
}

fn quote_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Overwrite or insert each annotation in the document-level block.
///
/// The document-level block is the least-indented `annotations:` line; on a
/// tie the first one wins. Returns `false` when there is no such block.
fn upsert_annotations(
    lines: &mut Vec<Line>,
    annotations: &[(String, String)],
    changes: &mut Vec<LineChange>,
) -> Result<bool> {
    let marker_re = compile(r"^\s*annotations:\s*(?:#.*)?$")?;

    let Some(marker) = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| marker_re.is_match(&line.body))
        .min_by_key(|(index, line)| (line.indent(), *index))
        .map(|(index, _)| index)
    else {
        return Ok(false);
    };

    let marker_indent = lines[marker].indent();
    let scope_end = lines[marker + 1..]
        .iter()
        .position(|l| !l.is_filler() && l.indent() <= marker_indent)
        .map_or(lines.len(), |offset| marker + 1 + offset);

    let child_indent = lines[marker + 1..scope_end]
        .iter()
        .find(|l| !l.is_filler())
        .map_or(marker_indent + 2, Line::indent);

    let mut missing = Vec::new();
    for (key, value) in annotations {
        let key_re = compile(&format!(
            r#"^(?P<lead>\s*(?:{0}|"{0}"|'{0}')\s*:)"#,
            regex::escape(key)
        ))?;

        let existing = (marker + 1..scope_end).find(|&index| {
            lines[index].indent() == child_indent && key_re.is_match(&lines[index].body)
        });

        match existing {
            Some(index) => {
                let lead = key_re
                    .captures(&lines[index].body)
                    .map(|caps| caps["lead"].to_string())
                    .unwrap_or_default();
                let body = format!("{} {}", lead, quote_value(value));
                if body != lines[index].body {
                    changes.push(LineChange {
                        line: index + 1,
                        before: Some(lines[index].body.clone()),
                        after: body.clone(),
                    });
                    lines[index].body = body;
                }
            }
            None => missing.push((key, value)),
        }
    }

    if missing.is_empty() {
        return Ok(true);
    }

    let ending = match lines[marker].ending.as_str() {
        "" => "\n".to_string(),
        ending => ending.to_string(),
    };
    let marker_was_last = lines[marker].ending.is_empty();
    if marker_was_last {
        lines[marker].ending = ending.clone();
    }

    let count = missing.len();
    for (offset, (key, value)) in missing.into_iter().enumerate() {
        let index = marker + 1 + offset;
        let body = format!("{}{}: {}", " ".repeat(child_indent), key, quote_value(value));
        let line_ending = if marker_was_last && offset + 1 == count {
            String::new()
        } else {
            ending.clone()
        };

        changes.iter_mut().filter(|c| c.line > index).for_each(|c| c.line += 1);
        changes.push(LineChange {
            line: index + 1,
            before: None,
            after: body.clone(),
        });
        lines.insert(
            index,
            Line {
                body,
                ending: line_ending,
            },
        );
    }

    changes.sort_by_key(|c| c.line);
    Ok(true)
}
