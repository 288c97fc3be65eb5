use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::IoError;

/// Longest file stem produced, in bytes.
pub const MAX_NAME_BYTES: usize = 200;

pub const DEFAULT_UNTITLED_NAME: &str = "Untitled";

/// How to name a document whose file name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append ` 1`, ` 2`, ... to the stem until the name is free.
    #[default]
    Suffix,
    /// Reuse the name; the later document replaces the earlier file.
    Overwrite,
    /// Stop with [`IoError::Collision`].
    Fail,
}

/// Name of the folder a source file expands into: its base name without extension.
pub fn container_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    file_safe_name(&stem, DEFAULT_UNTITLED_NAME)
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"))
}

fn unsafe_chars_regex() -> &'static Regex {
    // Reserved on Windows or macOS/Linux, plus control characters
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|\x00-\x1f\x7f]+"#).expect("Invalid file name regex")
    })
}

/// Turn a document title into a file stem that is valid on common platforms.
///
/// Falls back to `untitled_name`, cleaned the same way, when nothing usable
/// is left, and to [`DEFAULT_UNTITLED_NAME`] if that is unusable too.
pub fn file_safe_name(title: &str, untitled_name: &str) -> String {
    sanitize(title)
        .or_else(|| sanitize(untitled_name))
        .unwrap_or_else(|| DEFAULT_UNTITLED_NAME.to_string())
}

fn sanitize(name: &str) -> Option<String> {
    let collapsed = whitespace_regex().replace_all(name, " ");
    let replaced = unsafe_chars_regex().replace_all(&collapsed, "-");
    let trimmed = replaced
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    let truncated = truncate_to_char_boundary(trimmed, MAX_NAME_BYTES)
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    (!truncated.is_empty()).then(|| truncated.to_string())
}

fn truncate_to_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Pick one `<name>.md` file name per title, in order.
///
/// `taken` holds file names already present in the destination. Comparison is
/// case-insensitive so the result is safe on case-insensitive filesystems.
pub fn assign_file_names<'t>(
    titles: impl IntoIterator<Item = &'t str>,
    policy: CollisionPolicy,
    untitled_name: &str,
    taken: &HashSet<String>,
) -> Result<Vec<String>, IoError> {
    let mut used: HashSet<String> = taken.iter().map(|name| name.to_lowercase()).collect();
    let mut names = Vec::new();

    for title in titles {
        let stem = file_safe_name(title, untitled_name);
        let mut name = format!("{stem}.md");

        match policy {
            CollisionPolicy::Overwrite => {}
            CollisionPolicy::Fail => {
                if used.contains(&name.to_lowercase()) {
                    return Err(IoError::Collision(PathBuf::from(name)));
                }
            }
            CollisionPolicy::Suffix => {
                let mut counter = 1;
                while used.contains(&name.to_lowercase()) {
                    name = format!("{stem} {counter}.md");
                    counter += 1;
                }
                if counter > 1 {
                    log::warn!("title {title:?} already taken, writing it as {name:?}");
                }
            }
        }

        used.insert(name.to_lowercase());
        names.push(name);
    }

    Ok(names)
}
