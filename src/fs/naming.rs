//! Filename generation and manipulation.

use std::sync::LazyLock;

use regex::Regex;

/// Fallback name when nothing usable can be derived.
pub const DEFAULT_ATTACHMENT_NAME: &str = "attachment";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Replace characters that are illegal in file and folder names with `_`.
pub fn sanitize_path_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Collapse every run of whitespace into a single `_`.
pub fn collapse_whitespace(name: &str) -> String {
    WHITESPACE.replace_all(name, "_").into_owned()
}

/// Turn an arbitrary label into a usable attachment file name.
pub fn sanitize_file_name(name: &str) -> String {
    let name = sanitize_path_component(&collapse_whitespace(name.trim()));
    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_ATTACHMENT_NAME.to_string()
    } else {
        name
    }
}

/// Split `name.ext` at the last dot. Leading dots do not start an extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => (&name[..pos], Some(&name[pos + 1..])),
        _ => (name, None),
    }
}

/// Generate a unique name by appending `_2`, `_3`, ... before the extension
/// while `is_taken` reports a clash.
pub fn unique_name(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.to_string();
    }

    let (stem, ext) = split_extension(name);
    let mut counter = 2;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };

        if !is_taken(&candidate) {
            return candidate;
        }

        counter += 1;
    }
}
