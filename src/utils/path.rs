//! Slash-separated logical path arithmetic
//!
//! Logical paths are plain `/`-separated strings, independent of the host
//! platform. These helpers follow the usual lexical rules: no filesystem
//! access, symlinks are not resolved.

use std::path::Path;

/// Lexically clean a slash path.
///
/// Collapses repeated separators, drops `.` elements and resolves `..`
/// against the preceding element. A rooted `..` stays at the root. The empty
/// path cleans to `.`.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join path elements with `/` and clean the result.
///
/// Empty elements are ignored; joining only empty elements yields `""`.
pub fn join<I, S>(elems: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let elems: Vec<S> = elems
        .into_iter()
        .filter(|e| !e.as_ref().is_empty())
        .collect();
    if elems.is_empty() {
        return String::new();
    }
    let raw = elems
        .iter()
        .map(|e| e.as_ref())
        .collect::<Vec<_>>()
        .join("/");
    clean(&raw)
}

/// Slash form of a native path.
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
