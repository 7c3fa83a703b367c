use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf, is_separator};

/// Lexically normalize `path` and drop a leading drive-like prefix.
///
/// Repeated separators and `.` segments collapse, `..` cancels the segment
/// before it, and everything up to and including the first `:` is removed.
/// Purely textual: the filesystem is never consulted and symlinks are not
/// resolved.
pub fn clean_path(path: impl AsRef<Path>) -> PathBuf {
    strip_drive_prefix(lexical_clean(path.as_ref()))
}

fn lexical_clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                // Leading `..` survives on relative paths.
                Some(Component::ParentDir) | Some(Component::CurDir) | None => out.push(comp),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

// A bare "C:" cleans to an empty path, which every OS call rejects.
fn strip_drive_prefix(path: PathBuf) -> PathBuf {
    match path.to_str().and_then(|s| s.split_once(':')) {
        Some((_, rest)) => PathBuf::from(rest),
        None => path,
    }
}

/// Last element of `path`, ignoring trailing separators.
///
/// An empty path yields `.`, a path made only of separators yields the
/// separator itself.
pub fn base_name(path: impl AsRef<Path>) -> String {
    let s = path.as_ref().to_string_lossy();
    if s.is_empty() {
        return ".".to_owned();
    }

    let trimmed = s.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return MAIN_SEPARATOR.to_string();
    }

    match trimmed.rfind(is_separator) {
        Some(i) => trimmed[i + 1..].to_owned(),
        None => trimmed.to_owned(),
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
