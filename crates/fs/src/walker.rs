use std::{
    ffi::OsString,
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use log::warn;

use crate::{
    facade::Gmsfs,
    listing::{DIR_MARKER, sorted_entries},
    sink::FailureSink,
};

impl<S: FailureSink> Gmsfs<S> {
    /// Depth-first flattened listing below `path`.
    ///
    /// Each entry is rendered as `parent/child`; directories are prefixed
    /// with `*` and immediately followed by their own entries. Children are
    /// visited in name order. Symlinks are followed.
    ///
    /// Errors never surface: an unreadable directory contributes nothing and
    /// the walk carries on with what it has. A directory that resolves to one
    /// of its own ancestors is listed but not entered again.
    #[track_caller]
    pub fn recurse_fs(&self, path: impl AsRef<Path>) -> Vec<String> {
        let caller = Location::caller();
        let root = path.as_ref();
        let shown = root.to_string_lossy().into_owned();

        let mut out = Vec::new();
        let mut ancestors = Vec::new();
        self.walk(caller, root, &shown, &mut ancestors, &mut out);
        out
    }

    /// `dir` is the real path; `shown` is its rendering in the output.
    fn walk(
        &self,
        caller: &'static Location<'static>,
        dir: &Path,
        shown: &str,
        ancestors: &mut Vec<PathBuf>,
        out: &mut Vec<String>,
    ) {
        match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => {}
            _ => return,
        }
        let Ok(entries) = sorted_entries(dir) else {
            return;
        };

        let canonical = fs::canonicalize(dir).ok();
        if let Some(c) = &canonical {
            if ancestors.contains(c) {
                warn!(
                    "[recurse_fs] {shown} loops back to {}, not descending",
                    c.display()
                );
                return;
            }
            ancestors.push(c.clone());
        }

        // Entries describe links themselves; re-stat through them.
        let mut resolved: Vec<(OsString, bool)> = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.file_name();
            let child = dir.join(&name);
            match fs::metadata(&child) {
                Ok(meta) => resolved.push((name, meta.is_dir())),
                Err(e) => self.report(caller, "recurse_fs (stat)", &child, &e),
            }
        }

        for (name, is_dir) in resolved {
            let full = format!("{shown}/{}", name.to_string_lossy());
            if is_dir {
                out.push(format!("{DIR_MARKER}{full}"));
                self.walk(caller, &dir.join(&name), &full, ancestors, out);
            } else {
                out.push(full);
            }
        }

        if canonical.is_some() {
            ancestors.pop();
        }
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
