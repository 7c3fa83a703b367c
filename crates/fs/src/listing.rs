use std::{
    fs::{self, DirEntry},
    io,
    panic::Location,
    path::{Path, PathBuf},
};

use glob::Pattern;

use crate::{
    error::{Error, Result},
    facade::{Gmsfs, stat_info},
    record::FileInfo,
    sink::FailureSink,
};

/// Prefix marking directory names in flat listings.
pub const DIR_MARKER: char = '*';

impl<S: FailureSink> Gmsfs<S> {
    /// Immediate children of `path`, sorted by name byte-wise.
    ///
    /// Entries are not followed through symlinks. Any unreadable entry fails
    /// the whole listing.
    #[track_caller]
    pub fn read_dir(&self, path: impl AsRef<Path>) -> Result<Vec<FileInfo>> {
        let caller = Location::caller();
        let path = path.as_ref();
        read_dir_infos(path).map_err(|e| self.fail(caller, "read_dir", path, e))
    }

    /// [`Gmsfs::stat`] plus, for a directory, its immediate children in
    /// `contents`. Children never carry contents of their own.
    #[track_caller]
    pub fn stat_with_contents(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        let caller = Location::caller();
        let path = path.as_ref();

        let mut info = stat_info(path).map_err(|e| self.fail(caller, "stat", path, e))?;
        if info.is_dir {
            info.contents =
                read_dir_infos(path).map_err(|e| self.fail(caller, "read_dir", path, e))?;
        }

        Ok(info)
    }

    /// Child names of `path` with directories prefixed by `*`.
    ///
    /// Empty when `path` is missing, is not a directory, or cannot be read.
    #[track_caller]
    pub fn list_fs(&self, path: impl AsRef<Path>) -> Vec<String> {
        let caller = Location::caller();
        let path = path.as_ref();

        let info = match stat_info(path) {
            Ok(info) => info,
            Err(e) => {
                self.report(caller, "list_fs (stat)", path, &e);
                return Vec::new();
            }
        };
        if !info.is_dir {
            return Vec::new();
        }

        match read_dir_infos(path) {
            Ok(children) => children.iter().map(marked_name).collect(),
            Err(e) => {
                self.report(caller, "list_fs", path, &e);
                Vec::new()
            }
        }
    }

    /// Paths matching a shell pattern, sorted. Entries that cannot be read
    /// while matching are skipped.
    #[track_caller]
    pub fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let caller = Location::caller();

        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(source) => {
                self.report(caller, "glob", Path::new(pattern), &source);
                return Err(Error::Pattern {
                    pattern: pattern.to_owned(),
                    source,
                });
            }
        };

        let mut matches: Vec<PathBuf> = paths.filter_map(|r| r.ok()).collect();
        matches.sort();
        Ok(matches)
    }

    /// Immediate entries of `dir` whose name matches `pattern`, returned as
    /// `dir/name` in name order.
    #[track_caller]
    pub fn find_files_in_dir(
        &self,
        dir: impl AsRef<Path>,
        pattern: &str,
    ) -> Result<Vec<PathBuf>> {
        let caller = Location::caller();
        self.find_files_at(caller, dir.as_ref(), pattern)
    }

    pub(crate) fn find_files_at(
        &self,
        caller: &'static Location<'static>,
        dir: &Path,
        pattern: &str,
    ) -> Result<Vec<PathBuf>> {
        let matcher = self.compile(caller, dir, pattern)?;
        let entries =
            sorted_entries(dir).map_err(|e| self.fail(caller, "find_files_in_dir", dir, e))?;

        Ok(entries
            .iter()
            .filter(|entry| matcher.matches(&entry.file_name().to_string_lossy()))
            .map(|entry| dir.join(entry.file_name()))
            .collect())
    }

    fn compile(
        &self,
        caller: &'static Location<'static>,
        dir: &Path,
        pattern: &str,
    ) -> Result<Pattern> {
        Pattern::new(pattern).map_err(|source| {
            self.report(caller, "glob (pattern)", &dir.join(pattern), &source);
            Error::Pattern {
                pattern: pattern.to_owned(),
                source,
            }
        })
    }
}

fn marked_name(info: &FileInfo) -> String {
    if info.is_dir {
        format!("{DIR_MARKER}{}", info.name)
    } else {
        info.name.clone()
    }
}

/// Directory entries sorted by name, independent of OS enumeration order.
pub(crate) fn sorted_entries(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

pub(crate) fn read_dir_infos(dir: &Path) -> io::Result<Vec<FileInfo>> {
    sorted_entries(dir)?
        .iter()
        .map(|entry| {
            let meta = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            Ok(FileInfo::from_metadata(name, &meta))
        })
        .collect()
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
