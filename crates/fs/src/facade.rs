//! # Gmsfs
//!
//! A synchronous facade over `std::fs`.
//!
//! Every operation forwards to the matching OS call. Failures come back as
//! [`Error`] values and are also handed to the facade's [`FailureSink`],
//! together with an operation label, the failing path and the call site that
//! entered the facade. The sink never changes the returned value.

use std::{
    error::Error as StdError,
    fs::{self, DirBuilder, File, OpenOptions},
    io::{self, Write},
    panic::Location,
    path::Path,
};

use chrono::{TimeDelta, Utc};
use gmsfs_runtime::APPEND_MODE;
use log::debug;

use crate::{
    error::{Error, Result},
    path::{base_name, clean_path},
    record::FileInfo,
    sink::{Failure, FailureSink, NullSink},
};

pub struct Gmsfs<S = NullSink> {
    sink: S,
}

impl Gmsfs<NullSink> {
    pub fn new() -> Self {
        Self::with_sink(NullSink)
    }
}

impl Default for Gmsfs<NullSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FailureSink> Gmsfs<S> {
    pub fn with_sink(sink: S) -> Self {
        Gmsfs { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub(crate) fn report(
        &self,
        caller: &'static Location<'static>,
        op: &str,
        path: &Path,
        error: &(dyn StdError + 'static),
    ) {
        debug!("[{op}] {}: {error}", path.display());
        self.sink.record(&Failure {
            op,
            path,
            error,
            caller,
        });
    }

    /// Report `source` and wrap it with its operation label and path.
    pub(crate) fn fail(
        &self,
        caller: &'static Location<'static>,
        op: &'static str,
        path: &Path,
        source: io::Error,
    ) -> Error {
        self.report(caller, op, path, &source);
        Error::io(op, path, source)
    }

    /// Open with caller-chosen flags. The path is used as given.
    #[track_caller]
    pub fn open_with(&self, path: impl AsRef<Path>, options: &OpenOptions) -> Result<File> {
        let caller = Location::caller();
        let path = path.as_ref();
        options
            .open(path)
            .map_err(|e| self.fail(caller, "open_file", path, e))
    }

    /// Open read-only.
    #[track_caller]
    pub fn open(&self, path: impl AsRef<Path>) -> Result<File> {
        let caller = Location::caller();
        let path = clean_path(path);
        File::open(&path).map_err(|e| self.fail(caller, "open", &path, e))
    }

    /// Create or truncate, opened read-write.
    #[track_caller]
    pub fn create(&self, path: impl AsRef<Path>) -> Result<File> {
        let caller = Location::caller();
        let path = clean_path(path);
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| self.fail(caller, "create", &path, e))
    }

    #[track_caller]
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let caller = Location::caller();
        let path = path.as_ref();
        fs::read(path).map_err(|e| self.fail(caller, "read_file", path, e))
    }

    /// Replace the file's contents. `mode` only applies when the file is
    /// created.
    #[track_caller]
    pub fn write_file(
        &self,
        path: impl AsRef<Path>,
        contents: impl AsRef<[u8]>,
        mode: u32,
    ) -> Result<()> {
        let caller = Location::caller();
        let path = clean_path(path);

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        set_create_mode(&mut options, mode);

        options
            .open(&path)
            .and_then(|mut file| file.write_all(contents.as_ref()))
            .map_err(|e| self.fail(caller, "write_file", &path, e))
    }

    /// Append to the file, creating it if needed. The handle is closed
    /// before returning.
    #[track_caller]
    pub fn append(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
        let caller = Location::caller();
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        set_create_mode(&mut options, APPEND_MODE);

        let mut file = options
            .open(path)
            .map_err(|e| self.fail(caller, "append (open)", path, e))?;

        file.write_all(contents.as_ref())
            .map_err(|e| self.fail(caller, "append", path, e))
    }

    #[track_caller]
    pub fn append_str(&self, path: impl AsRef<Path>, contents: &str) -> Result<()> {
        self.append(path, contents.as_bytes())
    }

    /// Create a single directory.
    #[track_caller]
    pub fn mkdir(&self, path: impl AsRef<Path>, mode: u32) -> Result<()> {
        let caller = Location::caller();
        let path = clean_path(path);
        dir_builder(mode, false)
            .create(&path)
            .map_err(|e| self.fail(caller, "mkdir", &path, e))
    }

    /// Create a directory and its parents. An existing path is success,
    /// whatever kind of entry it is.
    #[track_caller]
    pub fn mkdir_all(&self, path: impl AsRef<Path>, mode: u32) -> Result<()> {
        let caller = Location::caller();
        self.mkdir_all_at(caller, &clean_path(path), mode)
    }

    pub(crate) fn mkdir_all_at(
        &self,
        caller: &'static Location<'static>,
        path: &Path,
        mode: u32,
    ) -> Result<()> {
        if file_exists(path) {
            return Ok(());
        }

        dir_builder(mode, true)
            .create(path)
            .map_err(|e| self.fail(caller, "mkdir_all", path, e))
    }

    /// Stat `path`, following symlinks. The record's name is the base name
    /// of `path` as given.
    #[track_caller]
    pub fn stat(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        let caller = Location::caller();
        let path = path.as_ref();
        stat_info(path).map_err(|e| self.fail(caller, "stat", path, e))
    }

    /// `true` only when a stat succeeds.
    ///
    /// Permission errors read as "does not exist", the same as a missing
    /// path. Use [`Gmsfs::try_exists`] to tell them apart.
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        file_exists(path.as_ref())
    }

    /// `Ok(false)` only for a missing path; other stat errors are returned.
    #[track_caller]
    pub fn try_exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        let caller = Location::caller();
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.fail(caller, "try_exists", path, e)),
        }
    }

    #[track_caller]
    pub fn file_size(&self, path: impl AsRef<Path>) -> Result<u64> {
        let caller = Location::caller();
        let path = path.as_ref();
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| self.fail(caller, "file_size", path, e))
    }

    /// Size in bytes, or 0 when the stat fails. Never reported.
    pub fn file_size_or_zero(&self, path: impl AsRef<Path>) -> u64 {
        fs::metadata(path.as_ref()).map(|m| m.len()).unwrap_or(0)
    }

    /// Time since the last modification. Negative when the mtime is in the
    /// future.
    #[track_caller]
    pub fn file_age(&self, path: impl AsRef<Path>) -> Result<TimeDelta> {
        let caller = Location::caller();
        let path = path.as_ref();
        let info = stat_info(path).map_err(|e| self.fail(caller, "file_age", path, e))?;

        Ok(Utc::now() - info.last_modified)
    }

    /// Remove one file, symlink or empty directory.
    #[track_caller]
    pub fn delete(&self, path: impl AsRef<Path>) -> Result<()> {
        let caller = Location::caller();
        let path = path.as_ref();
        remove_entry(path).map_err(|e| self.fail(caller, "delete", path, e))
    }

    /// Same primitive as [`Gmsfs::delete`].
    #[track_caller]
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        let caller = Location::caller();
        let path = path.as_ref();
        remove_entry(path).map_err(|e| self.fail(caller, "remove", path, e))
    }

    /// Remove `path` and everything below it. A missing path is success.
    #[track_caller]
    pub fn remove_all(&self, path: impl AsRef<Path>) -> Result<()> {
        let caller = Location::caller();
        let path = clean_path(path);

        let result = match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => Err(e),
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
        };

        match result {
            Ok(()) => Ok(()),
            // Removed concurrently between the probe and the removal.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.fail(caller, "remove_all", &path, e)),
        }
    }

    /// Rename through the OS. Identical paths succeed without touching the
    /// filesystem; cross-device moves fail rather than falling back to copy.
    #[track_caller]
    pub fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
        let caller = Location::caller();
        let (from, to) = (from.as_ref(), to.as_ref());
        if from == to {
            return Ok(());
        }

        fs::rename(from, to).map_err(|e| {
            self.report(caller, "rename", from, &e);
            self.fail(caller, "rename", to, e)
        })
    }
}

pub(crate) fn stat_info(path: &Path) -> io::Result<FileInfo> {
    let meta = fs::metadata(path)?;
    Ok(FileInfo::from_metadata(base_name(path), &meta))
}

pub(crate) fn file_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

fn remove_entry(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

pub(crate) fn dir_builder(mode: u32, recursive: bool) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(recursive);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
}

pub(crate) fn set_create_mode(options: &mut OpenOptions, mode: u32) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = (options, mode);
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
