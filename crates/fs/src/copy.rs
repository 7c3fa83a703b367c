use std::{
    fs::{self, File},
    io,
    panic::Location,
    path::Path,
};

use log::debug;

use crate::{
    error::{Error, Result},
    facade::{Gmsfs, dir_builder, stat_info},
    listing::sorted_entries,
    path::clean_path,
    record::mode_of,
    sink::FailureSink,
};

impl<S: FailureSink> Gmsfs<S> {
    /// Copy one file's bytes and permissions.
    ///
    /// The destination is flushed to storage before its permissions are set.
    /// A failure part way through leaves whatever was written in place.
    #[track_caller]
    pub fn copy_file(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let caller = Location::caller();
        self.copy_file_at(caller, &clean_path(src), &clean_path(dst))
    }

    fn copy_file_at(
        &self,
        caller: &'static Location<'static>,
        src: &Path,
        dst: &Path,
    ) -> Result<()> {
        let mut input =
            File::open(src).map_err(|e| self.fail(caller, "copy_file (open)", src, e))?;
        let mut output =
            File::create(dst).map_err(|e| self.fail(caller, "copy_file (create)", dst, e))?;

        io::copy(&mut input, &mut output)
            .map_err(|e| self.fail(caller, "copy_file (copy)", dst, e))?;
        output
            .sync_all()
            .map_err(|e| self.fail(caller, "copy_file (sync)", dst, e))?;

        let permissions = input
            .metadata()
            .map_err(|e| self.fail(caller, "copy_file (stat)", src, e))?
            .permissions();
        fs::set_permissions(dst, permissions)
            .map_err(|e| self.fail(caller, "copy_file (chmod)", dst, e))
    }

    /// Recursively copy a directory tree into a new destination.
    ///
    /// `dst` must not exist. Symlinks are skipped. The first failure aborts
    /// the copy and leaves the partial tree behind.
    #[track_caller]
    pub fn copy_dir(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let caller = Location::caller();
        self.copy_dir_at(caller, &clean_path(src), &clean_path(dst))
    }

    fn copy_dir_at(
        &self,
        caller: &'static Location<'static>,
        src: &Path,
        dst: &Path,
    ) -> Result<()> {
        let meta = fs::metadata(src).map_err(|e| self.fail(caller, "copy_dir (stat)", src, e))?;
        if !meta.is_dir() {
            return Err(Error::NotADirectory(src.to_path_buf()));
        }

        // Anything but a definite "not found" counts as taken.
        if !matches!(fs::metadata(dst), Err(e) if e.kind() == io::ErrorKind::NotFound) {
            let err = Error::DestinationExists(dst.to_path_buf());
            self.report(caller, "copy_dir", dst, &err);
            return Err(err);
        }

        dir_builder(mode_of(&meta), true)
            .create(dst)
            .map_err(|e| self.fail(caller, "copy_dir (mkdir)", dst, e))?;

        let entries =
            sorted_entries(src).map_err(|e| self.fail(caller, "copy_dir (read_dir)", src, e))?;

        for entry in entries {
            let name = entry.file_name();
            let (from, to) = (src.join(&name), dst.join(&name));

            let file_type = entry
                .file_type()
                .map_err(|e| self.fail(caller, "copy_dir (file_type)", &from, e))?;

            if file_type.is_dir() {
                self.copy_dir_at(caller, &from, &to)?;
            } else if file_type.is_symlink() {
                debug!("[copy_dir] skipping symlink {}", from.display());
            } else {
                self.copy_file_at(caller, &from, &to)?;
            }
        }

        Ok(())
    }

    /// Copy the immediate entries of `src` whose names match `pattern` into
    /// `dst`, creating `dst` when missing. Not recursive.
    #[track_caller]
    pub fn copy_dir_files_glob(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        pattern: &str,
    ) -> Result<()> {
        let caller = Location::caller();
        let (src, dst) = (clean_path(src), clean_path(dst));

        let info = match stat_info(&src) {
            Ok(info) => info,
            Err(e) => {
                self.report(caller, "copy_dir_files_glob (stat)", &src, &e);
                return Err(Error::NotADirectory(src));
            }
        };
        if !info.is_dir {
            return Err(Error::NotADirectory(src));
        }

        self.mkdir_all_at(caller, &dst, info.mode)?;

        for item in self.find_files_at(caller, &src, pattern)? {
            let Some(name) = item.file_name() else {
                continue;
            };
            self.copy_file_at(caller, &item, &dst.join(name))?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
