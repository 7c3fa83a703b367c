use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Error type for facade operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source is not a directory or does not exist: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// The `io::ErrorKind` class this error belongs to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Io { source, .. } => source.kind(),
            Error::NotADirectory(_) => io::ErrorKind::NotADirectory,
            Error::DestinationExists(_) => io::ErrorKind::AlreadyExists,
            Error::Pattern { .. } => io::ErrorKind::InvalidInput,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind() == io::ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_each_variant() {
        let cases = [
            (
                Error::io(
                    "open",
                    Path::new("x"),
                    io::Error::from(io::ErrorKind::NotFound),
                ),
                io::ErrorKind::NotFound,
            ),
            (
                Error::NotADirectory(PathBuf::from("f")),
                io::ErrorKind::NotADirectory,
            ),
            (
                Error::DestinationExists(PathBuf::from("d")),
                io::ErrorKind::AlreadyExists,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.kind(), expected, "kind of {err}");
        }
    }

    #[test]
    fn io_error_display_names_op_and_path() {
        let err = Error::io(
            "read_file",
            Path::new("/tmp/missing"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "read_file /tmp/missing: gone");
        assert!(err.is_not_found());
    }

    #[test]
    fn pattern_error_is_invalid_input() {
        let source = glob::Pattern::new("[").expect_err("unterminated class");
        let err = Error::Pattern {
            pattern: "[".into(),
            source,
        };
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().starts_with("invalid glob pattern \"[\""));
    }
}
