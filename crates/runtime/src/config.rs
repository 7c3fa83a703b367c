use std::path::PathBuf;

use chrono::{DateTime, TimeZone};

pub const PROGRAM_NAME: &str = "gmsfs";
pub const PROGRAM_LOG_LEVEL: &str = "GMSFS_LOG_LEVEL";
/// When set, the process logger appends here instead of writing to stderr.
pub const PROGRAM_LOG_FILE: &str = "GMSFS_LOG_FILE";

/// Marker file whose mere existence in the working directory turns the
/// failure log on.
pub const DEBUG_MARKER_FILE: &str = "GMSFS.Debug";

pub const FAILURE_LOG_PREFIX: &str = "GMSFS.";
pub const FAILURE_LOG_SUFFIX: &str = ".log";
/// One failure log per calendar minute.
pub const FAILURE_LOG_TIME_FORMAT: &str = "%Y%m%d_%H%M";

/// Permission bits used when append creates a file.
pub const APPEND_MODE: u32 = 0o644;

/// Failure log file name for the minute containing `now`.
pub fn failure_log_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{FAILURE_LOG_PREFIX}{}{FAILURE_LOG_SUFFIX}",
        now.format(FAILURE_LOG_TIME_FORMAT)
    )
}

/// Marker path relative to the working directory.
pub fn debug_marker_path() -> PathBuf {
    PathBuf::from(DEBUG_MARKER_FILE)
}

/// Process log file requested through the environment, if any.
pub fn log_file_from_env() -> Option<PathBuf> {
    std::env::var_os(PROGRAM_LOG_FILE)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, Utc};
    use serial_test::serial;

    #[test]
    fn failure_log_name_uses_minute_granularity() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 59).unwrap();
        assert_eq!(failure_log_name(&ts), "GMSFS.20240307_0905.log");
    }

    #[test]
    fn failure_log_name_works_with_local_time() {
        let name = failure_log_name(&Local::now());
        assert!(name.starts_with(FAILURE_LOG_PREFIX));
        assert!(name.ends_with(FAILURE_LOG_SUFFIX));
        // "GMSFS." + "YYYYMMDD_HHMM" + ".log"
        assert_eq!(name.len(), 6 + 13 + 4);
    }

    #[test]
    #[serial]
    fn log_file_from_env_ignores_empty_values() {
        unsafe { std::env::set_var(PROGRAM_LOG_FILE, "") };
        assert_eq!(log_file_from_env(), None);

        unsafe { std::env::set_var(PROGRAM_LOG_FILE, "out.log") };
        assert_eq!(log_file_from_env(), Some(PathBuf::from("out.log")));

        unsafe { std::env::remove_var(PROGRAM_LOG_FILE) };
        assert_eq!(log_file_from_env(), None);
    }
}
