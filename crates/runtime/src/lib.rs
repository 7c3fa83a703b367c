mod config;
pub mod logging;

pub use config::{
    APPEND_MODE, DEBUG_MARKER_FILE, FAILURE_LOG_PREFIX, FAILURE_LOG_SUFFIX,
    FAILURE_LOG_TIME_FORMAT, PROGRAM_LOG_FILE, PROGRAM_LOG_LEVEL, PROGRAM_NAME,
    debug_marker_path, failure_log_name,
};

pub use logging::init;
