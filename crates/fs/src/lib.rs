mod copy;
mod error;
mod facade;
mod listing;
mod path;
mod record;
mod sink;
mod walker;

pub use error::{Error, Result};
pub use facade::Gmsfs;
pub use listing::DIR_MARKER;
pub use path::{base_name, clean_path};
pub use record::FileInfo;
pub use sink::{DebugLog, DebugLogConfig, Failure, FailureSink, NullSink, RecordingSink};
