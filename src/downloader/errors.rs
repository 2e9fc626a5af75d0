// Error types for the download pipeline
//
// Download results themselves are not errors: the runner always yields an
// ExecutionOutcome. DownloadError covers rejected requests and
// configuration problems.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL field was empty after trimming
    #[error("No URL given")]
    EmptyUrl,

    /// Output directory does not exist
    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    /// Another request is still running
    #[error("A download is already in progress")]
    Busy,

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
