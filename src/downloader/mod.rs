// Downloader module - classification, command building and execution

pub mod backends;
pub mod classifier;
pub mod command;
pub mod errors;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod runner;
pub mod session;
pub mod tools;
pub mod traits;
pub mod utils;

pub use classifier::classify;
pub use command::CommandLine;
pub use errors::DownloadError;
pub use models::{
    DownloadRequest, ExecutionOutcome, MediaFormat, MediaKind, Quality, RequestState, Severity,
    StatusMessage, StatusUpdate, Target,
};
pub use orchestrator::Downloader;
pub use session::{status_channel, DownloadSession, StatusReceiver};
pub use tools::{ToolManager, ToolPaths, ToolType};
pub use traits::{FetcherBackend, StatusEmitter, StatusSink};
