// Command builder - turns a request into the external tool invocation

use std::fmt;
use std::path::PathBuf;

use super::backends::{SpotDlBackend, YtDlpBackend};
use super::classifier::classify;
use super::models::{DownloadRequest, Target};
use super::tools::{ToolPaths, ToolType};
use super::traits::FetcherBackend;

/// Default `-N` value for the general fetcher
pub const DEFAULT_FRAGMENT_WORKERS: u8 = 8;

/// A fully built invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub tool: ToolType,
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Reported back on success
    pub output_dir: PathBuf,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// The backend serving `target`, wired to the resolved executables
pub fn backend_for(target: Target, tools: &ToolPaths, fragment_workers: u8) -> Box<dyn FetcherBackend> {
    match target {
        Target::StreamingService => Box::new(SpotDlBackend::new(tools.spotdl.clone())),
        Target::GeneralFetcher => Box::new(
            YtDlpBackend::new(tools.ytdlp.clone())
                .with_ffmpeg_location(tools.ffmpeg_location.clone())
                .with_fragment_workers(fragment_workers),
        ),
    }
}

/// Classify the URL and build the matching invocation
pub fn build(request: &DownloadRequest, tools: &ToolPaths) -> CommandLine {
    backend_for(classify(&request.url), tools, DEFAULT_FRAGMENT_WORKERS).build(request)
}
