// Backend and status-reporting traits

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::command::CommandLine;
use super::models::{DownloadRequest, ExecutionOutcome, StatusUpdate, Target};
use super::runner;
use super::tools::ToolType;

/// One external fetcher tool
#[async_trait]
pub trait FetcherBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// URL class this backend serves
    fn target(&self) -> Target;

    fn tool(&self) -> ToolType {
        self.target().tool()
    }

    /// Executable to spawn
    fn program(&self) -> &std::path::Path;

    /// Arguments for one request, URL last
    fn build_args(&self, request: &DownloadRequest) -> Vec<String>;

    fn build(&self, request: &DownloadRequest) -> CommandLine {
        CommandLine {
            tool: self.tool(),
            program: self.program().to_path_buf(),
            args: self.build_args(request),
            output_dir: request.output_dir.clone(),
        }
    }

    /// Run a built command to completion
    async fn execute(&self, command: CommandLine) -> ExecutionOutcome {
        runner::run(command).await
    }
}

/// Receiver of status checkpoints; may be called from a worker task
pub trait StatusSink: Send + Sync {
    fn report(&self, update: StatusUpdate);
}

impl<F> StatusSink for F
where
    F: Fn(StatusUpdate) + Send + Sync,
{
    fn report(&self, update: StatusUpdate) {
        self(update)
    }
}

/// Forwards updates to the foreground over a channel
#[derive(Clone)]
pub struct StatusEmitter {
    tx: UnboundedSender<StatusUpdate>,
}

impl StatusEmitter {
    pub fn new(tx: UnboundedSender<StatusUpdate>) -> Self {
        Self { tx }
    }
}

impl StatusSink for StatusEmitter {
    fn report(&self, update: StatusUpdate) {
        // Receiver gone means the foreground quit; nothing left to tell
        let _ = self.tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::RequestState;

    #[test]
    fn test_emitter_forwards_updates() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let emitter = StatusEmitter::new(tx);
        emitter.report(StatusUpdate::preparing());

        let update = rx.try_recv().unwrap();
        assert_eq!(update.state, RequestState::Preparing);
    }

    #[test]
    fn test_emitter_ignores_closed_channel() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        StatusEmitter::new(tx).report(StatusUpdate::preparing());
    }

    #[test]
    fn test_closure_is_a_sink() {
        let seen = std::sync::Mutex::new(Vec::new());
        let sink = |u: StatusUpdate| seen.lock().unwrap().push(u.state);
        sink.report(StatusUpdate::executing(Target::GeneralFetcher));
        assert_eq!(*seen.lock().unwrap(), vec![RequestState::Executing]);
    }
}
