// Download session - the single-flight entry point used by the foreground
//
// Each accepted request runs on its own tokio task. Status flows back
// through a StatusSink; for a foreground loop that is a StatusEmitter
// feeding the channel drained by StatusReceiver.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;

use super::classifier::classify;
use super::errors::DownloadError;
use super::models::{DownloadRequest, ExecutionOutcome, StatusUpdate};
use super::orchestrator::Downloader;
use super::traits::{StatusEmitter, StatusSink};

/// Foreground end of the status channel
pub struct StatusReceiver {
    rx: UnboundedReceiver<StatusUpdate>,
}

impl StatusReceiver {
    /// Everything queued right now, without waiting
    pub fn drain(&mut self) -> Vec<StatusUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Wait for the next update; `None` once every emitter is gone
    pub async fn recv(&mut self) -> Option<StatusUpdate> {
        self.rx.recv().await
    }
}

pub fn status_channel() -> (StatusEmitter, StatusReceiver) {
    let (tx, rx) = unbounded_channel();
    (StatusEmitter::new(tx), StatusReceiver { rx })
}

/// Clears the in-flight flag when the worker ends, even on panic
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct DownloadSession {
    downloader: Arc<Downloader>,
    in_flight: Arc<AtomicBool>,
    runtime: Handle,
}

impl DownloadSession {
    pub fn new(downloader: Downloader, runtime: Handle) -> Self {
        Self {
            downloader: Arc::new(downloader),
            in_flight: Arc::new(AtomicBool::new(false)),
            runtime,
        }
    }

    /// Whether a request is outstanding; the trigger stays disabled while true
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start a download from raw option keys
    ///
    /// Empty URLs, missing output directories and overlapping requests are
    /// rejected here, before any worker exists. Everything after that is
    /// reported through `sink`.
    pub fn start_download<S>(
        &self,
        url: &str,
        format_key: &str,
        quality_key: &str,
        output_dir: impl Into<PathBuf>,
        sink: S,
    ) -> Result<JoinHandle<ExecutionOutcome>, DownloadError>
    where
        S: StatusSink + 'static,
    {
        let request = DownloadRequest::from_keys(url.trim(), format_key, quality_key, output_dir);
        self.submit(request, sink)
    }

    pub fn submit<S>(
        &self,
        request: DownloadRequest,
        sink: S,
    ) -> Result<JoinHandle<ExecutionOutcome>, DownloadError>
    where
        S: StatusSink + 'static,
    {
        if request.url.trim().is_empty() {
            return Err(DownloadError::EmptyUrl);
        }
        if !request.output_dir.is_dir() {
            return Err(DownloadError::OutputDirMissing(request.output_dir));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("[Session] Rejected {}: a download is already running", request.url);
            return Err(DownloadError::Busy);
        }
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let downloader = Arc::clone(&self.downloader);
        let target = classify(&request.url);
        let sink = Arc::new(sink);
        let worker_sink = Arc::clone(&sink);
        log::info!("[Session] Accepted {}", request.url);

        Ok(self.runtime.spawn(async move {
            let _guard = guard;
            let worker = tokio::spawn(async move { downloader.download(&request, worker_sink.as_ref()).await });

            match worker.await {
                Ok(outcome) => outcome,
                // A panicking backend never reached its terminal report
                Err(e) => {
                    log::error!("[Session] Download worker failed: {}", e);
                    let outcome = ExecutionOutcome::Failure {
                        tool: target.tool(),
                        exit_code: None,
                        diagnostic: e.to_string(),
                    };
                    sink.report(StatusUpdate::finished(target, &outcome));
                    outcome
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::command::CommandLine;
    use crate::downloader::models::{MediaFormat, Quality, RequestState, StatusMessage, Target};
    use crate::downloader::traits::FetcherBackend;
    use async_trait::async_trait;
    use std::path::Path;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Blocks until released so overlap can be observed
    struct GatedBackend {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl FetcherBackend for GatedBackend {
        fn name(&self) -> &'static str {
            "gated"
        }

        fn target(&self) -> Target {
            Target::GeneralFetcher
        }

        fn program(&self) -> &Path {
            Path::new("gated")
        }

        fn build_args(&self, request: &DownloadRequest) -> Vec<String> {
            vec![request.url.clone()]
        }

        async fn execute(&self, command: CommandLine) -> ExecutionOutcome {
            self.gate.notified().await;
            ExecutionOutcome::Success {
                output_dir: command.output_dir,
            }
        }
    }

    fn gated_session() -> (DownloadSession, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut downloader = Downloader::new();
        downloader.add_backend(Box::new(GatedBackend { gate: Arc::clone(&gate) }));
        (DownloadSession::new(downloader, Handle::current()), gate)
    }

    #[tokio::test]
    async fn test_second_request_rejected_while_busy() {
        let dir = tempfile::tempdir().unwrap();
        let (session, gate) = gated_session();
        let (emitter, mut rx) = status_channel();

        let first = session
            .start_download("https://example.com/a", "MP4_VIDEO", "HD_720P", dir.path(), emitter.clone())
            .unwrap();
        assert!(session.is_busy());

        let second = session.start_download("https://example.com/b", "MP4_VIDEO", "HD_720P", dir.path(), emitter);
        assert!(matches!(second, Err(DownloadError::Busy)));

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(outcome.is_success());
        assert!(!session.is_busy());

        let states: Vec<_> = rx.drain().into_iter().map(|u| u.state).collect();
        assert_eq!(
            states,
            vec![RequestState::Preparing, RequestState::Executing, RequestState::Succeeded]
        );
    }

    #[tokio::test]
    async fn test_guard_released_for_next_request() {
        let dir = tempfile::tempdir().unwrap();
        let (session, gate) = gated_session();

        let first = session
            .submit(
                DownloadRequest::new("https://example.com/a", MediaFormat::Mp3Audio, Quality::BestAudio, dir.path()),
                |_: StatusUpdate| {},
            )
            .unwrap();
        gate.notify_one();
        first.await.unwrap();

        let second = session
            .submit(
                DownloadRequest::new("https://example.com/b", MediaFormat::Mp3Audio, Quality::BestAudio, dir.path()),
                |_: StatusUpdate| {},
            )
            .unwrap();
        gate.notify_one();
        tokio::time::timeout(Duration::from_secs(5), second)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_url_rejected_without_taking_guard() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _gate) = gated_session();
        let result = session.start_download("   ", "MP3_AUDIO", "BEST_AUDIO", dir.path(), |_: StatusUpdate| {});
        assert!(matches!(result, Err(DownloadError::EmptyUrl)));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_missing_output_dir_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let (session, _gate) = gated_session();
        let result = session.start_download("https://example.com/a", "MP3_AUDIO", "BEST_AUDIO", &missing, |_: StatusUpdate| {});
        assert!(matches!(result, Err(DownloadError::OutputDirMissing(p)) if p == missing));
        assert!(!session.is_busy());
    }

    struct PanickingBackend;

    #[async_trait]
    impl FetcherBackend for PanickingBackend {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn target(&self) -> Target {
            Target::GeneralFetcher
        }

        fn program(&self) -> &Path {
            Path::new("panicking")
        }

        fn build_args(&self, request: &DownloadRequest) -> Vec<String> {
            vec![request.url.clone()]
        }

        async fn execute(&self, _command: CommandLine) -> ExecutionOutcome {
            panic!("backend blew up");
        }
    }

    #[tokio::test]
    async fn test_panicking_backend_still_reports_terminal_update() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = Downloader::new();
        downloader.add_backend(Box::new(PanickingBackend));
        let session = DownloadSession::new(downloader, Handle::current());
        let (emitter, mut rx) = status_channel();

        let outcome = session
            .start_download("https://example.com/a", "MP4_VIDEO", "HD_720P", dir.path(), emitter)
            .unwrap()
            .await
            .unwrap();

        assert!(matches!(outcome, ExecutionOutcome::Failure { exit_code: None, .. }));
        assert!(!session.is_busy());

        let updates = rx.drain();
        let states: Vec<_> = updates.iter().map(|u| u.state).collect();
        assert_eq!(
            states,
            vec![RequestState::Preparing, RequestState::Executing, RequestState::Failed]
        );
        assert!(matches!(updates[2].message, StatusMessage::Unexpected { .. }));
    }

    #[tokio::test]
    async fn test_receiver_ends_when_emitters_dropped() {
        let (emitter, mut rx) = status_channel();
        emitter.report(StatusUpdate::preparing());
        drop(emitter);
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
