// Orchestrator - runs one request through classify, build and execute

use super::classifier::classify;
use super::command::backend_for;
use super::models::{DownloadRequest, ExecutionOutcome, StatusUpdate, Target};
use super::tools::ToolPaths;
use super::traits::{FetcherBackend, StatusSink};

pub struct Downloader {
    backends: Vec<Box<dyn FetcherBackend>>,
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Both fetchers, wired to the resolved executables
    pub fn from_tools(tools: &ToolPaths, fragment_workers: u8) -> Self {
        let mut downloader = Self::new();
        for target in [Target::StreamingService, Target::GeneralFetcher] {
            downloader.add_backend(backend_for(target, tools, fragment_workers));
        }
        downloader
    }

    /// Later registrations for the same target replace earlier ones
    pub fn add_backend(&mut self, backend: Box<dyn FetcherBackend>) {
        self.backends.retain(|b| b.target() != backend.target());
        self.backends.push(backend);
    }

    fn registered(&self, target: Target) -> Option<&dyn FetcherBackend> {
        self.backends
            .iter()
            .find(|b| b.target() == target)
            .map(|b| b.as_ref())
    }

    /// Run one request, reporting Preparing, Executing and exactly one terminal update
    pub async fn download(&self, request: &DownloadRequest, sink: &dyn StatusSink) -> ExecutionOutcome {
        sink.report(StatusUpdate::preparing());

        let target = classify(&request.url);
        log::info!("[Downloader] {} classified as {:?}", request.url, target);

        let outcome = match self.registered(target) {
            Some(backend) => {
                let command = backend.build(request);
                sink.report(StatusUpdate::executing(target));
                log::debug!("[Downloader] Trying backend: {}", backend.name());
                backend.execute(command).await
            }
            None => {
                log::error!("[Downloader] No backend registered for {:?}", target);
                sink.report(StatusUpdate::executing(target));
                ExecutionOutcome::NotFound { tool: target.tool() }
            }
        };

        match &outcome {
            ExecutionOutcome::Success { .. } => log::info!("[Downloader] ✓ {:?} download finished", target),
            other => log::warn!("[Downloader] ✗ {:?} download failed: {:?}", target, other),
        }

        sink.report(StatusUpdate::finished(target, &outcome));
        outcome
    }
}
