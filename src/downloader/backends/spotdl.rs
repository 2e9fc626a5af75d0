use std::path::{Path, PathBuf};

use crate::downloader::models::{DownloadRequest, Target};
use crate::downloader::traits::FetcherBackend;

/// Naming template resolved by spotdl itself
pub const OUTPUT_TEMPLATE: &str = "{artist} - {title}.{ext}";

/// Streaming-service fetcher; spotdl picks its own encoding
pub struct SpotDlBackend {
    binary_path: PathBuf,
}

impl SpotDlBackend {
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }
}

impl FetcherBackend for SpotDlBackend {
    fn name(&self) -> &'static str {
        "spotdl"
    }

    fn target(&self) -> Target {
        Target::StreamingService
    }

    fn program(&self) -> &Path {
        &self.binary_path
    }

    // spotdl download --output DIR/TEMPLATE URL
    fn build_args(&self, request: &DownloadRequest) -> Vec<String> {
        let template = request.output_dir.join(OUTPUT_TEMPLATE);
        vec![
            "download".to_string(),
            "--output".to_string(),
            template.to_string_lossy().to_string(),
            request.url.clone(),
        ]
    }
}
