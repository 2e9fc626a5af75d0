use std::path::{Path, PathBuf};

use crate::downloader::command::DEFAULT_FRAGMENT_WORKERS;
use crate::downloader::format_selector::FormatSelector;
use crate::downloader::models::{DownloadRequest, MediaKind, Target};
use crate::downloader::traits::FetcherBackend;

/// Naming template; playlist index and uploader only appear when the site has them
pub const OUTPUT_TEMPLATE: &str = "%(playlist_index&{} - |)s%(uploader&{} - |)s%(title)s.%(ext)s";

/// General-purpose fetcher for arbitrary video/audio sites
pub struct YtDlpBackend {
    ytdlp_bin: PathBuf,
    ffmpeg_location: Option<PathBuf>,
    fragment_workers: u8,
}

impl YtDlpBackend {
    pub fn new(ytdlp_bin: PathBuf) -> Self {
        Self {
            ytdlp_bin,
            ffmpeg_location: None,
            fragment_workers: DEFAULT_FRAGMENT_WORKERS,
        }
    }

    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    pub fn with_fragment_workers(mut self, workers: u8) -> Self {
        // -N 0 is rejected by yt-dlp
        self.fragment_workers = workers.max(1);
        self
    }
}

impl FetcherBackend for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn target(&self) -> Target {
        Target::GeneralFetcher
    }

    fn program(&self) -> &Path {
        &self.ytdlp_bin
    }

    fn build_args(&self, request: &DownloadRequest) -> Vec<String> {
        let template = request.output_dir.join(OUTPUT_TEMPLATE);

        let mut args = vec![
            "-N".to_string(),
            self.fragment_workers.to_string(),
            "--no-part".to_string(),
            "-o".to_string(),
            template.to_string_lossy().to_string(),
        ];

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().to_string());
        }

        // Unknown format: no conversion flags, treat as video
        let kind = request.format.map_or(MediaKind::Video, |f| f.kind());
        if let Some(format) = request.format {
            args.extend(FormatSelector::format_flags(format));
        }
        args.extend(FormatSelector::quality_flags(kind, request.quality));

        args.push(request.url.clone());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::tools::ToolType;
    use crate::downloader::format_selector::BEST_VIDEO_SELECTOR;
    use crate::downloader::models::{MediaFormat, Quality};
    use pretty_assertions::assert_eq;

    fn backend() -> YtDlpBackend {
        YtDlpBackend::new(PathBuf::from(ToolType::YtDlp.binary_name()))
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_audio_request_args() {
        let req = DownloadRequest::new(
            "https://example.com/watch?v=xyz",
            MediaFormat::Mp3Audio,
            Quality::HighAudio,
            "/tmp/out",
        );
        let args = backend().build_args(&req);
        let template = Path::new("/tmp/out").join(OUTPUT_TEMPLATE);

        assert_eq!(
            args,
            vec![
                "-N".to_string(),
                "8".to_string(),
                "--no-part".to_string(),
                "-o".to_string(),
                template.to_string_lossy().to_string(),
                "-x".to_string(),
                "--audio-format".to_string(),
                "mp3".to_string(),
                "--audio-quality".to_string(),
                "2".to_string(),
                "https://example.com/watch?v=xyz".to_string(),
            ]
        );
    }

    #[test]
    fn test_video_request_never_has_audio_quality() {
        for quality in Quality::ALL {
            let req = DownloadRequest::new("https://v.example/1", MediaFormat::MovVideo, quality, "/o");
            let args = backend().build_args(&req);
            assert!(!args.iter().any(|a| a == "--audio-quality" || a == "-x"));
            assert!(value_after(&args, "-f").is_some());
            assert_eq!(value_after(&args, "--recode-video"), Some("mov"));
        }
    }

    #[test]
    fn test_audio_request_never_has_selector() {
        for quality in Quality::ALL {
            let req = DownloadRequest::new("https://v.example/1", MediaFormat::AacAudio, quality, "/o");
            let args = backend().build_args(&req);
            assert!(!args.iter().any(|a| a == "-f"));
            let code = value_after(&args, "--audio-quality").unwrap();
            assert!(["0", "2", "5"].contains(&code));
        }
    }

    #[test]
    fn test_unknown_format_key_falls_back_to_best_video() {
        let req = DownloadRequest::from_keys("https://v.example/1", "OGG_AUDIO", "WHATEVER", "/o");
        let args = backend().build_args(&req);
        assert!(!args.iter().any(|a| a == "--recode-video" || a == "-x"));
        assert_eq!(value_after(&args, "-f"), Some(BEST_VIDEO_SELECTOR));
    }

    #[test]
    fn test_ffmpeg_location_precedes_format_flags() {
        let req = DownloadRequest::new("https://v.example/1", MediaFormat::FlacLossless, Quality::BestAudio, "/o");
        let args = backend()
            .with_ffmpeg_location(Some(PathBuf::from("/app/ffmpeg")))
            .build_args(&req);
        let ffmpeg = args.iter().position(|a| a == "--ffmpeg-location").unwrap();
        let extract = args.iter().position(|a| a == "-x").unwrap();
        assert!(ffmpeg < extract);
        assert_eq!(value_after(&args, "--ffmpeg-location"), Some("/app/ffmpeg"));
    }

    #[test]
    fn test_zero_workers_clamped() {
        let req = DownloadRequest::new("https://v.example/1", MediaFormat::Mp4Video, Quality::BestVideo, "/o");
        let args = backend().with_fragment_workers(0).build_args(&req);
        assert_eq!(value_after(&args, "-N"), Some("1"));
    }
}
