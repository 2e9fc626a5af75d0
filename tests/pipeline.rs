// End-to-end checks through the public API: classify, build, run

use std::path::Path;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use universal_downloader_lib::downloader::command::build;
use universal_downloader_lib::downloader::runner;
use universal_downloader_lib::downloader::{
    classify, DownloadRequest, Downloader, ExecutionOutcome, RequestState, StatusUpdate, Target,
    ToolPaths, ToolType,
};

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[test]
fn scenario_a_streaming_track() {
    let url = "https://open.spotify.com/track/abc123";
    let request = DownloadRequest::from_keys(url, "MP3_AUDIO", "BEST_AUDIO", "/tmp/out");
    assert_eq!(classify(url), Target::StreamingService);

    let command = build(&request, &ToolPaths::from_path_env());
    assert_eq!(command.tool, ToolType::SpotDl);
    assert_eq!(command.args[0], "download");

    let output = &command.args[command.args.iter().position(|a| a == "--output").unwrap() + 1];
    assert!(output.contains(Path::new("/tmp/out").to_string_lossy().as_ref()));
    assert!(output.ends_with("{artist} - {title}.{ext}"));
    assert_eq!(command.args.last().map(String::as_str), Some(url));
    assert!(!command.args.iter().any(|a| a == "-x" || a == "-f" || a == "--audio-quality"));
}

#[test]
fn scenario_b_general_audio() {
    let url = "https://example.com/watch?v=xyz";
    let request = DownloadRequest::from_keys(url, "MP3_AUDIO", "BEST_AUDIO", "/tmp/out");
    assert_eq!(classify(url), Target::GeneralFetcher);

    let args = build(&request, &ToolPaths::from_path_env()).args;
    assert!(has_pair(&args, "-N", "8"));
    assert!(args.iter().any(|a| a == "--no-part"));
    assert!(args.iter().any(|a| a == "-x"));
    assert!(has_pair(&args, "--audio-format", "mp3"));
    assert!(has_pair(&args, "--audio-quality", "0"));
    assert!(!args.iter().any(|a| a == "-f"));
    assert_eq!(args.last().map(String::as_str), Some(url));
}

#[test]
fn scenario_c_general_video_720() {
    let url = "https://example.com/watch?v=xyz";
    let request = DownloadRequest::from_keys(url, "MP4_VIDEO", "HD_720P", "/tmp/out");

    let args = build(&request, &ToolPaths::from_path_env()).args;
    assert!(has_pair(&args, "--recode-video", "mp4"));
    let selector = &args[args.iter().position(|a| a == "-f").unwrap() + 1];
    assert!(selector.contains("height<=720"));
    assert!(!args.iter().any(|a| a == "--audio-quality"));
    assert_eq!(args.last().map(String::as_str), Some(url));
}

#[test]
fn unknown_video_quality_falls_back_to_best() {
    let request = DownloadRequest::from_keys("https://example.com/v", "WEBM_VIDEO", "8K_ULTRA", "/tmp/out");
    let args = build(&request, &ToolPaths::from_path_env()).args;
    assert!(has_pair(&args, "-f", "bestvideo+bestaudio/best"));
}

#[tokio::test]
async fn scenario_d_missing_tool_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let tools = ToolPaths {
        ytdlp: dir.path().join("no-such-yt-dlp"),
        spotdl: dir.path().join("no-such-spotdl"),
        ffmpeg_location: None,
    };

    let request = DownloadRequest::from_keys("https://example.com/v", "MP3_AUDIO", "BEST_AUDIO", dir.path());
    let outcome = runner::run(build(&request, &tools)).await;
    assert_eq!(outcome, ExecutionOutcome::NotFound { tool: ToolType::YtDlp });

    // Same through the orchestrator, with the status trail
    let downloader = Downloader::from_tools(&tools, 8);
    let updates = Mutex::new(Vec::new());
    let sink = |u: StatusUpdate| updates.lock().unwrap().push(u);
    let request = DownloadRequest::from_keys("https://open.spotify.com/album/xyz789", "MP3_AUDIO", "BEST_AUDIO", dir.path());
    let outcome = downloader.download(&request, &sink).await;

    assert_eq!(outcome, ExecutionOutcome::NotFound { tool: ToolType::SpotDl });
    let states: Vec<_> = updates.into_inner().unwrap().into_iter().map(|u| u.state).collect();
    assert_eq!(
        states,
        vec![RequestState::Preparing, RequestState::Executing, RequestState::ToolNotFound]
    );
}
