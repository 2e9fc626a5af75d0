// Common data models for the download pipeline
//
// Everything here is created per request and dropped once the request
// reaches a terminal state.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::tools::ToolType;

/// Whether a format extracts audio or re-encodes video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Output container/codec chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Mp3Audio,
    FlacLossless,
    AacAudio,
    Mp4Video,
    MovVideo,
    WebmVideo,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 6] = [
        Self::Mp3Audio,
        Self::FlacLossless,
        Self::AacAudio,
        Self::Mp4Video,
        Self::MovVideo,
        Self::WebmVideo,
    ];

    /// Stable internal key, never localized
    pub fn key(&self) -> &'static str {
        match self {
            Self::Mp3Audio => "MP3_AUDIO",
            Self::FlacLossless => "FLAC_LOSSLESS",
            Self::AacAudio => "AAC_AUDIO",
            Self::Mp4Video => "MP4_VIDEO",
            Self::MovVideo => "MOV_VIDEO",
            Self::WebmVideo => "WEBM_VIDEO",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Mp3Audio | Self::FlacLossless | Self::AacAudio => MediaKind::Audio,
            Self::Mp4Video | Self::MovVideo | Self::WebmVideo => MediaKind::Video,
        }
    }

    /// Codec/container name handed to the general fetcher
    pub fn codec(&self) -> &'static str {
        match self {
            Self::Mp3Audio => "mp3",
            Self::FlacLossless => "flac",
            Self::AacAudio => "aac",
            Self::Mp4Video => "mp4",
            Self::MovVideo => "mov",
            Self::WebmVideo => "webm",
        }
    }
}

/// Fidelity tier: bitrate code for audio, resolution ceiling for video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quality {
    BestVideo,
    #[serde(rename = "FHD_1080P")]
    Fhd1080p,
    #[serde(rename = "HD_720P")]
    Hd720p,
    BestAudio,
    HighAudio,
    MediumAudio,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Self::BestVideo,
        Self::Fhd1080p,
        Self::Hd720p,
        Self::BestAudio,
        Self::HighAudio,
        Self::MediumAudio,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::BestVideo => "BEST_VIDEO",
            Self::Fhd1080p => "FHD_1080P",
            Self::Hd720p => "HD_720P",
            Self::BestAudio => "BEST_AUDIO",
            Self::HighAudio => "HIGH_AUDIO",
            Self::MediumAudio => "MEDIUM_AUDIO",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.key() == key)
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::BestVideo | Self::Fhd1080p | Self::Hd720p => MediaKind::Video,
            Self::BestAudio | Self::HighAudio | Self::MediumAudio => MediaKind::Audio,
        }
    }

    /// Tiers offered for a media kind, best first
    pub fn for_kind(kind: MediaKind) -> impl Iterator<Item = Quality> {
        Self::ALL.into_iter().filter(move |q| q.kind() == kind)
    }

    /// First (best) tier for a media kind
    pub fn default_for(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Audio => Self::BestAudio,
            MediaKind::Video => Self::BestVideo,
        }
    }
}

/// Which external fetcher a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    StreamingService,
    GeneralFetcher,
}

impl Target {
    pub fn tool(&self) -> ToolType {
        match self {
            Self::StreamingService => ToolType::SpotDl,
            Self::GeneralFetcher => ToolType::YtDlp,
        }
    }
}

/// One download as requested by the user
///
/// Format and quality are `None` when the caller passed a key outside the
/// enumerated set. The command builder then falls back to safe defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format: Option<MediaFormat>,
    pub quality: Option<Quality>,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(
        url: impl Into<String>,
        format: MediaFormat,
        quality: Quality,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            format: Some(format),
            quality: Some(quality),
            output_dir: output_dir.into(),
        }
    }

    /// Build from stable option keys, keeping unknown keys as `None`
    pub fn from_keys(
        url: impl Into<String>,
        format_key: &str,
        quality_key: &str,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            format: MediaFormat::from_key(format_key),
            quality: Quality::from_key(quality_key),
            output_dir: output_dir.into(),
        }
    }
}

/// Terminal result of running an external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success {
        output_dir: PathBuf,
    },
    Failure {
        tool: ToolType,
        /// None when the process never produced an exit code
        exit_code: Option<i32>,
        diagnostic: String,
    },
    NotFound {
        tool: ToolType,
    },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Per-request state machine:
/// Idle -> Preparing -> Executing -> {Succeeded | Failed | ToolNotFound}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    Preparing,
    Executing,
    Succeeded,
    Failed,
    ToolNotFound,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::ToolNotFound)
    }

    pub fn from_outcome(outcome: &ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Success { .. } => Self::Succeeded,
            ExecutionOutcome::Failure { .. } => Self::Failed,
            ExecutionOutcome::NotFound { .. } => Self::ToolNotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Structured status, rendered to text by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusMessage {
    Preparing,
    ProcessingStreaming,
    ExecutingGeneral,
    Succeeded {
        target: Target,
        output_dir: PathBuf,
    },
    Failed {
        tool: ToolType,
        exit_code: i32,
        diagnostic: String,
    },
    ToolMissing {
        tool: ToolType,
    },
    Unexpected {
        detail: String,
    },
}

/// A single checkpoint reported through the status callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub state: RequestState,
    pub severity: Severity,
    pub message: StatusMessage,
}

impl StatusUpdate {
    pub fn preparing() -> Self {
        Self {
            state: RequestState::Preparing,
            severity: Severity::Info,
            message: StatusMessage::Preparing,
        }
    }

    pub fn executing(target: Target) -> Self {
        let message = match target {
            Target::StreamingService => StatusMessage::ProcessingStreaming,
            Target::GeneralFetcher => StatusMessage::ExecutingGeneral,
        };
        Self {
            state: RequestState::Executing,
            severity: Severity::Info,
            message,
        }
    }

    /// Terminal update for a finished request
    pub fn finished(target: Target, outcome: &ExecutionOutcome) -> Self {
        let state = RequestState::from_outcome(outcome);
        let (severity, message) = match outcome {
            ExecutionOutcome::Success { output_dir } => (
                Severity::Success,
                StatusMessage::Succeeded {
                    target,
                    output_dir: output_dir.clone(),
                },
            ),
            ExecutionOutcome::Failure {
                tool,
                exit_code: Some(code),
                diagnostic,
            } => (
                Severity::Error,
                StatusMessage::Failed {
                    tool: *tool,
                    exit_code: *code,
                    diagnostic: diagnostic.clone(),
                },
            ),
            ExecutionOutcome::Failure {
                exit_code: None,
                diagnostic,
                ..
            } => (
                Severity::Error,
                StatusMessage::Unexpected {
                    detail: diagnostic.clone(),
                },
            ),
            ExecutionOutcome::NotFound { tool } => {
                (Severity::Error, StatusMessage::ToolMissing { tool: *tool })
            }
        };
        Self {
            state,
            severity,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_keys_round_trip_through_table() {
        for format in MediaFormat::ALL {
            assert_eq!(MediaFormat::from_key(format.key()), Some(format));
        }
        assert_eq!(MediaFormat::from_key("OGG_AUDIO"), None);
    }

    #[test]
    fn test_format_kinds() {
        assert_eq!(MediaFormat::FlacLossless.kind(), MediaKind::Audio);
        assert_eq!(MediaFormat::WebmVideo.kind(), MediaKind::Video);
        assert_eq!(Quality::Hd720p.kind(), MediaKind::Video);
        assert_eq!(Quality::MediumAudio.kind(), MediaKind::Audio);
    }

    #[test]
    fn test_quality_tiers_per_kind() {
        let audio: Vec<_> = Quality::for_kind(MediaKind::Audio).collect();
        assert_eq!(
            audio,
            vec![Quality::BestAudio, Quality::HighAudio, Quality::MediumAudio]
        );
        assert_eq!(Quality::default_for(MediaKind::Video), Quality::BestVideo);
    }

    #[test]
    fn test_request_from_unknown_keys() {
        let req = DownloadRequest::from_keys("https://x", "NOPE", "HD_720P", "/tmp");
        assert_eq!(req.format, None);
        assert_eq!(req.quality, Some(Quality::Hd720p));
    }

    #[test]
    fn test_terminal_states() {
        assert!(RequestState::ToolNotFound.is_terminal());
        assert!(RequestState::Failed.is_terminal());
        assert!(!RequestState::Executing.is_terminal());
    }

    #[test]
    fn test_finished_without_exit_code_is_unexpected() {
        let outcome = ExecutionOutcome::Failure {
            tool: ToolType::YtDlp,
            exit_code: None,
            diagnostic: "Permission denied".to_string(),
        };
        let update = StatusUpdate::finished(Target::GeneralFetcher, &outcome);
        assert_eq!(update.state, RequestState::Failed);
        assert_eq!(update.severity, Severity::Error);
        assert!(matches!(update.message, StatusMessage::Unexpected { .. }));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = ExecutionOutcome::NotFound {
            tool: ToolType::SpotDl,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "not_found");
    }
}
