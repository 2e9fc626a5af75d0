// FormatSelector - maps user choices onto general fetcher flags
//
// Handles:
// - Format flags (audio extraction vs. video re-encode)
// - Audio quality codes (0 = best VBR, 2 = high VBR, 5 = medium CBR)
// - Video format selectors capped by height
//
// Unknown or mismatched choices fall back to the best tier of the
// requested media kind.

use super::models::{MediaFormat, MediaKind, Quality};

/// Selector used when no usable video quality was chosen
pub const BEST_VIDEO_SELECTOR: &str = "bestvideo+bestaudio/best";

/// Audio quality code used when no usable audio quality was chosen
pub const BEST_AUDIO_CODE: u8 = 0;

pub struct FormatSelector;

impl FormatSelector {
    /// Flags selecting extraction or re-encode for a format
    pub fn format_flags(format: MediaFormat) -> Vec<String> {
        match format.kind() {
            MediaKind::Audio => vec![
                "-x".to_string(),
                "--audio-format".to_string(),
                format.codec().to_string(),
            ],
            MediaKind::Video => vec!["--recode-video".to_string(), format.codec().to_string()],
        }
    }

    /// Encoder quality code for `--audio-quality`
    pub fn audio_quality_code(quality: Option<Quality>) -> u8 {
        match quality {
            Some(Quality::BestAudio) => 0,
            Some(Quality::HighAudio) => 2,
            Some(Quality::MediumAudio) => 5,
            _ => BEST_AUDIO_CODE,
        }
    }

    /// Selector expression for `-f`
    pub fn video_selector(quality: Option<Quality>) -> &'static str {
        match quality {
            Some(Quality::Fhd1080p) => "bestvideo[height<=1080]+bestaudio/best",
            Some(Quality::Hd720p) => "bestvideo[height<=720]+bestaudio/best",
            _ => BEST_VIDEO_SELECTOR,
        }
    }

    /// Quality flags for the kind of media requested; never mixes kinds
    pub fn quality_flags(kind: MediaKind, quality: Option<Quality>) -> Vec<String> {
        match kind {
            MediaKind::Audio => vec![
                "--audio-quality".to_string(),
                Self::audio_quality_code(quality).to_string(),
            ],
            MediaKind::Video => vec!["-f".to_string(), Self::video_selector(quality).to_string()],
        }
    }
}
