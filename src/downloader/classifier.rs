// URL classifier - picks the fetcher for a pasted link
//
// Pure string match, no network access.

use regex::Regex;

use super::models::Target;

lazy_static::lazy_static! {
    static ref STREAMING_RE: Regex = Regex::new(
        r"^https?://open\.spotify\.com/(track|album|playlist|artist|show|episode)/[A-Za-z0-9]+"
    ).unwrap();
}

/// Streaming-service links go to spotdl, everything else to yt-dlp
pub fn classify(url: &str) -> Target {
    if STREAMING_RE.is_match(url) {
        Target::StreamingService
    } else {
        Target::GeneralFetcher
    }
}
