// Downloader backends, one per external tool

pub mod spotdl;
pub mod ytdlp;

pub use spotdl::SpotDlBackend;
pub use ytdlp::YtDlpBackend;
