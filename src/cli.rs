// Command-line front end: the foreground side of the status channel

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::downloader::models::{MediaFormat, MediaKind, Quality};
use crate::downloader::session::{status_channel, DownloadSession};
use crate::downloader::tools::ToolManager;
use crate::downloader::Downloader;
use crate::i18n::{self, Catalog};

#[derive(Parser, Debug)]
#[command(name = "universal-downloader")]
#[command(author, version, about = "Download media from Spotify or any site yt-dlp supports", long_about = None)]
pub struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// UI language tag (en, zh_TW, zh_CN, ja, fr, de, es, ru)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Path to config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding bundled yt-dlp, spotdl and ffmpeg
    #[arg(long, global = true)]
    pub tools_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download one URL
    Download {
        url: String,

        /// Format key (MP3_AUDIO, ...) or its localized name
        #[arg(short, long, default_value = "MP3_AUDIO")]
        format: String,

        /// Quality key or localized name; defaults to the best tier for the format
        #[arg(short, long)]
        quality: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show where yt-dlp, spotdl and ffmpeg were found
    Tools {
        #[arg(long)]
        json: bool,
    },

    /// List format and quality options
    Formats,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// File, then environment, then flags
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match self.config.clone().or_else(AppConfig::default_path) {
            Some(path) => AppConfig::load(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::default(),
        };
        config.apply_env();

        if let Some(lang) = &self.lang {
            config.language = Some(lang.clone());
        }
        if let Some(dir) = &self.tools_dir {
            config.tools_dir = Some(dir.clone());
        }
        if let Commands::Download {
            output: Some(dir), ..
        } = &self.command
        {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }
}

pub fn select_catalog(config: &AppConfig) -> &'static Catalog {
    let locale = config.language.clone().or_else(i18n::detect_locale);
    let catalog = i18n::resolve_language(
        locale.as_deref(),
        &config.language_aliases,
        &config.fallback_language,
    );
    log::debug!("[CLI] Locale {:?} -> {}", locale, catalog.tag);
    catalog
}

/// Stable key for a format argument; unmatched text is passed through
pub fn format_key(catalog: &Catalog, text: &str) -> String {
    catalog
        .format_from_display(text)
        .map(|f| f.key().to_string())
        .unwrap_or_else(|| text.trim().to_string())
}

/// Stable key for a quality argument, or the first tier for the format's kind
pub fn quality_key(catalog: &Catalog, format_key: &str, text: Option<&str>) -> String {
    match text {
        Some(text) => catalog
            .quality_from_display(text)
            .map(|q| q.key().to_string())
            .unwrap_or_else(|| text.trim().to_string()),
        None => {
            let kind = MediaFormat::from_key(format_key).map_or(MediaKind::Video, |f| f.kind());
            Quality::default_for(kind).key().to_string()
        }
    }
}

pub async fn dispatch(cli: Cli, config: AppConfig, catalog: &'static Catalog) -> anyhow::Result<()> {
    match cli.command {
        Commands::Download {
            url,
            format,
            quality,
            ..
        } => {
            let format = format_key(catalog, &format);
            let quality = quality_key(catalog, &format, quality.as_deref());
            run_download(&config, catalog, &url, &format, &quality).await
        }
        Commands::Tools { json } => show_tools(&config, json).await,
        Commands::Formats => {
            show_formats(catalog);
            Ok(())
        }
    }
}

/// Tool lookup spawns `which` and `--version` children; run it on the blocking pool
pub async fn with_tool_manager<T, F>(tools_dir: Option<PathBuf>, lookup: F) -> anyhow::Result<T>
where
    F: FnOnce(&ToolManager) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || lookup(&ToolManager::new(tools_dir)))
        .await
        .context("tool lookup task failed")
}

async fn run_download(
    config: &AppConfig,
    catalog: &'static Catalog,
    url: &str,
    format: &str,
    quality: &str,
) -> anyhow::Result<()> {
    let tools = with_tool_manager(config.tools_dir.clone(), ToolManager::tool_paths).await?;
    let downloader = Downloader::from_tools(&tools, config.fragment_workers);
    let session = DownloadSession::new(downloader, Handle::current());

    let (emitter, mut rx) = status_channel();
    let handle = match session.start_download(url, format, quality, &config.output_dir, emitter) {
        Ok(handle) => handle,
        Err(e) => {
            println!("{}", i18n::render_error(catalog, &e));
            return Err(e.into());
        }
    };

    // Print until the terminal update; the channel closes when the worker ends
    while let Some(update) = rx.recv().await {
        log::debug!("[CLI] {} update: {:?}", update.severity, update.state);
        println!("{}", i18n::render(catalog, &update.message));
        if update.state.is_terminal() {
            break;
        }
    }

    let outcome = handle.await.context("download worker panicked")?;
    if !outcome.is_success() {
        anyhow::bail!("download did not complete: {:?}", outcome);
    }
    Ok(())
}

async fn show_tools(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let tools = with_tool_manager(config.tools_dir.clone(), ToolManager::get_all_tools).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    for tool in &tools {
        let mark = if tool.is_available { "✓" } else { "✗" };
        println!(
            "{} {:<8} {:<10} {}",
            mark,
            tool.name,
            tool.version.as_deref().unwrap_or("-"),
            tool.path.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn show_formats(catalog: &Catalog) {
    println!("{}", catalog.format_label);
    for format in MediaFormat::ALL {
        println!("  {:<16} {}", format.key(), catalog.format_name(format));
    }

    for (label, kind) in [
        (catalog.quality_video_label, MediaKind::Video),
        (catalog.quality_audio_label, MediaKind::Audio),
    ] {
        println!("{}", label);
        for quality in Quality::for_kind(kind) {
            println!("  {:<16} {}", quality.key(), catalog.quality_name(quality));
        }
    }
}
