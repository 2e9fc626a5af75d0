use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ToolType {
    YtDlp,
    SpotDl,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::SpotDl => "spotdl",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    /// Name shown to the user in failure reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::SpotDl => "SpotDL",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    /// File name of the executable on this platform
    pub fn binary_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::Ffmpeg => "-version",
            _ => "--version",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where a tool executable was found
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolSource {
    /// Shipped next to the application or in the configured tools dir
    Bundled,
    /// Common install location or PATH
    System,
    /// Not found; the bare name is used and spawning will fail
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<String>,
    pub source: ToolSource,
    pub is_available: bool,
}

/// Executables the command builder needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ytdlp: PathBuf,
    pub spotdl: PathBuf,
    /// Set only for a bundled ffmpeg; a system ffmpeg is found by yt-dlp itself
    pub ffmpeg_location: Option<PathBuf>,
}

impl ToolPaths {
    /// Bare names, resolved by the OS at spawn time
    pub fn from_path_env() -> Self {
        Self {
            ytdlp: PathBuf::from(ToolType::YtDlp.binary_name()),
            spotdl: PathBuf::from(ToolType::SpotDl.binary_name()),
            ffmpeg_location: None,
        }
    }
}

pub struct ToolManager {
    bundled_dirs: Vec<PathBuf>,
}

impl ToolManager {
    /// `tools_dir` is searched first, then the directory of the running executable
    pub fn new(tools_dir: Option<PathBuf>) -> Self {
        let mut bundled_dirs = Vec::new();
        if let Some(dir) = tools_dir {
            bundled_dirs.push(dir);
        }
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            bundled_dirs.push(dir);
        }
        Self::with_bundled_dirs(bundled_dirs)
    }

    /// Only the given directories count as bundled locations
    pub fn with_bundled_dirs(bundled_dirs: Vec<PathBuf>) -> Self {
        Self { bundled_dirs }
    }

    pub fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let name = tool_type.as_str().to_string();
        let (path, source) = self.locate(tool_type);
        let version = path
            .as_ref()
            .and_then(|p| self.get_version(p, tool_type));

        ToolInfo {
            name,
            tool_type,
            version,
            path: path.map(|p| p.to_string_lossy().to_string()),
            source,
            is_available: source != ToolSource::Missing,
        }
    }

    pub fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::YtDlp),
            self.get_tool_info(ToolType::SpotDl),
            self.get_tool_info(ToolType::Ffmpeg),
        ]
    }

    /// Resolve every executable once, falling back to bare names
    pub fn tool_paths(&self) -> ToolPaths {
        let mut paths = ToolPaths::from_path_env();
        if let (Some(path), _) = self.locate(ToolType::YtDlp) {
            paths.ytdlp = path;
        }
        if let (Some(path), _) = self.locate(ToolType::SpotDl) {
            paths.spotdl = path;
        }
        if let (Some(path), ToolSource::Bundled) = self.locate(ToolType::Ffmpeg) {
            paths.ffmpeg_location = Some(path);
        }
        paths
    }

    fn locate(&self, tool_type: ToolType) -> (Option<PathBuf>, ToolSource) {
        let binary_name = tool_type.binary_name();

        // 1. Bundled next to the app
        for dir in &self.bundled_dirs {
            let candidate = dir.join(&binary_name);
            if candidate.is_file() {
                log::debug!("[ToolManager] {} bundled at {}", tool_type, candidate.display());
                return (Some(candidate), ToolSource::Bundled);
            }
        }

        // 2. Common install paths
        let common_paths = [
            format!("/opt/homebrew/bin/{}", binary_name),
            format!("/usr/local/bin/{}", binary_name),
            format!("/usr/bin/{}", binary_name),
        ];

        for path in common_paths {
            if Path::new(&path).is_file() {
                return (Some(PathBuf::from(path)), ToolSource::System);
            }
        }

        // 3. Try PATH
        let which = if cfg!(windows) { "where" } else { "which" };
        if let Ok(output) = Command::new(which).arg(&binary_name).output() {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if let Some(first) = stdout.lines().next().map(str::trim).filter(|l| !l.is_empty()) {
                    return (Some(PathBuf::from(first)), ToolSource::System);
                }
            }
        }

        log::debug!("[ToolManager] {} not found", tool_type);
        (None, ToolSource::Missing)
    }

    fn get_version(&self, path: &Path, tool_type: ToolType) -> Option<String> {
        match Command::new(path).arg(tool_type.version_arg()).output() {
            Ok(output) if output.status.success() => {
                // ffmpeg prints a banner; the first line carries the version
                let out = String::from_utf8_lossy(&output.stdout);
                out.lines().next().map(|l| l.trim().to_string())
            }
            _ => None,
        }
    }
}
