// Helper functions for backend implementations

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;

/// Longest diagnostic shown to the user, in characters
pub const DIAGNOSTIC_LIMIT: usize = 500;

/// Marker appended to a cut diagnostic
pub const TRUNCATION_MARKER: &str = "...";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Run a command and collect its output (shared utility)
///
/// Waits as long as the child runs. Spawn failures keep their
/// `io::ErrorKind` so callers can tell a missing executable apart from
/// other errors.
pub async fn run_output(program: &Path, args: &[String]) -> io::Result<std::process::Output> {
    let mut cmd = TokioCommand::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);

    let mut child = cmd.spawn()?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other(format!("Failed to capture stdout from {}", program.display())))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other(format!("Failed to capture stderr from {}", program.display())))?;

    // Drain both pipes concurrently so a chatty child never blocks on a full pipe
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await?;
        Ok::<Vec<u8>, io::Error>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await?;
        Ok::<Vec<u8>, io::Error>(buf)
    });

    let status = child.wait().await?;

    let stdout = stdout_task
        .await
        .map_err(|e| io::Error::other(format!("stdout task failed: {}", e)))??;
    let stderr = stderr_task
        .await
        .map_err(|e| io::Error::other(format!("stderr task failed: {}", e)))??;

    Ok(std::process::Output { status, stdout, stderr })
}

/// Cut text to `limit` characters, appending the truncation marker if cut
pub fn truncate_diagnostic(text: &str, limit: usize) -> String {
    let text = text.trim_end();
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// User's Downloads folder, falling back to the working directory
pub fn default_download_dir() -> PathBuf {
    if let Some(dir) = dirs::download_dir().filter(|d| d.is_dir()) {
        return dir;
    }

    if let Some(dir) = dirs::home_dir()
        .map(|h| h.join("Downloads"))
        .filter(|d| d.is_dir())
    {
        return dir;
    }

    PathBuf::from(".")
}
