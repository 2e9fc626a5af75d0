// Execution runner - spawns one external tool and classifies the result
//
// Never returns an error: every way a run can end is folded into an
// ExecutionOutcome so nothing escapes the worker task.

use std::io;

use super::command::CommandLine;
use super::models::ExecutionOutcome;
use super::utils::{run_output, truncate_diagnostic, DIAGNOSTIC_LIMIT};

/// Run to completion with no timeout; the tool's own network timeouts apply
pub async fn run(command: CommandLine) -> ExecutionOutcome {
    log::info!("[Runner] Starting {}", command);

    match run_output(&command.program, &command.args).await {
        Ok(output) if output.status.success() => {
            log::info!("[Runner] {} finished", command.tool);
            ExecutionOutcome::Success {
                output_dir: command.output_dir,
            }
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let text = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).to_string()
            } else {
                stderr.to_string()
            };
            let diagnostic = truncate_diagnostic(&text, DIAGNOSTIC_LIMIT);

            log::warn!(
                "[Runner] {} exited with {:?}: {}",
                command.tool,
                output.status.code(),
                diagnostic
            );
            ExecutionOutcome::Failure {
                tool: command.tool,
                exit_code: output.status.code(),
                diagnostic,
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::error!(
                "[Runner] {} not found at {}",
                command.tool,
                command.program.display()
            );
            ExecutionOutcome::NotFound { tool: command.tool }
        }
        Err(e) => {
            log::error!("[Runner] {} could not run: {}", command.tool, e);
            ExecutionOutcome::Failure {
                tool: command.tool,
                exit_code: None,
                diagnostic: e.to_string(),
            }
        }
    }
}
