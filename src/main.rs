use std::process::ExitCode;

fn main() -> ExitCode {
    match universal_downloader_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[App] {:#}", e);
            ExitCode::FAILURE
        }
    }
}
