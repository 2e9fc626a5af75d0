pub mod cli;
pub mod config;
pub mod downloader;
pub mod i18n;

use anyhow::Context;

use cli::Cli;

/// Directives for this crate's bin and lib targets only
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "universal_downloader=debug,universal_downloader_lib=debug"
    } else {
        "universal_downloader=info,universal_downloader_lib=info"
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(false)));
    if verbose {
        builder.parse_filters(log_filter(true));
    }
    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = cli.load_config()?;
    let catalog = cli::select_catalog(&config);
    log::info!("[App] Language: {}", catalog.display);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(cli::dispatch(cli, config, catalog))
}
