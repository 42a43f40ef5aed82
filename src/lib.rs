pub mod config;
pub mod models;
pub mod pipeline;

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use config::AuditConfig;
use pipeline::statistics::StatisticalAuditPipeline;

/// Install the global subscriber. Logs go to stderr; stdout carries results.
/// Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Binary entry: `disclosure-gate <records.json>`.
///
/// Prints the verdict as pretty JSON. Returns the process exit code: 0 for
/// any terminal verdict (COMPLETE, ABSTAIN, VETO), 1 for usage, config, I/O
/// or schema errors.
pub fn run(args: impl IntoIterator<Item = String>) -> i32 {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let Some(path) = args.into_iter().nth(1).map(PathBuf::from) else {
        eprintln!("usage: {} <records.json>", config::APP_NAME);
        return 1;
    };

    let config = match AuditConfig::resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return 1;
        }
    };

    let pipeline = StatisticalAuditPipeline::new(config.statistics);
    let verdict = match pipeline.run_file(&path) {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Statistical audit failed");
            return 1;
        }
    };

    match serde_json::to_string_pretty(&verdict) {
        Ok(rendered) => {
            println!("{rendered}");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to render verdict");
            1
        }
    }
}
