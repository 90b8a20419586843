use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use waypost::core::config::{self, CliOverrides};
use waypost::core::router::RouterKind;
use waypost::shell;

#[derive(Parser)]
#[command(name = "waypost", about = "Drive a view router from the command line")]
struct Args {
    /// Host a single test screen in a navigator of this kind instead of the app tree
    #[arg(short, long, value_enum)]
    kind: Option<RouterKind>,

    /// Config file (default: ~/.waypost/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Where the adopted set is stored
    #[arg(long)]
    adopted: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Nothing below logs until the logger is installed; config reports back instead.
    let loaded = config::load_config(args.config.as_deref())?;
    let resolved = config::resolve(
        &loaded.config,
        &CliOverrides {
            kind: args.kind,
            log_level: args.log_level,
            adopted_path: args.adopted,
        },
    );

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    loaded.source.log();
    if let Some(level) = &resolved.rejected_log_level {
        log::warn!("Ignoring unknown log level: {}", level);
    }
    log::debug!("Config: {:?}", loaded.config);

    log::info!(
        "Waypost starting up: {}",
        resolved
            .harness_kind
            .map(|k| format!("{k} test navigator"))
            .unwrap_or_else(|| "app tree".to_string())
    );

    shell::run(resolved).await?;
    Ok(())
}
