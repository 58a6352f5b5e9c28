use std::env;
use velvette::cli::run_cli;
use velvette::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let mut log_config = LogConfig::from_env();
    // command output goes to stdout; keep stderr quiet unless asked
    if env::var_os("VELVETTE_LOG_LEVEL").is_none() {
        log_config.log_level = "warn".to_string();
    }
    let _guard = init_logging(&log_config)?;
    run_cli()
}
