use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use arc_swap::ArcSwap;

use crate::config::CompiledConfig;
use crate::hot_reload::{reload_config, watch_config};
use crate::router::{NavigationDescription, NavigationType};
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for velvette
///
/// Validates choreography configurations and tries navigations against them
/// without a browser.
#[derive(Parser)]
#[command(name = "velvette")]
#[command(about = "View transition choreography tools", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration file and print its expanded rules
    Check {
        /// Path to the configuration file (YAML, JSON or TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Keep running and revalidate whenever the file changes
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
    /// Match a navigation against a configuration and print the result as JSON
    Match {
        /// Path to the configuration file (YAML, JSON or TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// URL being navigated away from
        #[arg(long)]
        from: String,

        /// URL being navigated to
        #[arg(long)]
        to: String,

        /// Navigation type: push, replace, reload or traverse
        #[arg(long = "type", default_value = "push")]
        navigation_type: NavigationType,

        /// History delta for traverse navigations
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        delta: i64,
    },
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The configuration cannot be read, parsed or compiled
/// - A URL passed to `match` is not absolute
/// - The watcher for `check --watch` cannot be set up
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    run(&cli, &RuntimeConfig::from_env(), &mut stdout.lock())
}

/// Execute `cli`, writing command output to `out`.
pub fn run(cli: &Cli, runtime: &RuntimeConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check { config, watch } => {
            let compiled = reload_config(config, runtime)?;
            print_rules(out, config, &compiled)?;
            if *watch {
                watch_and_print(config, compiled, runtime, out)?;
            }
            Ok(())
        }
        Commands::Match {
            config,
            from,
            to,
            navigation_type,
            delta,
        } => {
            let compiled = reload_config(config, runtime)?;
            let nav = NavigationDescription::new(from, to, *navigation_type)
                .context("--from and --to must be absolute URLs")?
                .with_delta(*delta);
            let matched = compiled.router.find_matching_nav(&nav);
            serde_json::to_writer_pretty(&mut *out, &matched)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn print_rules(out: &mut impl Write, path: &Path, compiled: &CompiledConfig) -> anyhow::Result<()> {
    writeln!(
        out,
        "{}: {} rules, {} captures, {} styles",
        path.display(),
        compiled.router.rules().len(),
        compiled.captures.len(),
        compiled.styles.len()
    )?;
    for rule in compiled.router.rules() {
        writeln!(out, "  {rule}")?;
    }
    Ok(())
}

/// Block, printing the expanded rules after every successful reload.
fn watch_and_print(
    path: &Path,
    initial: CompiledConfig,
    runtime: &RuntimeConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let target = Arc::new(ArcSwap::from_pointee(initial));
    let _watcher = watch_config(path, Arc::clone(&target), runtime.clone(), move |_| {
        // the receiver only goes away when the command exits
        tx.send(()).ok();
    })
    .with_context(|| format!("failed to watch {}", path.display()))?;

    for () in rx {
        print_rules(out, path, &target.load())?;
        out.flush()?;
    }
    Ok(())
}
