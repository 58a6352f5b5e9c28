//! # Hot Reload Module
//!
//! Live reloading of the choreography configuration. Editing the route table
//! or the capture list while the application runs takes effect on the next
//! navigation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use velvette::hot_reload::watch_config;
//! use velvette::runtime_config::RuntimeConfig;
//!
//! let choreographer = Choreographer::new(&load_config("transitions.yaml")?, document, host)?;
//!
//! // Keep the watcher alive for as long as reloads are wanted
//! let _watcher = watch_config(
//!     "transitions.yaml",
//!     choreographer.config_handle(),
//!     RuntimeConfig::from_env(),
//!     |compiled| println!("Reloaded {} rules", compiled.router.rules().len()),
//! )?;
//! ```
//!
//! ## Reload Process
//!
//! 1. **Detection** - the filesystem watcher reports a modify or create event
//! 2. **Parse** - the file is read with [`load_config`]
//! 3. **Compile** - patterns and rule references are checked
//! 4. **Swap** - the compiled configuration replaces the old one in the
//!    shared [`ArcSwap`]
//! 5. **Hook** - the caller's callback runs with the new configuration
//!
//! Transitions already in flight hold their own `Arc` of the captures and
//! styles they started with and are unaffected by the swap.
//!
//! ## Error Handling
//!
//! A file that fails to parse or compile is logged and ignored; the previous
//! configuration stays active. Saving a half-edited file never takes the
//! choreography down.

use anyhow::Context;
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{load_config, CompiledConfig};
use crate::runtime_config::RuntimeConfig;

/// Load and compile the configuration at `path`.
///
/// # Errors
///
/// Read, parse and compile failures, with the path as context.
pub fn reload_config(path: &Path, runtime: &RuntimeConfig) -> anyhow::Result<CompiledConfig> {
    let config = load_config(path)?;
    CompiledConfig::compile_with_runtime(&config, runtime)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Watch a configuration file and swap a freshly compiled configuration
/// into `target` whenever it changes.
///
/// `on_reload` runs after each successful swap.
pub fn watch_config<P, F>(
    config_path: P,
    target: Arc<ArcSwap<CompiledConfig>>,
    runtime: RuntimeConfig,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&CompiledConfig) + Send + 'static,
{
    let path: PathBuf = config_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match reload_config(&watch_path, &runtime) {
                    Ok(compiled) => {
                        info!(
                            path = %watch_path.display(),
                            rules_count = compiled.router.rules().len(),
                            captures_count = compiled.captures.len(),
                            "hot-reload: applying configuration"
                        );
                        let compiled = Arc::new(compiled);
                        target.store(Arc::clone(&compiled));
                        on_reload(&compiled);
                    }
                    Err(e) => {
                        warn!(
                            path = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous configuration"
                        );
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "hot-reload: watching configuration");
    Ok(watcher)
}
