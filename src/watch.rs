// ABOUTME: Watch module for monitoring markdown changes and regenerating pages
// ABOUTME: Provides debounced file watching and auto-regeneration of deck HTML

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;

use crate::agenda::Agenda;
use crate::config::Config as AppConfig;
use crate::errors::{DeckError, Result};
use crate::site;
use crate::utils;

/// Configuration for watch mode
pub struct WatchConfig {
    /// Markdown file or source directory to watch
    pub input: PathBuf,

    /// Directory receiving the generated pages
    pub output_dir: PathBuf,

    /// Agenda document for a single watched file
    pub agenda_path: Option<PathBuf>,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::new(),
            agenda_path: None,
            debounce_ms: 500,
        }
    }
}

/// Starts watching the sources and regenerates pages when they change
pub fn watch_markdown(config: WatchConfig, app_config: &AppConfig) -> Result<()> {
    if !config.input.exists() {
        return Err(DeckError::PathNotFoundError(config.input.clone()));
    }
    utils::ensure_directory_exists(&config.output_dir)?;

    // Initial generation
    regenerate_outputs(&config, app_config)?;

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| DeckError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let watch_path = if config.input.is_dir() {
        config.input.as_path()
    } else {
        match config.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };
    let abs_watch_path = utils::get_absolute_path(watch_path)?;
    debug!("Watching absolute path: {:?}", abs_watch_path);

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::NonRecursive)
        .map_err(|e| {
            DeckError::WatchError(format!(
                "Failed to start watching directory {:?}: {}",
                abs_watch_path, e
            ))
        })?;

    info!("Watching for changes in {:?}", watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    let mut last_processed = Instant::now();
    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events
                    .iter()
                    .flat_map(|event| event.paths.iter())
                    .any(|path| is_relevant_path(path, &config));

                let now = Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed) > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_outputs(&config, app_config) {
                        Ok(outputs) => {
                            info!("Regenerated {} page(s)", outputs.len());
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate outputs: {}", e),
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// Only markdown sources trigger a rebuild
pub fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    if path.starts_with(&config.output_dir) {
        return false;
    }
    match path.extension() {
        Some(ext) => ext.to_string_lossy().eq_ignore_ascii_case("md"),
        None => false,
    }
}

/// Regenerate all pages from the current sources
pub(crate) fn regenerate_outputs(config: &WatchConfig, app_config: &AppConfig) -> Result<Vec<PathBuf>> {
    info!("Regenerating outputs...");

    if config.input.is_dir() {
        return site::build_directory(&config.input, &config.output_dir, app_config);
    }

    let agenda = config.agenda_path.as_deref().map(Agenda::load).transpose()?;
    let output = site::build_file(&config.input, &config.output_dir, agenda.as_ref(), app_config)?;
    Ok(vec![output])
}
