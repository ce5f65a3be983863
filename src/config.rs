// ABOUTME: Configuration module for the deckmark application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::{DeckError, Result};
use std::env;

const DEFAULT_AGENDA_FILE: &str = "AGENDA.md";
const DEFAULT_OUTLINE_DEPTH: usize = 3;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Global configuration for the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File name of the agenda document looked up next to the sources
    pub agenda_file_name: String,
    /// Initial expand level of the outline view
    pub outline_depth: usize,
    /// Expand level used instead when an agenda is in play
    pub chapter_outline_depth: Option<usize>,
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agenda_file_name: DEFAULT_AGENDA_FILE.to_string(),
            outline_depth: DEFAULT_OUTLINE_DEPTH,
            chapter_outline_depth: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let agenda_file_name = env::var("DECK_AGENDA_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AGENDA_FILE.to_string());
        let outline_depth = env::var("DECK_OUTLINE_DEPTH")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_OUTLINE_DEPTH);
        let chapter_outline_depth = env::var("DECK_CHAPTER_OUTLINE_DEPTH")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok());
        let debounce_ms = env::var("DECK_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        Self {
            agenda_file_name,
            outline_depth,
            chapter_outline_depth,
            debounce_ms,
        }
    }

    /// Check settings that cannot be defaulted silently
    pub fn validate(&self) -> Result<()> {
        if self.agenda_file_name.contains(['/', '\\']) {
            return Err(DeckError::ConfigError(format!(
                "Agenda file name must not contain a path separator: {}",
                self.agenda_file_name
            )));
        }
        Ok(())
    }

    /// Outline expand level for a document, preferring the chapter depth
    /// when an agenda is in use
    pub fn outline_depth_for(&self, has_agenda: bool) -> usize {
        let depth = if has_agenda {
            self.chapter_outline_depth.unwrap_or(self.outline_depth)
        } else {
            self.outline_depth
        };
        depth.max(1)
    }
}
