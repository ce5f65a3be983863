// ABOUTME: Directory mode for the deckmark application
// ABOUTME: Picks the documents to compile from a source directory and writes their pages

use log::{debug, info};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::agenda::{Agenda, AgendaResolver, INDEX_PAGE};
use crate::config::Config;
use crate::deck::Deck;
use crate::errors::{DeckError, Result};
use crate::html;
use crate::utils;

/// Compile one named markdown file into `<output_dir>/<stem>.html`.
/// An empty file is an error.
pub fn build_file(
    markdown_path: &Path,
    output_dir: &Path,
    agenda: Option<&Agenda>,
    config: &Config,
) -> Result<PathBuf> {
    let deck = Deck::from_file(markdown_path, resolver(agenda))?;
    write_deck(&deck, output_dir, agenda.is_some(), config)
}

/// Compile one file of a source directory. Empty files get a placeholder page.
fn build_source(
    markdown_path: &Path,
    output_dir: &Path,
    agenda: Option<&Agenda>,
    config: &Config,
) -> Result<PathBuf> {
    let deck = Deck::load(markdown_path, resolver(agenda))?;
    write_deck(&deck, output_dir, agenda.is_some(), config)
}

fn resolver(agenda: Option<&Agenda>) -> Option<&dyn AgendaResolver> {
    agenda.map(|agenda| agenda as &dyn AgendaResolver)
}

fn write_deck(deck: &Deck, output_dir: &Path, has_agenda: bool, config: &Config) -> Result<PathBuf> {
    let html_content = html::generate_html(deck, config, has_agenda)?;
    let output_path = output_dir.join(deck.page().as_str());
    html::write_html_to_file(&html_content, &output_path)?;
    Ok(output_path)
}

/// Compile a source directory.
///
/// With an agenda file every other markdown file is a chapter and an index
/// page is written too. Without one a single main document is picked.
pub fn build_directory(input_dir: &Path, output_dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    utils::validate_directory_exists(input_dir)?;
    utils::ensure_directory_exists(output_dir)?;

    let agenda_path = input_dir.join(&config.agenda_file_name);
    let markdown_files = markdown_files(input_dir)?;

    match Agenda::load_optional(&agenda_path) {
        Some(agenda) => {
            info!("Chapter mode: agenda found at {:?}", agenda_path);
            let mut outputs = Vec::new();
            for path in markdown_files
                .iter()
                .filter(|path| !is_named(path, &config.agenda_file_name))
            {
                outputs.push(build_source(path, output_dir, Some(&agenda), config)?);
            }
            let index_path = output_dir.join(INDEX_PAGE);
            html::write_html_to_file(&html::generate_index_html(&agenda, config)?, &index_path)?;
            outputs.push(index_path);
            Ok(outputs)
        }
        None => {
            info!("Single page mode: no agenda in {:?}", input_dir);
            let project = project_name(input_dir);
            let main = select_main_document(&markdown_files, &project)?;
            Ok(vec![build_source(&main, output_dir, None, config)?])
        }
    }
}

/// Markdown files directly inside `dir`, sorted by name.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.md",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} markdown files in {:?}", files.len(), dir);
    Ok(files)
}

/// Main document of a single-page project, by priority: `<project>.md`,
/// `README.md`, the only markdown file, the only file starting with a letter or digit.
pub fn select_main_document(files: &[PathBuf], project: &str) -> Result<PathBuf> {
    let project_file = format!("{}.md", project);
    if let Some(path) = files.iter().find(|path| is_named(path, &project_file)) {
        return Ok(path.clone());
    }
    if let Some(path) = files.iter().find(|path| is_named(path, "README.md")) {
        return Ok(path.clone());
    }
    if let [only] = files {
        return Ok(only.clone());
    }

    let normal: Vec<&PathBuf> = files
        .iter()
        .filter(|path| {
            utils::path_file_name(path)
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric)
        })
        .collect();
    match normal.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(DeckError::ValidationError(
            "No markdown document found to compile".to_string(),
        )),
        many => {
            let names: Vec<String> = many.iter().map(|path| utils::path_file_name(path)).collect();
            Err(DeckError::ValidationError(format!(
                "Multiple candidate files found: {}. Rename one to {} or leave only one main file.",
                names.join(", "),
                project_file
            )))
        }
    }
}

fn is_named(path: &Path, name: &str) -> bool {
    utils::path_file_name(path).eq_ignore_ascii_case(name)
}

/// Project name of a source directory. A `markdown` directory takes its parent's name.
fn project_name(input_dir: &Path) -> String {
    let dir = utils::get_absolute_path(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    let named = match dir.file_name() {
        Some(name) if name == OsStr::new("markdown") => dir.parent().and_then(Path::file_name),
        other => other,
    };
    named
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
