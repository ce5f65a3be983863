use std::fs;
use std::path::Path;
use tempfile::TempDir;

use deckmark::{build_directory, build_file, utils, write_html_to_file, Agenda, Config, Deck, DeckError};

const AGENDA: &str = "# Course\n\n\
## [Intro](./01-intro.md)\n\
### [Setup](./01a-setup.md)\n\
## [Advanced](./02-advanced.md)\n";

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write markdown file");
}

fn count_files_with_pattern(dir: &Path, pattern: &str) -> usize {
    let glob_pattern = format!("{}/{}", dir.to_string_lossy(), pattern);
    glob::glob(&glob_pattern)
        .expect("Failed to read glob pattern")
        .filter_map(Result::ok)
        .count()
}

#[test]
fn test_build_directory_with_agenda_writes_chapters_and_index() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("src");
    let output = temp_dir.path().join("out");
    fs::create_dir(&input).expect("Failed to create input dir");

    write(&input, "AGENDA.md", AGENDA);
    write(&input, "01-intro.md", "# Intro\n\n---\n\n## Why\ntext\n");
    write(&input, "01a-setup.md", "# Setup\n\n---\n\n## Install\n- cargo\n");
    write(&input, "02-advanced.md", "# Advanced\n");

    let outputs = build_directory(&input, &output, &Config::default()).expect("Build failed");

    assert_eq!(outputs.len(), 4);
    assert_eq!(count_files_with_pattern(&output, "*.html"), 4);
    assert!(!output.join("AGENDA.html").exists());

    let intro = fs::read_to_string(output.join("01-intro.html")).expect("Missing intro page");
    assert!(intro.contains(r#"data-parent-page="index.html""#));
    assert!(intro.contains(r#"data-next-page="01a-setup.html""#));
    assert!(intro.contains("Sub-chapters"));
    assert!(intro.contains("01a-setup.html"));

    let setup = fs::read_to_string(output.join("01a-setup.html")).expect("Missing setup page");
    assert!(setup.contains(r#"data-parent-page="01-intro.html""#));
    assert!(setup.contains(r#"data-next-page="02-advanced.html""#));
    assert!(setup.contains(r#"<li class="bullet-dash">cargo</li>"#));

    let last = fs::read_to_string(output.join("02-advanced.html")).expect("Missing last page");
    assert!(!last.contains("data-next-page"));

    let index = fs::read_to_string(output.join("index.html")).expect("Missing index page");
    assert!(index.contains("<title>Course</title>"));
    assert!(index.contains(r#"data-next-page="01-intro.html""#));
}

#[test]
fn test_build_directory_writes_placeholder_for_empty_chapter() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("src");
    let output = temp_dir.path().join("out");
    fs::create_dir(&input).expect("Failed to create input dir");

    write(
        &input,
        "AGENDA.md",
        "# Course

## [A](./01-a.md)
## [B](./02-b.md)
",
    );
    write(&input, "01-a.md", "  

");
    write(&input, "02-b.md", "# B

---

## Slide
");

    let outputs = build_directory(&input, &output, &Config::default()).expect("Build failed");

    assert_eq!(outputs.len(), 3);
    assert!(output.join("02-b.html").exists());
    assert!(output.join("index.html").exists());

    let empty = fs::read_to_string(output.join("01-a.html")).expect("Missing empty chapter page");
    assert!(empty.contains("<title>Slide</title>"));
    assert!(empty.contains(r#"data-next-page="02-b.html""#));
    assert_eq!(empty.matches("<section").count(), 1);
}

#[test]
fn test_build_directory_without_agenda_picks_readme() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path();
    let output = input.join("out");

    write(input, "README.md", "# Readme Deck\n\n---\n\n## Slide\n");
    write(input, "notes.md", "# Notes\n");
    write(input, "_draft.md", "# Draft\n");

    let outputs = build_directory(input, &output, &Config::default()).expect("Build failed");

    assert_eq!(outputs, vec![output.join("README.html")]);
    let html = fs::read_to_string(&outputs[0]).expect("Failed to read output");
    assert!(html.contains("<title>Readme Deck</title>"));
    assert!(!html.contains("data-next-page"));
}

#[test]
fn test_build_directory_ignores_underscore_files_when_choosing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path();
    let output = input.join("out");

    write(input, "talk.md", "# Talk\n");
    write(input, "_scratch.md", "# Scratch\n");

    let outputs = build_directory(input, &output, &Config::default()).expect("Build failed");
    assert_eq!(outputs, vec![output.join("talk.html")]);
}

#[test]
fn test_build_directory_with_several_candidates_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path();

    write(input, "one.md", "# One\n");
    write(input, "two.md", "# Two\n");

    let result = build_directory(input, &input.join("out"), &Config::default());
    match result {
        Err(DeckError::ValidationError(message)) => {
            assert!(message.contains("one.md"));
            assert!(message.contains("two.md"));
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_build_file_reports_empty_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = temp_dir.path().join("empty.md");
    fs::write(&markdown_path, "\n  \n").expect("Failed to write markdown file");

    let result = build_file(&markdown_path, temp_dir.path(), None, &Config::default());
    assert!(matches!(result, Err(DeckError::EmptyInputError(_))));
}

#[test]
fn test_build_file_reports_missing_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = temp_dir.path().join("missing.md");

    let result = build_file(&markdown_path, temp_dir.path(), None, &Config::default());
    assert!(matches!(result, Err(DeckError::PathNotFoundError(_))));
}

#[test]
fn test_deck_from_file_with_agenda() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let agenda_path = temp_dir.path().join("AGENDA.md");
    let markdown_path = temp_dir.path().join("01-intro.md");
    fs::write(&agenda_path, AGENDA).expect("Failed to write agenda");
    fs::write(&markdown_path, "---\ntitle: Welcome\n---\n# Intro\n").expect("Failed to write markdown");

    let agenda = Agenda::load(&agenda_path).expect("Failed to load agenda");
    let deck = Deck::from_file(&markdown_path, Some(&agenda)).expect("Failed to parse deck");

    assert_eq!(deck.title(), "Welcome");
    assert_eq!(deck.slides.len(), 2);
    assert_eq!(deck.outline.title, "Welcome");
    assert_eq!(deck.outline.branches.len(), 2);
    assert_eq!(deck.page().as_str(), "01-intro.html");
}

#[test]
fn test_write_failure_is_reported_as_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // The target is an existing directory, so the write itself fails.
    let result = write_html_to_file("<p>x</p>", temp_dir.path());
    match result {
        Err(err @ DeckError::IoError(_)) => assert!(err.to_string().starts_with("I/O error")),
        other => panic!("Expected an I/O error, got {:?}", other),
    }
}

#[test]
fn test_path_validation_messages() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = temp_dir.path().join("talk.md");
    fs::write(&file, "# Talk\n").expect("Failed to write markdown file");

    match utils::validate_file_exists(temp_dir.path()) {
        Err(DeckError::ValidationError(message)) => {
            assert!(message.ends_with("is not a markdown file"))
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
    match utils::validate_directory_exists(&file) {
        Err(DeckError::ValidationError(message)) => {
            assert!(message.ends_with("is not a source directory"))
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
    assert!(matches!(
        utils::validate_file_exists(&temp_dir.path().join("missing.md")),
        Err(DeckError::PathNotFoundError(_))
    ));
    assert!(matches!(
        utils::ensure_directory_exists(&file),
        Err(DeckError::ValidationError(_))
    ));

    let nested = temp_dir.path().join("out/pages");
    utils::ensure_directory_exists(&nested).expect("Failed to create output dir");
    assert!(nested.is_dir());
}
