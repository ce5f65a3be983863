// ABOUTME: Main entry point for the deckmark program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use deckmark::{Agenda, AgendaResolver, Config, Deck, WatchConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a markdown file or source directory into slide pages
    Build(BuildArgs),

    /// Print the outline of a markdown file as JSON
    Outline(OutlineArgs),

    /// Rebuild pages whenever the markdown sources change
    Watch(WatchArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Markdown file or directory of markdown files
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving the generated pages
    #[arg(short, long)]
    output: PathBuf,

    /// Agenda document for a single input file
    #[arg(long)]
    agenda: Option<PathBuf>,
}

#[derive(Args)]
struct OutlineArgs {
    /// Path to the markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Agenda document listing sub-chapters
    #[arg(long)]
    agenda: Option<PathBuf>,

    /// Emit the mind-map node shape instead of the outline tree
    #[arg(long)]
    markmap: bool,
}

#[derive(Args)]
struct WatchArgs {
    /// Markdown file or directory of markdown files
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving the generated pages
    #[arg(short, long)]
    output: PathBuf,

    /// Agenda document for a single input file
    #[arg(long)]
    agenda: Option<PathBuf>,

    /// Debounce time in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

fn load_agenda(path: Option<&Path>) -> deckmark::Result<Option<Agenda>> {
    path.map(Agenda::load).transpose()
}

fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Build(args)) => {
            println!("Executing build command...");
            let outputs = if args.input.is_dir() {
                deckmark::build_directory(&args.input, &args.output, config)?
            } else {
                let agenda = load_agenda(args.agenda.as_deref())?;
                vec![deckmark::build_file(
                    &args.input,
                    &args.output,
                    agenda.as_ref(),
                    config,
                )?]
            };
            for output in &outputs {
                println!("Generated: {:?}", output);
            }
            Ok(())
        }
        Some(Commands::Outline(args)) => {
            let agenda = load_agenda(args.agenda.as_deref())?;
            let resolver = agenda.as_ref().map(|agenda| agenda as &dyn AgendaResolver);
            let deck = Deck::from_file(&args.input, resolver)?;
            let json = if args.markmap {
                serde_json::to_string_pretty(&deck.outline.to_mind_map())?
            } else {
                serde_json::to_string_pretty(&deck.outline)?
            };
            println!("{}", json);
            Ok(())
        }
        Some(Commands::Watch(args)) => {
            println!("Executing watch command...");
            let watch_config = WatchConfig {
                input: args.input,
                output_dir: args.output,
                agenda_path: args.agenda,
                debounce_ms: args.debounce_ms.unwrap_or(config.debounce_ms),
            };
            deckmark::watch_markdown(watch_config, config)?;
            Ok(())
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = config
        .validate()
        .map_err(anyhow::Error::from)
        .and_then(|_| run(cli, &config));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
