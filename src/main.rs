//! storybook - export generated stories to HTML or EPUB

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use storybook::export::{EpubConfig, EpubExporter, ExportFormat, Exporter, HtmlExporter};
use storybook::{StoryDocument, suggested_filename};

#[derive(Parser)]
#[command(name = "storybook")]
#[command(version, about = "Export generated stories to HTML or EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    storybook story.json story.epub     Export an EPUB
    storybook story.json -f html        Export HTML named after the story title
    storybook -i story.json             Show story metadata")]
struct Cli {
    /// Story JSON produced by the generator
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (defaults to the story title in the current directory)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format (defaults to the OUTPUT extension, else epub)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Deflate level for EPUB entries (0-9)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
    compression_level: Option<u32>,

    /// Fixed package identifier instead of a random one
    #[arg(long)]
    identifier: Option<String>,

    /// Show story metadata without exporting
    #[arg(short, long)]
    info: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Epub,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => ExportFormat::Html,
            Format::Epub => ExportFormat::Epub,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        export(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "storybook=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> storybook::Result<StoryDocument> {
    let file = File::open(path)?;
    StoryDocument::from_reader(BufReader::new(file))
}

fn show_info(path: &Path) -> storybook::Result<()> {
    let story = load(path)?;

    println!("File: {}", path.display());
    println!("Title: {}", story.title);
    if !story.style.is_empty() {
        println!("Style: {}", story.style);
    }
    if !story.tone.is_empty() {
        println!("Tone: {}", story.tone);
    }
    if !story.audience.is_empty() {
        println!("Audience: {}", story.audience);
    }
    println!("Language: {}", story.language());
    if let Some(moral) = story.moral() {
        println!("Moral: {moral}");
    }
    println!("Chapters: {}", story.chapters.len());
    println!("Images: {}", story.images().count());

    Ok(())
}

fn export(cli: &Cli) -> storybook::Result<()> {
    let story = load(&cli.input)?;

    let format = cli
        .format
        .map(ExportFormat::from)
        .or_else(|| cli.output.as_deref().and_then(ExportFormat::from_path))
        .unwrap_or(ExportFormat::Epub);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(suggested_filename(&story.title, format)));

    // Render fully before touching the output path.
    let bytes = match format {
        ExportFormat::Html => HtmlExporter::new().render(&story)?,
        ExportFormat::Epub => EpubExporter::new()
            .with_config(EpubConfig {
                compression_level: cli.compression_level,
                identifier: cli.identifier.clone(),
                ..Default::default()
            })
            .render(&story)?,
    };
    std::fs::write(&output, &bytes)?;

    if !cli.quiet {
        println!(
            "Wrote {} ({}, {} bytes)",
            output.display(),
            format.mime_type(),
            bytes.len()
        );
    }
    Ok(())
}
