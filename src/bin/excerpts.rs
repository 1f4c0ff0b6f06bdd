//! excerpts CLI: turn Markdown notes and Google Docs exports into tagged excerpt trees.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use excerpts::config::Config;
use excerpts::formats::format_by_name;
use excerpts::parser::parsers::gdocs::document_id_from_url;
use excerpts::parser::{ImportBatch, ImportManager, ParserRegistry};
use excerpts::{ExcerptsError, ExcerptsResult, ParseError};

#[derive(Parser)]
#[command(name = "excerpts", version, about = "Hierarchical excerpt parser")]
struct Cli {
    /// Config file (defaults to ./excerpts.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files into one excerpt batch and print it.
    Parse {
        /// Markdown (.md, .txt) or Google Docs JSON (.json) files.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,

        /// Output format: json or cbor.
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// List the tags found in files, with how many excerpts carry each.
    Tags {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Print the document id of a Google Docs URL.
    DocId { url: String },
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Tag added to every excerpt (repeatable).
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Regex whose matches in each file name become tags.
    #[arg(long)]
    filename_pattern: Option<String>,

    /// Splits each filename match into several tags.
    #[arg(long)]
    separator: Option<String>,
}

fn main() -> ExcerptsResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };

    match cli.command {
        Commands::Parse {
            files,
            import,
            format,
        } => {
            let format = format_by_name(&format)?;
            let batch = import_files(&config, &import, &files)?;
            let bytes = format.encode(&batch.excerpts)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).map_err(write_error)?;
            if format.name() == "json" {
                writeln!(stdout).map_err(write_error)?;
            }
        }

        Commands::Tags { files, import } => {
            let batch = import_files(&config, &import, &files)?;
            let index = batch.tag_index();
            for tag in index.tags() {
                println!("{:>5}  {tag}", index.count(tag));
            }
        }

        Commands::DocId { url } => match document_id_from_url(&url) {
            Some(id) => println!("{id}"),
            None => {
                return Err(ExcerptsError::other(format!("no document id in URL: {url}")));
            }
        },
    }

    Ok(())
}

fn import_files(
    config: &Config,
    args: &ImportArgs,
    files: &[PathBuf],
) -> ExcerptsResult<ImportBatch> {
    let mut import = config.import.clone();
    import.default_tags.extend(args.tags.iter().cloned());
    if args.filename_pattern.is_some() {
        import.filename_tag_pattern.clone_from(&args.filename_pattern);
    }
    if args.separator.is_some() {
        import.filename_tag_separator.clone_from(&args.separator);
    }

    let registry = ParserRegistry::with_defaults(&config.parser);
    let mut manager = ImportManager::new(registry, import)?;

    for path in files {
        let bytes =
            std::fs::read(path).map_err(|e| ParseError::io(path.display().to_string(), &e))?;
        manager.import_file(&file_name(path), &bytes)?;
    }

    Ok(manager.finish())
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn write_error(err: std::io::Error) -> ExcerptsError {
    ExcerptsError::other(format!("failed to write output: {err}"))
}
