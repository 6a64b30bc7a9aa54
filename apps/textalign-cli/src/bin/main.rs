use std::{env, fs};

use anyhow::bail;
use clap::Parser;

use textalign_cli::args::{AlignArgs, DataArgs};
use textalign_cli::init_tracing;
use textalign_cli::pipeline::{output_file_name, run_transcript_file};
use textalign_core::config::{resolve_with_base, Config};
use textalign_core::corpus::{language_folder, list_transcript_files, BookDirectory};
use textalign_engine::{AlignmentEngine, EngineOptions};

/// Align transcript fragments against the text of their source books.
#[derive(Parser, Debug)]
#[command(name = "textalign", version)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    align: AlignArgs,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;

    let mut align = config.align()?;
    cli.align.apply(&mut align);
    let mut data = config.data()?;
    cli.data.apply(&mut data);
    let options = EngineOptions::from_settings(&align)?;

    let base = env::current_dir()?;
    let transcripts_dir = resolve_with_base(&base, &data.transcripts_dir);
    let books_dir = resolve_with_base(&base, &data.books_dir);
    let output_dir = resolve_with_base(&base, &data.output_dir);
    let language_dir = language_folder(&data.language)?;
    let books = BookDirectory::new(&books_dir, &data.language)?;
    fs::create_dir_all(&output_dir)?;

    let files = list_transcript_files(&transcripts_dir);
    if files.is_empty() {
        bail!("no transcript files found under {}", transcripts_dir.display());
    }

    println!("textalign\n=========");
    println!("Transcripts: {} ({} files)", transcripts_dir.display(), files.len());
    println!("Books: {}", books_dir.join(language_dir).display());
    println!(
        "Metric: {}  granularity: {}  workers: {}  sequenced: {}",
        options.metric, options.granularity, options.workers, options.sequenced
    );

    let engine = AlignmentEngine::new(options);
    for transcript in &files {
        let output = output_dir.join(output_file_name(language_dir, &transcripts_dir, transcript));
        let summary = run_transcript_file(&engine, &books, transcript, &output, !cli.quiet)?;
        println!(
            "{} -> {}: {} rows ({} aligned, {} skipped), mean similarity {:.4}",
            summary.transcript.display(),
            summary.output.display(),
            summary.rows,
            summary.aligned,
            summary.skipped,
            summary.mean_similarity
        );
    }
    Ok(())
}
