use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use textalign_cli::args::AlignArgs;
use textalign_cli::init_tracing;
use textalign_core::config::{expand_path, Config};
use textalign_core::corpus::normalize_whitespace;
use textalign_core::types::ReferenceText;
use textalign_engine::{AlignmentEngine, EngineOptions, SequencingState};

/// Find the best match for one query inside one reference file.
#[derive(Parser, Debug)]
#[command(name = "textalign-query", version)]
struct Cli {
    /// Reference text file
    #[arg(short, long)]
    reference: String,

    /// Text to locate
    query: String,

    #[command(flatten)]
    align: AlignArgs,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.align()?;
    cli.align.apply(&mut settings);
    let options = EngineOptions::from_settings(&settings)?;

    let path: PathBuf = expand_path(&cli.reference);
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let key = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let reference = ReferenceText::new(key, normalize_whitespace(&raw));

    let engine = AlignmentEngine::new(options);
    let result = engine.align(&normalize_whitespace(&cli.query), &reference, &mut SequencingState::new())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("score={:.4}  units=[{}, {})  fallback={}", result.score, result.match_start, result.match_end, result.fallback);
        println!("{}", result.matched_text);
    }
    Ok(())
}
