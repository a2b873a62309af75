use anyhow::Result;
use clap::{Parser, Subcommand};
use termlink_core::persist::{save_meta, save_tables, MetaFile, TablePaths};
use termlink_core::{BackendParams, CorpusIndexer};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build backend tables from entity repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the backend tables from repository text files or directories
    Build {
        /// Input path (file or directory); repeatable
        #[arg(long, required = true)]
        input: Vec<String>,
        /// Output table directory
        #[arg(long)]
        output: String,
        /// Max consecutive tokens per multitoken
        #[arg(long, default_value_t = 4)]
        max_multitoken: usize,
        /// Max position delta for pair linking
        #[arg(long, default_value_t = 3)]
        max_dist: usize,
        /// Arity cap for pair-table multitokens
        #[arg(long, default_value_t = 3)]
        max_terms: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            max_multitoken,
            max_dist,
            max_terms,
        } => {
            let params = BackendParams {
                max_multitoken,
                max_dist,
                max_terms,
                ..BackendParams::default()
            };
            build_tables(&input, &output, params)
        }
    }
}

fn build_tables(inputs: &[String], output: &str, params: BackendParams) -> Result<()> {
    let mut files: Vec<PathBuf> = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
                    files.push(p.to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            tracing::warn!(input = input.as_str(), "input path not found, skipping");
        }
    }
    files.sort();

    let mut indexer = CorpusIndexer::new(params);
    for file in &files {
        let f = File::open(file)?;
        let reader = BufReader::new(f);
        for line in reader.lines() {
            let line = line?;
            indexer.ingest_line(&line);
        }
        tracing::info!(file = %file.display(), "ingested repository file");
    }

    let entity_count = indexer.entities_indexed() as u32;
    let skipped = indexer.lines_skipped();
    let tables = indexer.finish();
    tracing::info!(entity_count, skipped, "corpus processed");

    let paths = TablePaths::new(output);
    save_tables(&paths, &tables)?;
    let meta = MetaFile {
        entity_count,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&paths, &meta)?;

    tracing::info!(output, "table build complete");
    Ok(())
}
