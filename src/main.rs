use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{info, warn};

use lexmatch::batch::process_file;
use lexmatch::dictionary::{load_blacklist, load_entities};
use lexmatch::discovery::{discover_inputs, DiscoveryConfig};
use lexmatch::reader::ReaderConfig;
use lexmatch::stats::{FileStats, RunStats};
use lexmatch::{ConflictPolicy, EntitySearcher, SearchConfig};

#[derive(Parser, Debug)]
#[command(name = "lexmatch")]
#[command(about = "Find dictionary entities (courts, places, ...) in text files")]
#[command(version)]
struct Args {
    /// Text files or directories to search
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON entity dictionary
    #[arg(long)]
    dictionary: PathBuf,

    /// JSON alias blacklist
    #[arg(long)]
    blacklist: Option<PathBuf>,

    /// TOML search configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Restrict aliases to these languages (repeatable)
    #[arg(long = "language")]
    languages: Vec<String>,

    /// Skip aliases shorter than this many characters
    #[arg(long)]
    min_alias_length: Option<usize>,

    /// Policy for entities sharing an alias at one position
    #[arg(long, value_enum)]
    conflicts: Option<ConflictPolicy>,

    /// Reduce words to base forms before matching
    #[arg(long)]
    stem: bool,

    /// Glob pattern for files below directory inputs
    #[arg(long, default_value = "**/*.txt")]
    pattern: String,

    /// Use memory-mapped I/O instead of async buffered reads
    #[arg(long)]
    use_mmap: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bar
    #[arg(long)]
    no_progress: bool,

    /// JSON-lines output file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stats output file path
    #[arg(long, default_value = "lexmatch_stats.json")]
    stats_out: PathBuf,
}

impl Args {
    /// Config file values with command-line overrides applied
    fn search_config(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SearchConfig::default(),
        };
        if !self.languages.is_empty() {
            config.languages = Some(self.languages.clone());
        }
        if self.min_alias_length.is_some() {
            config.min_alias_length = self.min_alias_length;
        }
        if let Some(conflicts) = self.conflicts {
            config.conflicts = conflicts;
        }
        if self.stem {
            config.use_stemmer = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so JSON-lines matches on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let config = args.search_config()?;
    let entities = load_entities(&args.dictionary)
        .with_context(|| format!("Failed to load dictionary {}", args.dictionary.display()))?;
    let blacklist = match &args.blacklist {
        Some(path) => Some(
            load_blacklist(path).with_context(|| format!("Failed to load blacklist {}", path.display()))?,
        ),
        None => None,
    };
    let options = config.to_options(blacklist.as_deref())?;
    let searcher = EntitySearcher::new(options)?;
    info!("Loaded {} entities with {:?}", entities.len(), config);

    let discovery_config = DiscoveryConfig {
        pattern: args.pattern.clone(),
        fail_fast: args.fail_fast,
    };
    let files = discover_inputs(&args.inputs, &discovery_config)?;

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let sink: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };
    let mut writer = BufWriter::new(sink);

    let reader_config = ReaderConfig {
        use_mmap: args.use_mmap,
    };
    let run_start = Instant::now();
    let mut run_stats = RunStats::default();

    for path in &files {
        progress.set_message(path.display().to_string());
        let file_start = Instant::now();

        match process_file(path, &searcher, &entities, &reader_config, &mut writer).await {
            Ok(stats) => run_stats.record(stats),
            Err(e) => {
                warn!("Failed to process {}: {:#}", path.display(), e);
                if args.fail_fast {
                    progress.abandon();
                    writer.flush().await?;
                    return Err(e);
                }
                run_stats.record(FileStats::failed(path, file_start.elapsed(), format!("{e:#}")));
            }
        }
        progress.inc(1);
    }

    writer.flush().await?;
    progress.finish_and_clear();

    run_stats.total_time_ms = run_start.elapsed().as_millis() as u64;
    run_stats.write(&args.stats_out).await?;

    info!(
        "Search complete: {} files, {} failed, {} matches",
        run_stats.files_processed, run_stats.files_failed, run_stats.total_matches
    );
    Ok(())
}
