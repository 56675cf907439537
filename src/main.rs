use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use prompt_coach::{GeneratorConfig, MarkovModel, VibePromptRecord};

#[derive(Parser)]
#[command(
    name = "prompt-coach",
    about = "Review prompt quality and draft new prompts from a corpus",
    version
)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze prompts and print a JSON report for each
    Analyze {
        /// File paths to analyze (reads stdin if none provided)
        files: Vec<PathBuf>,

        /// Analyze this text instead of files or stdin
        #[arg(long, conflicts_with = "files")]
        text: Option<String>,
    },
    /// Generate prompts from a CSV corpus
    Generate {
        /// CSV file holding the corpus
        #[arg(long, env = "PROMPT_COACH_CORPUS")]
        corpus: PathBuf,

        /// Header of the column to learn from
        #[arg(long, default_value = "prompt")]
        column: String,

        /// Words of context per transition
        #[arg(long, default_value_t = GeneratorConfig::default().order)]
        order: usize,

        /// Upper bound on words per generated prompt
        #[arg(long, default_value_t = GeneratorConfig::default().max_words)]
        max_words: usize,

        /// Number of prompts to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print each prompt as a JSON vibe prompt draft
        #[arg(long)]
        draft: bool,
    },
    /// List the rules the analyzer applies
    Rules,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(text: &str) -> Result<()> {
    let report = prompt_coach::report(text);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn analyze(files: &[PathBuf], text: Option<&str>) -> Result<()> {
    if let Some(text) = text {
        return print_report(text);
    }

    if files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return print_report(&input);
    }

    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        print_report(&text)?;
    }
    Ok(())
}

fn generate(
    corpus: &Path,
    column: &str,
    config: GeneratorConfig,
    count: usize,
    draft: bool,
) -> Result<()> {
    let lines = prompt_coach::load_corpus(corpus, column)
        .with_context(|| format!("failed to load corpus from {}", corpus.display()))?;
    let model = MarkovModel::build(&lines, config.order);
    if model.is_empty() {
        anyhow::bail!(
            "corpus {} has no line longer than {} words",
            corpus.display(),
            config.order
        );
    }
    info!(entries = lines.len(), keys = model.key_count(), "model ready");

    for _ in 0..count {
        let text = model.generate(config.max_words);
        if draft {
            let record = VibePromptRecord::generated(text);
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            println!("{text}");
        }
    }
    Ok(())
}

fn list_rules() {
    for (i, rule) in prompt_coach::rules().iter().enumerate() {
        println!("{:>2}. [{}] {}", i + 1, rule.category(), rule.description());
        if let Some(suggestion) = rule.suggestion() {
            println!("    {suggestion}");
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze { files, text } => analyze(&files, text.as_deref()),
        Command::Generate {
            corpus,
            column,
            order,
            max_words,
            count,
            draft,
        } => generate(
            &corpus,
            &column,
            GeneratorConfig { order, max_words },
            count,
            draft,
        ),
        Command::Rules => {
            list_rules();
            Ok(())
        }
    }
}
