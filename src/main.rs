use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use intro_scorer::config::Config;
use intro_scorer::features::FeatureExtractor;
use intro_scorer::output::SourcedResult;
use intro_scorer::rubric::RubricEntry;
use intro_scorer::{ScoreResult, Scorer, TextAnalyzer};

const EXIT_SUCCESS: i32 = 0;
const EXIT_OUTPUT: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum OutputFormat {
    /// Aligned, colored breakdown
    #[default]
    Table,
    /// Tab-separated rows for scripting
    Tsv,
    /// Full score result as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more transcripts (default if no subcommand)
    Score {
        /// Transcript files; reads stdin when empty or "-"
        files: Vec<PathBuf>,

        /// Rubric file (YAML, or JSON with a .json extension)
        #[arg(long)]
        rubric: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print the semantic similarity of two transcripts
    Compare { a: PathBuf, b: PathBuf },
    /// Validate the config and print it with defaults filled in
    CheckConfig,
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "intro-scorer")]
#[command(about = "Score self-introduction transcripts against a communication rubric", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/intro-scorer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    if let Err(e) = intro_scorer::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let command = cli.command.unwrap_or(Commands::Score {
        files: Vec::new(),
        rubric: None,
        format: OutputFormat::Table,
    });

    if let Commands::Init { force } = command {
        match intro_scorer::config::write_default_config(cli.config, force) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = load_validated_config(cli.config);

    let code = match command {
        Commands::Score {
            files,
            rubric,
            format,
        } => run_score(&config, &files, rubric.as_deref(), format),
        Commands::Compare { a, b } => run_compare(&config, &a, &b),
        Commands::CheckConfig => run_check_config(&config),
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

/// Load and validate the config, exiting with EXIT_CONFIG on any problem.
fn load_validated_config(path: Option<PathBuf>) -> Config {
    let config = match intro_scorer::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = intro_scorer::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    config
}

fn build_analyzer(config: &Config) -> TextAnalyzer {
    match intro_scorer::config::build_analyzer(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn read_transcript(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

fn load_rubric(path: Option<&Path>) -> Result<Option<Vec<RubricEntry>>, i32> {
    let Some(path) = path else {
        return Ok(None);
    };

    let rubric = intro_scorer::rubric::load_rubric(path).map_err(|e| {
        eprintln!("Rubric error: {:#}", e);
        EXIT_INPUT
    })?;

    for mismatch in intro_scorer::rubric::rubric_weight_mismatches(&rubric) {
        tracing::warn!(
            criteria = %mismatch.criteria,
            rubric_weight = mismatch.rubric_weight,
            rule_weight = mismatch.rule_weight(),
            "rubric weight is ignored; the built-in rule weight applies"
        );
    }

    Ok(Some(rubric))
}

fn run_score(
    config: &Config,
    files: &[PathBuf],
    rubric_path: Option<&Path>,
    format: OutputFormat,
) -> i32 {
    let rubric = match load_rubric(rubric_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let scorer = Scorer::new(config.effective_scoring(), build_analyzer(config));

    let stdin = [PathBuf::from("-")];
    let sources = if files.is_empty() { &stdin[..] } else { files };

    let mut scored: Vec<(String, ScoreResult)> = Vec::with_capacity(sources.len());
    for path in sources {
        let name = if path.as_os_str() == "-" {
            "<stdin>".to_string()
        } else {
            path.display().to_string()
        };

        let transcript = match read_transcript(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Failed to read transcript {}: {}", name, e);
                return EXIT_INPUT;
            }
        };
        if transcript.trim().is_empty() {
            tracing::warn!(source = %name, "transcript is empty");
        }

        let start = Instant::now();
        let result = scorer.score(&transcript, rubric.as_deref());
        tracing::debug!(
            source = %name,
            overall = result.overall_score,
            elapsed = ?start.elapsed(),
            "scored transcript"
        );
        scored.push((name, result));
    }

    match print_results(&scored, format) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            EXIT_OUTPUT
        }
    }
}

fn print_results(scored: &[(String, ScoreResult)], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let use_colors = intro_scorer::output::should_use_colors();
            for (i, (name, result)) in scored.iter().enumerate() {
                if scored.len() > 1 {
                    if i > 0 {
                        println!();
                    }
                    println!("== {}", name);
                }
                println!("{}", intro_scorer::output::format_report(result, use_colors));
            }
        }
        OutputFormat::Tsv => {
            for (name, result) in scored {
                if scored.len() > 1 {
                    println!("# {}", name);
                }
                println!("{}", intro_scorer::output::format_tsv(result));
            }
        }
        OutputFormat::Json => match scored {
            [(_, result)] => println!("{}", intro_scorer::output::format_json(result)?),
            _ => {
                let batch: Vec<SourcedResult> = scored
                    .iter()
                    .map(|(name, result)| SourcedResult {
                        source: name,
                        result,
                    })
                    .collect();
                println!("{}", intro_scorer::output::format_json_batch(&batch)?);
            }
        },
    }
    Ok(())
}

fn run_compare(config: &Config, a: &Path, b: &Path) -> i32 {
    let (text_a, text_b) = match (read_transcript(a), read_transcript(b)) {
        (Ok(x), Ok(y)) => (x, y),
        (Err(e), _) => {
            eprintln!("Failed to read transcript {}: {}", a.display(), e);
            return EXIT_INPUT;
        }
        (_, Err(e)) => {
            eprintln!("Failed to read transcript {}: {}", b.display(), e);
            return EXIT_INPUT;
        }
    };

    let analyzer = build_analyzer(config);
    println!("{:.3}", analyzer.semantic_similarity(&text_a, &text_b));
    EXIT_SUCCESS
}

fn run_check_config(config: &Config) -> i32 {
    match serde_saphyr::to_string(&config.resolved()) {
        Ok(yaml) => {
            println!("Config OK");
            print!("{}", yaml);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
            EXIT_OUTPUT
        }
    }
}
