use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use firm_linkage::app::ports::Translator;
use firm_linkage::app::LinkageUseCase;
use firm_linkage::config::Config;
use firm_linkage::domain::Dataset;
use firm_linkage::infra::csv_table_source::read_table;
use firm_linkage::infra::{CsvMatchSink, CsvTableSource, GoogleTranslateClient};
use firm_linkage::logging;
use firm_linkage::pipeline::processing::normalize::preprocess_name;
use firm_linkage::pipeline::processing::word_frequency::most_common_words;

#[derive(Parser)]
#[command(name = "firm_linkage")]
#[command(about = "Link Orbis and Kununu company records by normalized name")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DatasetArg {
    Orbis,
    Kununu,
}

impl From<DatasetArg> for Dataset {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Orbis => Dataset::Orbis,
            DatasetArg::Kununu => Dataset::Kununu,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run every matching step and write matches plus unmatched records
    Run {
        /// Orbis CSV (needs `id` and `orbis_name`)
        #[arg(long)]
        orbis: PathBuf,
        /// Kununu CSV (needs `kununu_id` and `kununu_name`)
        #[arg(long)]
        kununu: PathBuf,
        /// TOML configuration; built-in defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory for matches.csv and the unmatched tables
        #[arg(long, default_value = "output")]
        output: PathBuf,
        /// CSV field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
    /// Print the most common words of a dataset's preprocessed names
    CommonWords {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        dataset: DatasetArg,
        #[arg(long, default_value_t = 99.0)]
        percentile: f64,
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
    /// Translate German text with Google Translate
    Translate {
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "en")]
        target: String,
    },
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter).context("Delimiter must be a single-byte character")
}

fn run_linkage(
    orbis: PathBuf,
    kununu: PathBuf,
    config: Option<PathBuf>,
    output: PathBuf,
    delimiter: char,
) -> Result<()> {
    let config = match config {
        Some(path) => Config::load(&path).with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };

    let source = CsvTableSource::new(orbis, kununu).with_delimiter(delimiter_byte(delimiter)?);
    let sink = CsvMatchSink::new(&output);
    let use_case = LinkageUseCase::new(config, Arc::new(source), Arc::new(sink));

    let outcome = use_case.run()?;
    let report = &outcome.report;

    println!("\n📊 Matching Results:");
    for step in &report.steps {
        println!(
            "   {:<16} {:>8} matches ({} cumulative)",
            step.label, step.matches, step.cumulative_matches
        );
    }
    println!(
        "   Matched {:.2}% of {} Kununu firms",
        report.coverage_pct(),
        report.initial_kununu_rows
    );
    println!(
        "   Unmatched: {} Orbis, {} Kununu",
        outcome.orbis.len(),
        outcome.kununu.len()
    );
    println!("   Output directory: {}", output.display());
    Ok(())
}

fn print_common_words(input: PathBuf, dataset: Dataset, percentile: f64, delimiter: char) -> Result<()> {
    let table = read_table(&input, dataset, delimiter_byte(delimiter)?)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let names: Vec<String> = table.names().map(preprocess_name).collect();
    let words = most_common_words(names.iter().map(String::as_str), percentile)?;

    info!("{} common words above the {} percentile", words.len(), percentile);
    for word in words {
        println!("{}", word);
    }
    Ok(())
}

fn main() -> Result<()> {
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            orbis,
            kununu,
            config,
            output,
            delimiter,
        } => {
            println!("🔗 Running firm linkage...");
            if let Err(e) = run_linkage(orbis, kununu, config, output, delimiter) {
                error!("Linkage run failed: {:#}", e);
                println!("❌ Linkage run failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::CommonWords {
            input,
            dataset,
            percentile,
            delimiter,
        } => {
            print_common_words(input, dataset.into(), percentile, delimiter)?;
        }
        Commands::Translate { text, target } => {
            let translator = GoogleTranslateClient::from_env().context("GOOGLE_TRANSLATE_API_KEY is not set")?;
            match translator.translate(&text, &target) {
                Some(translated) => println!("{}", translated),
                None => {
                    println!("⚠️  No translation returned");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
