//! Traductio CLI - domain-aware translation with a local translation memory.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use traductio_core::{
    AppConfig, Assistant, Domain, Glossaries, Lang, TmMatch, TranslationMemory,
    TranslationOutcome, create_translator, join_pages, language_name, util::preview,
};

const MATCH_PREVIEW_CHARS: usize = 80;

#[derive(Parser, Debug)]
#[command(name = "traductio")]
#[command(author, version, long_about = None)]
#[command(about = "Domain-aware translation with a local translation memory")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Translation memory directory
    #[arg(long, global = true, env = "TRADUCTIO_MEMORY_PATH")]
    memory_path: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text, a text file or a PDF
    Translate(TranslateArgs),
    /// Print the text extracted from a PDF
    Extract {
        /// Input PDF file
        pdf: PathBuf,

        /// Write the text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show translation memory matches for a text
    Matches {
        /// Text to look up
        query: String,

        #[command(flatten)]
        direction: DirectionArgs,
    },
    /// Show the terminology glossary for a domain and direction
    Glossary {
        #[command(flatten)]
        direction: DirectionArgs,
    },
    /// Show translation memory statistics
    Stats,
    /// Delete every translation memory entry
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct DirectionArgs {
    /// Domain: general, juridic (legal) or medical
    #[arg(short, long)]
    domain: Option<Domain>,

    /// Source language code
    #[arg(short, long)]
    source: Option<String>,

    /// Target language code
    #[arg(short, long)]
    target: Option<String>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Text to translate (reads stdin when no input is given)
    #[arg(conflicts_with_all = ["file", "pdf"])]
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "pdf")]
    file: Option<PathBuf>,

    /// Extract the text from a PDF
    #[arg(long)]
    pdf: Option<PathBuf>,

    #[command(flatten)]
    direction: DirectionArgs,

    /// Write the translation here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Neither consult nor update the translation memory
    #[arg(long)]
    no_memory: bool,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_API_BASE")]
    api_base: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,
}

/// Resolved domain and language direction
struct Direction {
    domain: Domain,
    source: Lang,
    target: Lang,
}

impl DirectionArgs {
    fn resolve(&self, config: &AppConfig) -> Direction {
        Direction {
            domain: self.domain.unwrap_or(config.domain),
            source: self
                .source
                .as_deref()
                .map_or_else(|| config.source_lang.clone(), Lang::new),
            target: self
                .target
                .as_deref()
                .map_or_else(|| config.target_lang.clone(), Lang::new),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = if let Some(config_path) = &cli.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    if let Some(path) = cli.memory_path {
        config.memory.path = Some(path);
    }

    match cli.command {
        Command::Translate(args) => translate(config, args).await,
        Command::Extract { pdf, output } => {
            let text = read_pdf(&pdf)?;
            emit(&text, output.as_deref())
        }
        Command::Matches { query, direction } => {
            let direction = direction.resolve(&config);
            let memory = open_memory(&config)?;
            let matches =
                memory.find_matches(&query, direction.domain, &direction.source, &direction.target);
            print_matches(&matches);
            Ok(())
        }
        Command::Glossary { direction } => {
            let direction = direction.resolve(&config);
            let glossaries = Glossaries::load(config.glossary_path.as_deref())
                .context("Failed to load glossary")?;
            let text =
                glossaries.glossary_text(direction.domain, &direction.source, &direction.target);
            if text.is_empty() {
                info!(
                    "No glossary for {} {}->{}",
                    direction.domain, direction.source, direction.target
                );
                return Ok(());
            }
            emit(text.trim(), None)
        }
        Command::Stats => {
            let memory = open_memory(&config)?;
            print_stats(&memory, &config);
            Ok(())
        }
        Command::Clear { yes } => {
            let mut memory = open_memory(&config)?;
            if !yes && !confirm(memory.count())? {
                return Ok(());
            }
            memory.clear();
            emit("Translation memory cleared.", None)
        }
    }
}

async fn translate(mut config: AppConfig, args: TranslateArgs) -> Result<()> {
    let direction = args.direction.resolve(&config);
    if direction.source == direction.target {
        bail!(
            "Source and target language are both {}; choose two different languages",
            direction.source
        );
    }

    if let Some(api_base) = args.api_base {
        config.translator.api_base = api_base;
    }
    if args.api_key.is_some() {
        config.translator.api_key = args.api_key;
    }
    if let Some(model) = args.model {
        config.translator.model = model;
    }

    let text = if let Some(text) = args.text {
        text
    } else if let Some(path) = &args.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else if let Some(path) = &args.pdf {
        read_pdf(path)?
    } else {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    };

    if text.trim().is_empty() {
        bail!("Nothing to translate");
    }

    let translator =
        create_translator(&config.translator).context("Failed to initialize translator")?;
    let glossaries =
        Glossaries::load(config.glossary_path.as_deref()).context("Failed to load glossary")?;
    let memory_enabled = !args.no_memory && config.memory.enabled;
    let memory = if memory_enabled {
        open_memory_or_in_memory(&config)
    } else {
        TranslationMemory::in_memory()
    };
    let assistant = Assistant::with_parts(translator, memory)
        .with_glossaries(glossaries)
        .memory_enabled(memory_enabled);

    let spinner = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}").unwrap());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Translating {} -> {} ({})",
        language_name(direction.source.as_str()),
        language_name(direction.target.as_str()),
        direction.domain.label()
    ));

    let result = assistant
        .translate(&text, direction.domain, &direction.source, &direction.target)
        .await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if e.is_missing_credentials() => bail!(
            "No Gemini API key configured. Set GEMINI_API_KEY, pass --api-key, \
             or add api_key under [translator] in config.toml"
        ),
        Err(e) => return Err(e).context("Translation failed"),
    };

    report(&outcome);
    emit(&outcome.translated, args.output.as_deref())
}

fn open_memory(config: &AppConfig) -> Result<TranslationMemory> {
    TranslationMemory::open(&config.memory).context("Failed to open translation memory")
}

/// Translation still works without a usable store; it just isn't remembered.
fn open_memory_or_in_memory(config: &AppConfig) -> TranslationMemory {
    TranslationMemory::open(&config.memory).unwrap_or_else(|e| {
        warn!("{e}");
        warn!("Continuing with a temporary translation memory");
        TranslationMemory::in_memory()
    })
}

fn read_pdf(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let pages = traductio_core::extract_text(bytes)
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;
    info!("Extracted {} pages from {}", pages.len(), path.display());
    Ok(join_pages(&pages))
}

fn report(outcome: &TranslationOutcome) {
    if !outcome.matches.is_empty() {
        eprintln_matches(&outcome.matches);
    }
    if outcome.glossary_used {
        info!("Domain glossary included in the prompt");
    }
    if let Some(stored) = &outcome.stored {
        info!("Translation memory: {:?}", stored);
    }
}

// CLI output is intentional
#[allow(clippy::print_stderr)]
fn eprintln_matches(matches: &[TmMatch]) {
    eprintln!("Translation memory matches:");
    for m in matches {
        eprintln!(
            "  {:>3}%  {}  =>  {}",
            m.score,
            preview(&m.entry.source_text, MATCH_PREVIEW_CHARS),
            preview(&m.entry.translated_text, MATCH_PREVIEW_CHARS)
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_matches(matches: &[TmMatch]) {
    if matches.is_empty() {
        println!("No matches.");
        return;
    }
    for m in matches {
        println!(
            "{:>3}% [{}] used {}x",
            m.score,
            m.match_type.as_str(),
            m.entry.used_count
        );
        println!("  {}", m.entry.source_text);
        println!("  {}", m.entry.translated_text);
    }
}

#[allow(clippy::print_stdout)]
fn print_stats(memory: &TranslationMemory, config: &AppConfig) {
    println!("Location: {}", config.memory.resolved_path().display());
    println!("Entries:  {}", memory.count());

    let mut by_domain = Domain::ALL.map(|domain| (domain, 0_usize));
    for entry in memory.entries() {
        if let Some((_, count)) = by_domain.iter_mut().find(|(d, _)| *d == entry.domain) {
            *count += 1;
        }
    }
    for (domain, count) in by_domain {
        println!("  {:<8} {}", domain.label(), count);
    }
}

#[allow(clippy::print_stderr)]
fn confirm(count: usize) -> Result<bool> {
    eprint!("Delete all {count} translation memory entries? [y/N] ");
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
        return Ok(());
    }

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("{text}");
    }
    Ok(())
}
