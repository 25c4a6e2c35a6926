//! pdftally CLI - token cost estimation for PDF documents

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftally::{
    DecryptionGate, DocumentSource, EstimateOptions, Estimator, Extractor, GateStatus, PdfSource,
    TokenCostReport,
};

#[derive(Parser)]
#[command(name = "pdftally")]
#[command(version)]
#[command(about = "Estimate LLM token costs for PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Passphrase for encrypted documents (prompts interactively if omitted)
    #[arg(short, long, env = "PDFTALLY_PASSWORD")]
    password: Option<String>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the token cost of a document
    Estimate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Passphrase for encrypted documents
        #[arg(short, long, env = "PDFTALLY_PASSWORD")]
        password: Option<String>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Skip undecodable images instead of aborting
        #[arg(long)]
        skip_undecodable: bool,

        /// Decode images in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the concatenated text fed to the tokenizer
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Passphrase for encrypted documents
        #[arg(short, long, env = "PDFTALLY_PASSWORD")]
        password: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Estimate {
            input,
            password,
            json,
            skip_undecodable,
            parallel,
        }) => cmd_estimate(&input, password.as_deref(), json, skip_undecodable, parallel),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Text {
            input,
            password,
            output,
        }) => cmd_text(&input, password.as_deref(), output.as_deref()),
        None => {
            if let Some(input) = cli.input {
                cmd_estimate(&input, cli.password.as_deref(), cli.json, false, false)
            } else {
                println!("{}", "Usage: pdftally <FILE>".yellow());
                println!("       pdftally --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Drive the decryption gate until it opens or the user gives up.
///
/// A configured passphrase is tried first; after that the gate is fed
/// from stdin, one attempt per line. EOF stops awaiting input and
/// discards the document.
fn unlock(source: PdfSource, password: Option<&str>) -> Result<PdfSource, Box<dyn std::error::Error>> {
    let mut gate = DecryptionGate::new(source);

    if gate.is_locked() {
        if let Some(pw) = password {
            if gate.submit_passphrase(pw) == GateStatus::IncorrectPassphrase {
                eprintln!("{}", "Incorrect passphrase".red());
            }
        }

        let stdin = io::stdin();
        while gate.is_locked() {
            eprint!("Passphrase: ");
            io::stderr().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF: stop awaiting input.
                break;
            }

            match gate.submit_passphrase(line.trim_end_matches(['\r', '\n'])) {
                GateStatus::Open => break,
                GateStatus::AwaitingPassphrase => {
                    eprintln!("{}", "Empty passphrase; still waiting".yellow());
                }
                GateStatus::IncorrectPassphrase => {
                    eprintln!("{}", "Incorrect passphrase, try again".red());
                }
                GateStatus::Failed => break,
            }
        }
    }

    Ok(gate.into_inner()?)
}

fn cmd_estimate(
    input: &Path,
    password: Option<&str>,
    json: bool,
    skip_undecodable: bool,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = unlock(PdfSource::open(input)?, password)?;
    let info = source.info();

    let spinner = if json {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message("Estimating token cost...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    };

    let mut options = EstimateOptions::new().with_parallel(parallel);
    if skip_undecodable {
        options = options.skip_undecodable();
    }
    let estimator = Estimator::with_defaults()?.with_options(options);
    let report = estimator.estimate_source(source)?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(input, &info, &report);
    }

    Ok(())
}

fn print_report(input: &Path, info: &pdftally::DocumentInfo, report: &TokenCostReport) {
    println!(
        "{} {} (PDF {}, {} pages)",
        "Document:".bold(),
        input.display(),
        info.version,
        info.page_count
    );
    println!(
        "{} {} tokens",
        "Text:    ".bold(),
        report.text_tokens().to_string().cyan()
    );
    println!(
        "{} {} images, {} tokens",
        "Images:  ".bold(),
        report.image_count(),
        report.image_tokens().to_string().cyan()
    );
    for cost in report.images() {
        println!("  {:<24} {:>8}", cost.id.to_string(), cost.tokens);
    }
    if report.has_skipped() {
        println!("{}", "Skipped: ".bold());
        for skip in report.skipped() {
            println!("  {:<24} {}", skip.id.to_string(), skip.reason.yellow());
        }
    }
    println!(
        "{} {} tokens",
        "Total:   ".bold(),
        report.total_tokens().to_string().green().bold()
    );
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = PdfSource::open(input)?;
    let info = source.info();

    println!("{} {}", "File:     ".bold(), input.display());
    println!("{} {}", "Version:  ".bold(), info.version);
    println!("{} {}", "Pages:    ".bold(), info.page_count);
    println!(
        "{} {}",
        "Encrypted:".bold(),
        if info.encrypted {
            "yes".yellow().to_string()
        } else {
            "no".to_string()
        }
    );

    Ok(())
}

fn cmd_text(
    input: &Path,
    password: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = unlock(PdfSource::open(input)?, password)?;
    let extractor = Extractor::new(source);
    let text = extractor.concatenated_text()?;

    match output {
        Some(path) => fs::write(path, text)?,
        None => print!("{}", text),
    }

    Ok(())
}
