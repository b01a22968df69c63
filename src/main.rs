// txtpp: conditional text preprocessor

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use txtpp::{Definitions, PreprocessError, STDIN_ID};

/// Conditional text preprocessor.
///
/// Lines between `@if NAME` and `@end` are kept only when NAME is defined.
/// Output is written to stdout; a file that fails to parse emits nothing.
#[derive(Parser)]
#[command(name = "txtpp", version, about)]
struct Cli {
    /// Set a definition (repeatable).
    #[arg(short = 'D', value_name = "NAME")]
    definitions: Vec<String>,

    /// Trace every directive to stderr.
    #[arg(long)]
    debug: bool,

    /// Report a file that fails to parse and continue with the next one.
    #[arg(long)]
    keep_going: bool,

    /// Never color diagnostics.
    #[arg(long)]
    no_color: bool,

    /// Input files (standard input when omitted or `-`).
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let seed: Definitions = cli.definitions.iter().cloned().collect();
    debug!(definitions = ?seed.sorted(), "seeded definitions");

    let inputs = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };
    let color = !cli.no_color && io::stderr().is_terminal();

    let mut failed = 0usize;
    for path in &inputs {
        // Every file starts from the seeded definitions.
        let mut defs = seed.clone();

        if let Err(err) = run_one(path, &mut defs) {
            report(&err, color);
            failed += 1;
            if !cli.keep_going {
                return ExitCode::FAILURE;
            }
        }
    }

    if failed > 0 {
        info!(failed, total = inputs.len(), "some files were skipped");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_one(path: &Path, defs: &mut Definitions) -> Result<(), PreprocessError> {
    let (file_id, output) = if path.as_os_str() == "-" {
        let output = txtpp::preprocess_reader(io::stdin().lock(), defs, STDIN_ID)?;
        (STDIN_ID.to_string(), output)
    } else {
        (path.display().to_string(), txtpp::preprocess_file(path, defs)?)
    };

    info!(file = file_id.as_str(), lines = output.len(), "preprocessed");
    debug!(file = file_id.as_str(), definitions = ?defs.sorted(), "definitions after run");

    output
        .write_to(io::stdout().lock())
        .map_err(|source| PreprocessError::Io { file_id, source })
}

fn report(err: &PreprocessError, color: bool) {
    let label = if color {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    };

    eprintln!("{} {}", label, err);
    if let Some(parse_error) = err.parse_error() {
        eprintln!("  | {}", parse_error.excerpt());
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("txtpp=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
