//! folio-validate - Check generated pages against their source texts

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use folio::validate::{ValidationReport, Validator};

#[derive(Parser)]
#[command(name = "folio-validate")]
#[command(version, about = "Check generated pages against their source texts", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio-validate index.html resources/          Validate every linked page
    folio-validate index.html resources/ --json   Machine-readable report")]
struct Cli {
    /// Index page listing the entries to validate
    #[arg(value_name = "INDEX")]
    index: PathBuf,

    /// Directory holding the plain-text fixtures
    #[arg(value_name = "FIXTURES")]
    fixtures: PathBuf,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Suppress per-entry output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let validator = Validator::new(&cli.fixtures);
    let report = match validator.run(&cli.index) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if !cli.quiet {
        print_report(&report);
    }

    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(report: &ValidationReport) {
    for entry in &report.entries {
        if entry.passed {
            println!("pass {}", entry.name);
        } else {
            eprintln!("fail {}", entry.name);
            if let Some(ref e) = entry.error {
                eprintln!("  {e}");
            }
            if let Some(ref m) = entry.mismatch {
                eprintln!("  first difference at char {}", m.char_index);
                eprintln!("  expected: {}", m.expected);
                eprintln!("  actual:   {}", m.actual);
            }
        }
    }
}
