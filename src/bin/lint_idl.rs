//! Lint IDL source files: one tab per depth, one param per line, no trailing whitespace, etc.
//!
//! Usage:
//!   lint_idl [--human] [FILE.idl ...]
//!   lint_idl < file.idl
//!
//! If no files are given, reads from stdin. Exit code 1 on any error-level finding
//! or on source that does not tokenize.

use clap::Parser;
use httpidl::error::line_col;
use httpidl::lint::{lint, LintMessage, Severity};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lint_idl")]
#[command(about = "Check layout style of HTTP IDL files")]
struct Args {
    /// Files to lint (stdin when omitted)
    files: Vec<PathBuf>,

    /// Human-readable output
    #[arg(long, short = 'H')]
    human: bool,
}

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

fn print_message(path: &str, m: &LintMessage, style: OutputStyle) {
    let severity_str = match m.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    match style {
        OutputStyle::Compact => {
            println!(
                "{}:{}:{}: {}: {} [{}]",
                path,
                m.line,
                m.column,
                severity_str,
                m.message,
                m.rule.id()
            );
        }
        OutputStyle::Human => {
            println!("  {} {}:{}: {}", path, m.line, m.column, m.message);
            println!("    rule: {}", m.rule.id());
        }
    }
}

#[derive(Default)]
struct Totals {
    errors: usize,
    warnings: usize,
    failed: bool,
}

impl Totals {
    fn check(&mut self, path: &str, src: &str, style: OutputStyle) {
        let messages = match lint(src) {
            Ok(messages) => messages,
            Err(e) => {
                let (line, column) = line_col(src, e.offset());
                eprintln!("{}:{}:{}: {}", path, line, column, e);
                self.failed = true;
                return;
            }
        };
        for m in &messages {
            match m.severity {
                Severity::Error => {
                    self.errors += 1;
                    self.failed = true;
                }
                Severity::Warning => self.warnings += 1,
            }
            print_message(path, m, style);
        }
    }
}

fn main() -> anyhow::Result<()> {
    httpidl::init_logging();
    let args = Args::parse();
    let style = if args.human {
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };

    let mut totals = Totals::default();
    if args.files.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        totals.check("<stdin>", &src, style);
    } else {
        for path in &args.files {
            let src = match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    totals.failed = true;
                    continue;
                }
            };
            totals.check(&path.display().to_string(), &src, style);
        }
    }

    if totals.errors > 0 || totals.warnings > 0 {
        eprintln!(
            "lint: {} error(s), {} warning(s)",
            totals.errors, totals.warnings
        );
    }
    if totals.failed {
        std::process::exit(1);
    }
    Ok(())
}
