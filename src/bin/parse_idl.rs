//! Parse an IDL file and print what the front end made of it.
//!
//! Usage:
//!   parse_idl [--tokens] [--tree] [--model] [FILE.idl]
//!   parse_idl < file.idl
//!
//! With no output flag a one-line summary is printed. Exit code 1 on a lex or parse error.

use clap::Parser;
use httpidl::{dump, model::Document, IdlError};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "parse_idl")]
#[command(about = "Lex and parse an HTTP IDL file")]
struct Args {
    /// IDL source file (stdin when omitted)
    file: Option<PathBuf>,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree outline
    #[arg(long)]
    tree: bool,

    /// Print the lowered model
    #[arg(long)]
    model: bool,
}

fn main() -> anyhow::Result<()> {
    httpidl::init_logging();
    let args = Args::parse();

    let (name, src) = match &args.file {
        Some(path) => (path.display().to_string(), std::fs::read_to_string(path)?),
        None => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            ("<stdin>".to_string(), src)
        }
    };
    info!(file = %name, bytes = src.len(), "parsing");

    let tokens = match httpidl::tokenize(&src) {
        Ok(tokens) => tokens,
        Err(e) => fail(&name, &src, e.into()),
    };
    if args.tokens {
        print!("{}", dump::render_tokens(&tokens));
    }
    let entry = match httpidl::parse(&tokens) {
        Ok(entry) => entry,
        Err(e) => fail(&name, &src, e.into()),
    };
    if args.tree {
        print!("{}", dump::render_tree(&entry));
    }
    let doc = Document::from_entry(&entry);
    if args.model {
        print_model(&doc);
    }
    if !(args.tokens || args.tree || args.model) {
        println!(
            "{}: ok ({} message(s), {} struct(s))",
            name,
            doc.messages.len(),
            doc.structs.len()
        );
    }
    Ok(())
}

fn fail(name: &str, src: &str, err: IdlError) -> ! {
    let (line, column) = err.line_col(src);
    eprintln!("{}:{}:{}: {}", name, line, column, err);
    process::exit(1);
}

fn print_model(doc: &Document) {
    for m in &doc.messages {
        println!("MESSAGE {}", m.uri_template());
        for r in &m.requests {
            println!("  {} REQUEST", r.method);
            for p in &r.params {
                println!("    {} {} = {}", p.ty, p.name, p.key);
            }
        }
        for r in &m.responses {
            println!("  {} RESPONSE", r.method);
            for p in &r.params {
                println!("    {} {} = {}", p.ty, p.name, p.key);
            }
        }
    }
    for s in &doc.structs {
        println!("STRUCT {}", s.name);
        for p in &s.params {
            println!("  {} {} = {}", p.ty, p.name, p.key);
        }
    }
}
