//! # httpidl — Lexer and Parser for an HTTP Interface Description Language
//!
//! A small IDL describing HTTP endpoints (messages with request/response blocks)
//! and reusable structs, plus a front end that turns source text into a concrete
//! syntax tree and a lowered, span-free model.
//!
//! ## Pipeline
//!
//! - **Lexer**: maximal-munch scanner over a trie automaton built from a
//!   configurable [`LexicalRules`] table. Every byte of the source, layout included,
//!   lands in exactly one token.
//! - **Parser**: recursive descent, one [`Context`] implementation per grammar rule,
//!   with deepest-path error reporting.
//! - **Model**: [`model::Document`] lowered from the CST for downstream consumers.
//!
//! ## Grammar
//!
//! ```text
//! Entry          := (Message | Struct)* EOF
//! Message        := "MESSAGE" Uri "{" (Request | Response)* "}"
//! Struct         := "STRUCT" Identifier "{" Param* "}"
//! Uri            := ("/" (Identifier | "$" Identifier))*
//! Request        := Method "REQUEST" "{" Param* "}"
//! Response       := Method "RESPONSE" "{" Param* "}"
//! Method         := "GET" | "POST" | "PUT" | "DELETE" | "PATCH"
//! Param          := Type Identifier "=" Identifier ";"
//! Type           := NonGenericType | GenericType
//! NonGenericType := BaseType | Identifier
//! BaseType       := "INT32" | "INT64" | "BOOL" | "DOUBLE" | "STRING" | "FILE" | "BLOB"
//! GenericType    := "ARRAY" "<" NonGenericType ">"
//!                 | "DICT" "<" NonGenericType "," NonGenericType ">"
//! Identifier     := (letter | "_") (letter | digit | "_")*
//! ```
//!
//! ## Example IDL
//!
//! ```text
//! MESSAGE /users/$id {
//! 	GET REQUEST {
//! 		INT64 id = id;
//! 	}
//! 	GET RESPONSE {
//! 		User user = user;
//! 		DICT<STRING, INT32> scores = scores;
//! 	}
//! }
//!
//! STRUCT User {
//! 	STRING name = name;
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! let tokens = httpidl::tokenize("STRUCT User { STRING name = n; }").unwrap();
//! let entry = httpidl::parse(&tokens).unwrap();
//! assert_eq!(entry.structs().count(), 1);
//! ```

pub mod cst;
pub mod dump;
pub mod error;
pub mod lexer;
pub mod lint;
pub mod model;
pub mod parser;
pub mod token;
pub mod trie;

pub use cst::{Entry, RuleKind, Span};
pub use error::IdlError;
pub use lexer::{LexError, Lexer, LexerBuildError, Recognition};
pub use parser::{Context, ParseError, ParseErrorKind, Parser};
pub use token::{HttpMethod, LexicalRule, LexicalRules, ScalarType, Token, TokenKind};
pub use trie::Trie;

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Lexer over the built-in rule table, built on first use.
pub fn standard_lexer() -> &'static Lexer {
    static LEXER: OnceLock<Lexer> = OnceLock::new();
    LEXER.get_or_init(Lexer::default)
}

/// Tokenize with the built-in rule table.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    standard_lexer().tokenize(source)
}

/// Parse a token stream ending in `Eof`.
pub fn parse<'t>(tokens: &'t [Token<'t>]) -> Result<Entry<'t>, ParseError> {
    parser::parse(tokens)
}

/// Install the stderr log subscriber used by the command-line tools.
///
/// `RUST_LOG` overrides the default filter of `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Lex, parse and lower `source` in one go.
pub fn parse_source(source: &str) -> Result<model::Document, IdlError> {
    let tokens = tokenize(source)?;
    let entry = parse(&tokens)?;
    Ok(model::Document::from_entry(&entry))
}
