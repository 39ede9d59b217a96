//! Differential tests: the hand-written lexer and parser must accept exactly the
//! documents a PEG rendition of the same grammar accepts, and find the same
//! declarations and params.
//!
//! Identifiers are atomic and stop in front of any keyword spelling, which is how
//! maximal munch splits `aGET` into a letter and a keyword token.

use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar_inline = r#"
WHITESPACE = _{ " " | "\t" | "\r" | "\n" }

keyword = {
    "MESSAGE" | "STRUCT" | "REQUEST" | "RESPONSE"
  | "GET" | "POST" | "PUT" | "DELETE" | "PATCH"
  | "INT32" | "INT64" | "BOOL" | "DOUBLE" | "STRING" | "FILE" | "BLOB"
  | "ARRAY" | "DICT"
}

identifier = @{ !keyword ~ (ASCII_ALPHA | "_") ~ (!keyword ~ (ASCII_ALPHANUMERIC | "_"))* }

entry = { SOI ~ (message_decl | struct_decl)* ~ EOI }

message_decl  = { "MESSAGE" ~ uri ~ "{" ~ (request_decl | response_decl)* ~ "}" }
struct_decl   = { "STRUCT" ~ identifier ~ "{" ~ param* ~ "}" }
uri           = { uri_component* }
uri_component = { "/" ~ (identifier | param_in_uri) }
param_in_uri  = { "$" ~ identifier }

request_decl  = { method ~ "REQUEST" ~ "{" ~ param* ~ "}" }
response_decl = { method ~ "RESPONSE" ~ "{" ~ param* ~ "}" }
method        = { "GET" | "POST" | "PUT" | "DELETE" | "PATCH" }

param       = { type_decl ~ identifier ~ "=" ~ identifier ~ ";" }
type_decl   = { non_generic | generic }
non_generic = { base_type | identifier }
base_type   = { "INT32" | "INT64" | "BOOL" | "DOUBLE" | "STRING" | "FILE" | "BLOB" }
generic     = { array_type | dict_type }
array_type  = { "ARRAY" ~ "<" ~ non_generic ~ ">" }
dict_type   = { "DICT" ~ "<" ~ non_generic ~ "," ~ non_generic ~ ">" }
"#]
struct IdlGrammar;

/// (messages, structs, params) as found by each parser.
type Shape = (usize, usize, usize);

fn oracle(src: &str) -> Option<Shape> {
    let mut pairs = IdlGrammar::parse(Rule::entry, src).ok()?;
    let entry = pairs.next()?;
    let mut shape = (0, 0, 0);
    for pair in entry.into_inner().flatten() {
        match pair.as_rule() {
            Rule::message_decl => shape.0 += 1,
            Rule::struct_decl => shape.1 += 1,
            Rule::param => shape.2 += 1,
            _ => {}
        }
    }
    Some(shape)
}

fn hand_written(src: &str) -> Option<Shape> {
    let doc = httpidl::parse_source(src).ok()?;
    let exchange_params: usize = doc
        .messages
        .iter()
        .flat_map(|m| m.requests.iter().chain(m.responses.iter()))
        .map(|e| e.params.len())
        .sum();
    let struct_params: usize = doc.structs.iter().map(|s| s.params.len()).sum();
    Some((
        doc.messages.len(),
        doc.structs.len(),
        exchange_params + struct_params,
    ))
}

const ACCEPTED: &[&str] = &[
    "",
    "\n\n",
    "STRUCT Foo { }",
    "STRUCT Foo{}",
    "STRUCTFoo{}",
    "MESSAGE { }",
    "MESSAGE/x{}",
    "MESSAGE /a/$b/c { GET REQUEST { } POST RESPONSE { INT32 x = y; } }",
    "MESSAGE /users/$id{GET REQUEST{} GET RESPONSE{INT32 code = code;}}",
    "STRUCT S { ARRAY<INT32> a = b; DICT<STRING, Item> m = n; BLOB c = d; }",
    "STRUCT S { ARRAY < Item > a = b ; }",
    "STRUCT _1 { T9 a_b = _; }",
    "STRUCT GE { INT3 PU = DELET; }",
    "MESSAGE /v1 { DELETE REQUEST { } PATCH RESPONSE { } PUT REQUEST { } }\nSTRUCT A { }\nSTRUCT B { A a = a; }\n",
    "MESSAGE\r\n/x\r\n{\r\n\tGETREQUEST{}\r\n}\r\n",
];

const REJECTED: &[&str] = &[
    "STRUCT { }",
    "STRUCT Foo {",
    "STRUCT Foo }",
    "STRUCT 1Foo { }",
    "STRUCT GET { }",
    "STRUCT STRUCTURE { }",
    "MESSAGE /a { GET { } }",
    "MESSAGE /a { REQUEST { } }",
    "MESSAGE /$ { }",
    "MESSAGE a { }",
    "MESSAGE/{}",
    "MESSAGE /a { GET REQUEST { } ",
    "STRUCT S { INT32 a b; }",
    "STRUCT S { INT32 a = b }",
    "STRUCT S { ARRAY<ARRAY<INT32>> a = b; }",
    "STRUCT S { DICT<INT32> a = b; }",
    "STRUCT S { ARRAY<> a = b; }",
    "STRUCT S { } ;",
    "message /a { }",
    "STRUCT S { INT32 a = b; } }",
];

#[test]
fn both_parsers_accept() {
    for src in ACCEPTED {
        let expected = oracle(src);
        assert!(expected.is_some(), "oracle rejects {:?}", src);
        assert_eq!(hand_written(src), expected, "shape differs for {:?}", src);
    }
}

#[test]
fn both_parsers_reject() {
    for src in REJECTED {
        assert_eq!(oracle(src), None, "oracle accepts {:?}", src);
        let r = httpidl::parse_source(src);
        assert!(r.is_err(), "hand-written parser accepts {:?}: {:?}", src, r);
    }
}

#[test]
fn generated_documents_agree() {
    let types = ["INT32", "Item", "ARRAY<BOOL>", "DICT<STRING, Item>", "ARRAY<", "DICT<INT64 Item>"];
    let names = ["a", "_b1", "GET", "x9", "1a"];
    let methods = ["GET", "POST", "PATCH", "FETCH"];
    let kinds = ["REQUEST", "RESPONSE", "REQ"];
    let mut checked = 0;
    for ty in types {
        for name in names {
            for method in methods {
                for kind in kinds {
                    let src = format!(
                        "MESSAGE /r/${name} {{\n\t{method} {kind} {{\n\t\t{ty} {name} = k;\n\t}}\n}}\nSTRUCT {name} {{ {ty} f = {name}; }}\n"
                    );
                    assert_eq!(hand_written(&src), oracle(&src), "disagree on {:?}", src);
                    checked += 1;
                }
            }
        }
    }
    assert_eq!(checked, 360);
}
