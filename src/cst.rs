//! Concrete syntax tree: one node type per grammar rule.
//!
//! Nodes borrow their tokens from the token stream. Each node's [`Span`] is the
//! contiguous run of tokens it consumed, from its first significant token to its
//! last one, with interior layout included, so concatenating the span reproduces
//! the covered source text verbatim.

use crate::token::{concat_text, HttpMethod, ScalarType, Token};
use std::fmt;
use std::ops::Range;

/// Grammar rule a node or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Entry,
    Message,
    Struct,
    Uri,
    UriPathComponent,
    ParamInUri,
    Identifier,
    Request,
    Response,
    Method,
    Param,
    Type,
    NonGenericType,
    BaseType,
    GenericType,
    ArrayType,
    DictType,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleKind::Entry => "entry",
            RuleKind::Message => "message",
            RuleKind::Struct => "struct",
            RuleKind::Uri => "uri",
            RuleKind::UriPathComponent => "uri path component",
            RuleKind::ParamInUri => "uri parameter",
            RuleKind::Identifier => "identifier",
            RuleKind::Request => "request",
            RuleKind::Response => "response",
            RuleKind::Method => "method",
            RuleKind::Param => "param",
            RuleKind::Type => "type",
            RuleKind::NonGenericType => "non-generic type",
            RuleKind::BaseType => "base type",
            RuleKind::GenericType => "generic type",
            RuleKind::ArrayType => "array type",
            RuleKind::DictType => "dict type",
        };
        f.write_str(s)
    }
}

/// Token run covered by a node. `start` is the index of its first token in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'t> {
    pub start: usize,
    pub tokens: &'t [Token<'t>],
}

impl<'t> Span<'t> {
    pub(crate) fn new(stream: &'t [Token<'t>], start: usize, end: usize) -> Self {
        Span {
            start,
            tokens: &stream[start..end],
        }
    }

    /// Index one past the last token.
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn text(&self) -> String {
        concat_text(self.tokens)
    }

    /// Byte range in the source; `None` for an empty span.
    pub fn byte_range(&self) -> Option<Range<usize>> {
        let first = self.tokens.first()?;
        let last = self.tokens.last()?;
        Some(first.span.start..last.span.end)
    }
}

/// `(Message | Struct)* EOF`
///
/// Unlike the other nodes its span starts at the beginning of the stream, so its
/// text is the whole source.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'t> {
    pub declarations: Vec<Declaration<'t>>,
    pub eof: &'t Token<'t>,
    pub span: Span<'t>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration<'t> {
    Message(Message<'t>),
    Struct(Struct<'t>),
}

impl<'t> Entry<'t> {
    pub fn messages(&self) -> impl Iterator<Item = &Message<'t>> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Message(m) => Some(m),
            Declaration::Struct(_) => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &Struct<'t>> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Struct(s) => Some(s),
            Declaration::Message(_) => None,
        })
    }
}

/// `"MESSAGE" Uri "{" (Request | Response)* "}"`
#[derive(Debug, Clone, PartialEq)]
pub struct Message<'t> {
    pub keyword: &'t Token<'t>,
    pub uri: Uri<'t>,
    pub lbrace: &'t Token<'t>,
    pub exchanges: Vec<Exchange<'t>>,
    pub rbrace: &'t Token<'t>,
    pub span: Span<'t>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Exchange<'t> {
    Request(Request<'t>),
    Response(Response<'t>),
}

impl<'t> Message<'t> {
    pub fn requests(&self) -> impl Iterator<Item = &Request<'t>> {
        self.exchanges.iter().filter_map(|e| match e {
            Exchange::Request(r) => Some(r),
            Exchange::Response(_) => None,
        })
    }

    pub fn responses(&self) -> impl Iterator<Item = &Response<'t>> {
        self.exchanges.iter().filter_map(|e| match e {
            Exchange::Response(r) => Some(r),
            Exchange::Request(_) => None,
        })
    }
}

/// `UriPathComponent*`; may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Uri<'t> {
    pub components: Vec<UriPathComponent<'t>>,
    pub span: Span<'t>,
}

/// `"/" (Identifier | ParamInUri)`
#[derive(Debug, Clone, PartialEq)]
pub struct UriPathComponent<'t> {
    pub slash: &'t Token<'t>,
    pub segment: UriSegment<'t>,
    pub span: Span<'t>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UriSegment<'t> {
    Literal(Identifier<'t>),
    Param(ParamInUri<'t>),
}

/// `"$" Identifier`
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInUri<'t> {
    pub dollar: &'t Token<'t>,
    pub name: Identifier<'t>,
    pub span: Span<'t>,
}

/// `(letter | "_") (letter | digit | "_")*`
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier<'t> {
    pub span: Span<'t>,
}

impl<'t> Identifier<'t> {
    pub fn name(&self) -> String {
        self.span.text()
    }
}

/// `Method "REQUEST" "{" Param* "}"`
#[derive(Debug, Clone, PartialEq)]
pub struct Request<'t> {
    pub method: Method<'t>,
    pub keyword: &'t Token<'t>,
    pub lbrace: &'t Token<'t>,
    pub params: Vec<Param<'t>>,
    pub rbrace: &'t Token<'t>,
    pub span: Span<'t>,
}

/// `Method "RESPONSE" "{" Param* "}"`
#[derive(Debug, Clone, PartialEq)]
pub struct Response<'t> {
    pub method: Method<'t>,
    pub keyword: &'t Token<'t>,
    pub lbrace: &'t Token<'t>,
    pub params: Vec<Param<'t>>,
    pub rbrace: &'t Token<'t>,
    pub span: Span<'t>,
}

/// `"GET" | "POST" | "PUT" | "DELETE" | "PATCH"`
#[derive(Debug, Clone, PartialEq)]
pub struct Method<'t> {
    pub token: &'t Token<'t>,
    pub method: HttpMethod,
    pub span: Span<'t>,
}

/// `Type Identifier "=" Identifier ";"`
///
/// `name` is the declared parameter name and `key` the wire name it binds to.
#[derive(Debug, Clone, PartialEq)]
pub struct Param<'t> {
    pub ty: Type<'t>,
    pub name: Identifier<'t>,
    pub assign: &'t Token<'t>,
    pub key: Identifier<'t>,
    pub semicolon: &'t Token<'t>,
    pub span: Span<'t>,
}

/// `NonGenericType | GenericType`
#[derive(Debug, Clone, PartialEq)]
pub struct Type<'t> {
    pub body: TypeBody<'t>,
    pub span: Span<'t>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeBody<'t> {
    NonGeneric(NonGenericType<'t>),
    Generic(GenericType<'t>),
}

/// `BaseType | Identifier`
#[derive(Debug, Clone, PartialEq)]
pub struct NonGenericType<'t> {
    pub body: NonGenericBody<'t>,
    pub span: Span<'t>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NonGenericBody<'t> {
    Base(BaseType<'t>),
    Custom(Identifier<'t>),
}

/// `"INT32" | "INT64" | "BOOL" | "DOUBLE" | "STRING" | "FILE" | "BLOB"`
#[derive(Debug, Clone, PartialEq)]
pub struct BaseType<'t> {
    pub token: &'t Token<'t>,
    pub scalar: ScalarType,
    pub span: Span<'t>,
}

/// `ArrayType | DictType`
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType<'t> {
    pub body: GenericBody<'t>,
    pub span: Span<'t>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenericBody<'t> {
    Array(ArrayType<'t>),
    Dict(DictType<'t>),
}

/// `"ARRAY" "<" NonGenericType ">"`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType<'t> {
    pub keyword: &'t Token<'t>,
    pub langle: &'t Token<'t>,
    pub element: NonGenericType<'t>,
    pub rangle: &'t Token<'t>,
    pub span: Span<'t>,
}

/// `"DICT" "<" NonGenericType "," NonGenericType ">"`
#[derive(Debug, Clone, PartialEq)]
pub struct DictType<'t> {
    pub keyword: &'t Token<'t>,
    pub langle: &'t Token<'t>,
    pub key: NonGenericType<'t>,
    pub comma: &'t Token<'t>,
    pub value: NonGenericType<'t>,
    pub rangle: &'t Token<'t>,
    pub span: Span<'t>,
}

/// `"STRUCT" Identifier "{" Param* "}"`
#[derive(Debug, Clone, PartialEq)]
pub struct Struct<'t> {
    pub keyword: &'t Token<'t>,
    pub name: Identifier<'t>,
    pub lbrace: &'t Token<'t>,
    pub params: Vec<Param<'t>>,
    pub rbrace: &'t Token<'t>,
    pub span: Span<'t>,
}
