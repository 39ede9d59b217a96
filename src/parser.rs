//! Recursive-descent parser producing the concrete syntax tree.
//!
//! Every rule implements [`Context::consume`]: skip leading layout, apply its
//! production, and return the index after the last consumed token together with
//! the node. A failed optional attempt (an alternative or one round of a `*` loop)
//! consumes nothing; the caller retries from the same index. A missing mandatory
//! token fails the whole rule, with no resynchronization.
//!
//! When a rule fails, the reported error is the one that got furthest into the
//! token stream among the rule's own failure and the failures of the optional
//! attempts it made, so a document with a missing `}` deep inside reports that
//! brace and not the missing end of input at the top.

use crate::cst::*;
use crate::token::{Token, TokenKind};
use std::fmt;
use tracing::{debug, trace};

/// Mandatory element whose absence failed a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    MissingEof,
    MissingMessageKeyword,
    MissingStructKeyword,
    MissingRequestKeyword,
    MissingResponseKeyword,
    MissingMethodKeyword,
    MissingTypeKeyword,
    MissingArrayKeyword,
    MissingDictKeyword,
    MissingLBrace,
    MissingRBrace,
    MissingLAngle,
    MissingRAngle,
    MissingComma,
    MissingSlash,
    MissingDollar,
    MissingUnderlineOrChar,
    MissingAssign,
    MissingSemicolon,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::MissingEof => "expected end of input",
            ParseErrorKind::MissingMessageKeyword => "expected MESSAGE",
            ParseErrorKind::MissingStructKeyword => "expected STRUCT",
            ParseErrorKind::MissingRequestKeyword => "expected REQUEST",
            ParseErrorKind::MissingResponseKeyword => "expected RESPONSE",
            ParseErrorKind::MissingMethodKeyword => "expected GET, POST, PUT, DELETE or PATCH",
            ParseErrorKind::MissingTypeKeyword => {
                "expected INT32, INT64, BOOL, DOUBLE, STRING, FILE or BLOB"
            }
            ParseErrorKind::MissingArrayKeyword => "expected ARRAY",
            ParseErrorKind::MissingDictKeyword => "expected DICT",
            ParseErrorKind::MissingLBrace => "expected '{'",
            ParseErrorKind::MissingRBrace => "expected '}'",
            ParseErrorKind::MissingLAngle => "expected '<'",
            ParseErrorKind::MissingRAngle => "expected '>'",
            ParseErrorKind::MissingComma => "expected ','",
            ParseErrorKind::MissingSlash => "expected '/'",
            ParseErrorKind::MissingDollar => "expected '$'",
            ParseErrorKind::MissingUnderlineOrChar => "expected a letter or '_'",
            ParseErrorKind::MissingAssign => "expected '='",
            ParseErrorKind::MissingSemicolon => "expected ';'",
        };
        f.write_str(s)
    }
}

/// A rule failed on a missing mandatory token.
///
/// `index` is the token index where the token was expected (after skipped layout);
/// `offset` is the byte offset of the token found there, or the end of the last
/// token when the stream ran out.
///
/// `last` is the index of the last significant token before `index`, the one the
/// failing rule stopped after, and `last_end` is its end offset. Both are `None`
/// when the failure is at the first significant token of the stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{rule}: {kind}, found {} at offset {offset}", describe(.found))]
pub struct ParseError {
    pub rule: RuleKind,
    pub kind: ParseErrorKind,
    pub index: usize,
    pub offset: usize,
    pub found: Option<TokenKind>,
    pub last: Option<usize>,
    pub last_end: Option<usize>,
}

fn describe(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "nothing".to_string(),
    }
}

impl ParseError {
    fn missing(rule: RuleKind, kind: ParseErrorKind, tokens: &[Token<'_>], index: usize) -> Self {
        let found = tokens.get(index);
        let offset = found
            .map(|t| t.span.start)
            .or_else(|| tokens.last().map(|t| t.span.end))
            .unwrap_or(0);
        let last = tokens[..index.min(tokens.len())]
            .iter()
            .rposition(|t| !t.kind.is_layout());
        ParseError {
            rule,
            kind,
            index,
            offset,
            found: found.map(|t| t.kind),
            last,
            last_end: last.map(|i| tokens[i].span.end),
        }
    }
}

/// Uniform contract of every grammar rule.
pub trait Context<'t>: Sized {
    const RULE: RuleKind;

    /// Match this rule starting at token index `at`. An `at` past the end of the
    /// stream is treated as the end.
    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError>;

    fn span(&self) -> Span<'t>;

    /// Source text this node covers.
    fn text(&self) -> String {
        self.span().text()
    }
}

/// Drives the entry rule over a whole token stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    /// Parse the whole stream. Tokens left after the matched `Eof` are an error.
    pub fn parse<'t>(&self, tokens: &'t [Token<'t>]) -> Result<Entry<'t>, ParseError> {
        let (cursor, entry) = Entry::consume(tokens, 0)?;
        if cursor != tokens.len() {
            return Err(ParseError::missing(
                Entry::RULE,
                ParseErrorKind::MissingEof,
                tokens,
                cursor,
            ));
        }
        debug!(
            messages = entry.messages().count(),
            structs = entry.structs().count(),
            "parse complete"
        );
        Ok(entry)
    }
}

/// Parse a token stream produced by [`crate::Lexer`]; it must end with `Eof`.
pub fn parse<'t>(tokens: &'t [Token<'t>]) -> Result<Entry<'t>, ParseError> {
    Parser.parse(tokens)
}

// ==================== Cursor helpers ====================

fn skip_layout(tokens: &[Token<'_>], at: usize) -> usize {
    let mut at = at.min(tokens.len());
    while tokens.get(at).is_some_and(|t| t.kind.is_layout()) {
        at += 1;
    }
    at
}

fn expect<'t>(
    tokens: &'t [Token<'t>],
    at: usize,
    rule: RuleKind,
    kind: TokenKind,
    missing: ParseErrorKind,
) -> Result<(usize, &'t Token<'t>), ParseError> {
    let at = skip_layout(tokens, at);
    match tokens.get(at) {
        Some(token) if token.kind == kind => Ok((at + 1, token)),
        _ => Err(ParseError::missing(rule, missing, tokens, at)),
    }
}

/// Deepest failure swallowed by optional attempts within one rule invocation.
#[derive(Debug, Default)]
struct Furthest(Option<ParseError>);

impl Furthest {
    /// Later attempts win ties, matching [`deeper`].
    fn record(&mut self, err: ParseError) {
        if self.0.as_ref().map_or(true, |seen| err.index >= seen.index) {
            self.0 = Some(err);
        }
    }

    /// The rule's own failure unless an attempt got strictly further.
    fn or(self, own: ParseError) -> ParseError {
        match self.0 {
            Some(seen) if seen.index > own.index => seen,
            _ => own,
        }
    }

    fn take_or(&mut self, own: ParseError) -> ParseError {
        Furthest(self.0.take()).or(own)
    }
}

/// Later alternative wins ties, earlier one only if it got further.
fn deeper(first: ParseError, second: ParseError) -> ParseError {
    if first.index > second.index {
        first
    } else {
        second
    }
}

fn attempt<'t, C: Context<'t>>(
    tokens: &'t [Token<'t>],
    at: usize,
    furthest: &mut Furthest,
) -> Option<(usize, C)> {
    match C::consume(tokens, at) {
        Ok(found) => Some(found),
        Err(err) => {
            trace!(rule = %C::RULE, index = at, error = %err, "alternative discarded");
            furthest.record(err);
            None
        }
    }
}

fn repeat<'t, C: Context<'t>>(
    tokens: &'t [Token<'t>],
    mut at: usize,
    furthest: &mut Furthest,
) -> (usize, Vec<C>) {
    let mut items = Vec::new();
    while at < tokens.len() {
        match attempt::<C>(tokens, at, furthest) {
            Some((next, item)) => {
                at = next;
                items.push(item);
            }
            None => break,
        }
    }
    (at, items)
}

// ==================== Declarations ====================

impl<'t> Context<'t> for Entry<'t> {
    const RULE: RuleKind = RuleKind::Entry;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        // the entry covers the whole stream, leading layout included
        let start = at.min(tokens.len());
        let mut cursor = skip_layout(tokens, at);
        let mut furthest = Furthest::default();
        let mut declarations = Vec::new();
        while cursor < tokens.len() {
            if let Some((next, message)) = attempt::<Message>(tokens, cursor, &mut furthest) {
                declarations.push(Declaration::Message(message));
                cursor = next;
                continue;
            }
            match attempt::<Struct>(tokens, cursor, &mut furthest) {
                Some((next, decl)) => {
                    declarations.push(Declaration::Struct(decl));
                    cursor = next;
                }
                None => break,
            }
        }
        let (cursor, eof) =
            expect(tokens, cursor, Self::RULE, TokenKind::Eof, ParseErrorKind::MissingEof)
                .map_err(|err| furthest.or(err))?;
        Ok((
            cursor,
            Entry {
                declarations,
                eof,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for Message<'t> {
    const RULE: RuleKind = RuleKind::Message;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, keyword) = expect(
            tokens,
            start,
            Self::RULE,
            TokenKind::Message,
            ParseErrorKind::MissingMessageKeyword,
        )?;
        let mut furthest = Furthest::default();
        let (cursor, uri) = consume_uri(tokens, cursor, &mut furthest);
        let (mut cursor, lbrace) =
            expect(tokens, cursor, Self::RULE, TokenKind::LBrace, ParseErrorKind::MissingLBrace)
                .map_err(|err| furthest.take_or(err))?;

        let mut exchanges = Vec::new();
        while cursor < tokens.len() {
            if let Some((next, request)) = attempt::<Request>(tokens, cursor, &mut furthest) {
                exchanges.push(Exchange::Request(request));
                cursor = next;
                continue;
            }
            match attempt::<Response>(tokens, cursor, &mut furthest) {
                Some((next, response)) => {
                    exchanges.push(Exchange::Response(response));
                    cursor = next;
                }
                None => break,
            }
        }

        let (cursor, rbrace) =
            expect(tokens, cursor, Self::RULE, TokenKind::RBrace, ParseErrorKind::MissingRBrace)
                .map_err(|err| furthest.or(err))?;
        Ok((
            cursor,
            Message {
                keyword,
                uri,
                lbrace,
                exchanges,
                rbrace,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for Struct<'t> {
    const RULE: RuleKind = RuleKind::Struct;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, keyword) = expect(
            tokens,
            start,
            Self::RULE,
            TokenKind::Struct,
            ParseErrorKind::MissingStructKeyword,
        )?;
        let (cursor, name) = Identifier::consume(tokens, cursor)?;
        let (cursor, lbrace) =
            expect(tokens, cursor, Self::RULE, TokenKind::LBrace, ParseErrorKind::MissingLBrace)?;
        let mut furthest = Furthest::default();
        let (cursor, params) = repeat::<Param>(tokens, cursor, &mut furthest);
        let (cursor, rbrace) =
            expect(tokens, cursor, Self::RULE, TokenKind::RBrace, ParseErrorKind::MissingRBrace)
                .map_err(|err| furthest.or(err))?;
        Ok((
            cursor,
            Struct {
                keyword,
                name,
                lbrace,
                params,
                rbrace,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

// ==================== URI ====================

impl<'t> Context<'t> for Uri<'t> {
    const RULE: RuleKind = RuleKind::Uri;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        Ok(consume_uri(tokens, at, &mut Furthest::default()))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

/// A URI never fails; the enclosing message reports what its components swallowed.
fn consume_uri<'t>(
    tokens: &'t [Token<'t>],
    at: usize,
    furthest: &mut Furthest,
) -> (usize, Uri<'t>) {
    let start = skip_layout(tokens, at);
    let (cursor, components) = repeat::<UriPathComponent>(tokens, start, furthest);
    (
        cursor,
        Uri {
            components,
            span: Span::new(tokens, start, cursor),
        },
    )
}

impl<'t> Context<'t> for UriPathComponent<'t> {
    const RULE: RuleKind = RuleKind::UriPathComponent;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, slash) =
            expect(tokens, start, Self::RULE, TokenKind::Slash, ParseErrorKind::MissingSlash)?;
        let (cursor, segment) = match Identifier::consume(tokens, cursor) {
            Ok((next, ident)) => (next, UriSegment::Literal(ident)),
            Err(ident_err) => {
                trace!(error = %ident_err, "uri segment is not a literal");
                match ParamInUri::consume(tokens, cursor) {
                    Ok((next, param)) => (next, UriSegment::Param(param)),
                    Err(param_err) => return Err(deeper(ident_err, param_err)),
                }
            }
        };
        Ok((
            cursor,
            UriPathComponent {
                slash,
                segment,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for ParamInUri<'t> {
    const RULE: RuleKind = RuleKind::ParamInUri;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, dollar) =
            expect(tokens, start, Self::RULE, TokenKind::Dollar, ParseErrorKind::MissingDollar)?;
        let (cursor, name) = Identifier::consume(tokens, cursor)?;
        Ok((
            cursor,
            ParamInUri {
                dollar,
                name,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for Identifier<'t> {
    const RULE: RuleKind = RuleKind::Identifier;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        // first character must not be a digit
        match tokens.get(start) {
            Some(t) if matches!(t.kind, TokenKind::Letter | TokenKind::Underline) => {}
            _ => {
                return Err(ParseError::missing(
                    Self::RULE,
                    ParseErrorKind::MissingUnderlineOrChar,
                    tokens,
                    start,
                ))
            }
        }
        let mut cursor = start + 1;
        while tokens.get(cursor).is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Letter | TokenKind::Digit | TokenKind::Underline
            )
        }) {
            cursor += 1;
        }
        Ok((
            cursor,
            Identifier {
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

// ==================== Request / Response ====================

/// Shared shape of request and response blocks.
struct ExchangeParts<'t> {
    method: Method<'t>,
    keyword: &'t Token<'t>,
    lbrace: &'t Token<'t>,
    params: Vec<Param<'t>>,
    rbrace: &'t Token<'t>,
    start: usize,
    end: usize,
}

fn consume_exchange<'t>(
    tokens: &'t [Token<'t>],
    at: usize,
    rule: RuleKind,
    keyword_kind: TokenKind,
    missing_keyword: ParseErrorKind,
) -> Result<ExchangeParts<'t>, ParseError> {
    let start = skip_layout(tokens, at);
    let (cursor, method) = Method::consume(tokens, start)?;
    let (cursor, keyword) = expect(tokens, cursor, rule, keyword_kind, missing_keyword)?;
    let (cursor, lbrace) =
        expect(tokens, cursor, rule, TokenKind::LBrace, ParseErrorKind::MissingLBrace)?;
    let mut furthest = Furthest::default();
    let (cursor, params) = repeat::<Param>(tokens, cursor, &mut furthest);
    let (end, rbrace) =
        expect(tokens, cursor, rule, TokenKind::RBrace, ParseErrorKind::MissingRBrace)
            .map_err(|err| furthest.or(err))?;
    Ok(ExchangeParts {
        method,
        keyword,
        lbrace,
        params,
        rbrace,
        start,
        end,
    })
}

impl<'t> Context<'t> for Request<'t> {
    const RULE: RuleKind = RuleKind::Request;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let parts = consume_exchange(
            tokens,
            at,
            Self::RULE,
            TokenKind::Request,
            ParseErrorKind::MissingRequestKeyword,
        )?;
        Ok((
            parts.end,
            Request {
                method: parts.method,
                keyword: parts.keyword,
                lbrace: parts.lbrace,
                params: parts.params,
                rbrace: parts.rbrace,
                span: Span::new(tokens, parts.start, parts.end),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for Response<'t> {
    const RULE: RuleKind = RuleKind::Response;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let parts = consume_exchange(
            tokens,
            at,
            Self::RULE,
            TokenKind::Response,
            ParseErrorKind::MissingResponseKeyword,
        )?;
        Ok((
            parts.end,
            Response {
                method: parts.method,
                keyword: parts.keyword,
                lbrace: parts.lbrace,
                params: parts.params,
                rbrace: parts.rbrace,
                span: Span::new(tokens, parts.start, parts.end),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for Method<'t> {
    const RULE: RuleKind = RuleKind::Method;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let found = tokens
            .get(start)
            .and_then(|t| t.kind.http_method().map(|method| (t, method)));
        let Some((token, method)) = found else {
            return Err(ParseError::missing(
                Self::RULE,
                ParseErrorKind::MissingMethodKeyword,
                tokens,
                start,
            ));
        };
        Ok((
            start + 1,
            Method {
                token,
                method,
                span: Span::new(tokens, start, start + 1),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

// ==================== Params and types ====================

impl<'t> Context<'t> for Param<'t> {
    const RULE: RuleKind = RuleKind::Param;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, ty) = Type::consume(tokens, start)?;
        let (cursor, name) = Identifier::consume(tokens, cursor)?;
        let (cursor, assign) =
            expect(tokens, cursor, Self::RULE, TokenKind::Assign, ParseErrorKind::MissingAssign)?;
        let (cursor, key) = Identifier::consume(tokens, cursor)?;
        let (cursor, semicolon) = expect(
            tokens,
            cursor,
            Self::RULE,
            TokenKind::Semicolon,
            ParseErrorKind::MissingSemicolon,
        )?;
        Ok((
            cursor,
            Param {
                ty,
                name,
                assign,
                key,
                semicolon,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for Type<'t> {
    const RULE: RuleKind = RuleKind::Type;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, body) = match NonGenericType::consume(tokens, start) {
            Ok((next, plain)) => (next, TypeBody::NonGeneric(plain)),
            Err(plain_err) => {
                trace!(error = %plain_err, "type is not a plain type");
                match GenericType::consume(tokens, start) {
                    Ok((next, generic)) => (next, TypeBody::Generic(generic)),
                    Err(generic_err) => return Err(deeper(plain_err, generic_err)),
                }
            }
        };
        Ok((
            cursor,
            Type {
                body,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for NonGenericType<'t> {
    const RULE: RuleKind = RuleKind::NonGenericType;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, body) = match BaseType::consume(tokens, start) {
            Ok((next, base)) => (next, NonGenericBody::Base(base)),
            Err(base_err) => {
                trace!(error = %base_err, "type is not a base type");
                match Identifier::consume(tokens, start) {
                    Ok((next, custom)) => (next, NonGenericBody::Custom(custom)),
                    Err(custom_err) => return Err(deeper(base_err, custom_err)),
                }
            }
        };
        Ok((
            cursor,
            NonGenericType {
                body,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for BaseType<'t> {
    const RULE: RuleKind = RuleKind::BaseType;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let found = tokens
            .get(start)
            .and_then(|t| t.kind.scalar_type().map(|scalar| (t, scalar)));
        let Some((token, scalar)) = found else {
            return Err(ParseError::missing(
                Self::RULE,
                ParseErrorKind::MissingTypeKeyword,
                tokens,
                start,
            ));
        };
        Ok((
            start + 1,
            BaseType {
                token,
                scalar,
                span: Span::new(tokens, start, start + 1),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for GenericType<'t> {
    const RULE: RuleKind = RuleKind::GenericType;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, body) = match ArrayType::consume(tokens, start) {
            Ok((next, array)) => (next, GenericBody::Array(array)),
            Err(array_err) => {
                trace!(error = %array_err, "generic type is not an array");
                match DictType::consume(tokens, start) {
                    Ok((next, dict)) => (next, GenericBody::Dict(dict)),
                    Err(dict_err) => return Err(deeper(array_err, dict_err)),
                }
            }
        };
        Ok((
            cursor,
            GenericType {
                body,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for ArrayType<'t> {
    const RULE: RuleKind = RuleKind::ArrayType;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, keyword) = expect(
            tokens,
            start,
            Self::RULE,
            TokenKind::Array,
            ParseErrorKind::MissingArrayKeyword,
        )?;
        let (cursor, langle) =
            expect(tokens, cursor, Self::RULE, TokenKind::LAngle, ParseErrorKind::MissingLAngle)?;
        let (cursor, element) = NonGenericType::consume(tokens, cursor)?;
        let (cursor, rangle) =
            expect(tokens, cursor, Self::RULE, TokenKind::RAngle, ParseErrorKind::MissingRAngle)?;
        Ok((
            cursor,
            ArrayType {
                keyword,
                langle,
                element,
                rangle,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}

impl<'t> Context<'t> for DictType<'t> {
    const RULE: RuleKind = RuleKind::DictType;

    fn consume(tokens: &'t [Token<'t>], at: usize) -> Result<(usize, Self), ParseError> {
        let start = skip_layout(tokens, at);
        let (cursor, keyword) = expect(
            tokens,
            start,
            Self::RULE,
            TokenKind::Dict,
            ParseErrorKind::MissingDictKeyword,
        )?;
        let (cursor, langle) =
            expect(tokens, cursor, Self::RULE, TokenKind::LAngle, ParseErrorKind::MissingLAngle)?;
        let (cursor, key) = NonGenericType::consume(tokens, cursor)?;
        let (cursor, comma) =
            expect(tokens, cursor, Self::RULE, TokenKind::Comma, ParseErrorKind::MissingComma)?;
        let (cursor, value) = NonGenericType::consume(tokens, cursor)?;
        let (cursor, rangle) =
            expect(tokens, cursor, Self::RULE, TokenKind::RAngle, ParseErrorKind::MissingRAngle)?;
        Ok((
            cursor,
            DictType {
                keyword,
                langle,
                key,
                comma,
                value,
                rangle,
                span: Span::new(tokens, start, cursor),
            },
        ))
    }

    fn span(&self) -> Span<'t> {
        self.span
    }
}
