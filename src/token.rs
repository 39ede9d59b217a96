//! Tokens and the lexical rule table.

use crate::lexer::LexerBuildError;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

/// Classification of a recognized lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // keywords
    Message,
    Struct,
    Request,
    Response,
    // methods
    Get,
    Post,
    Put,
    Delete,
    Patch,
    // type names
    Int32,
    Int64,
    Bool,
    Double,
    String,
    File,
    Blob,
    Array,
    Dict,
    // punctuation
    LBrace,
    RBrace,
    LAngle,
    RAngle,
    Assign,
    Dollar,
    Comma,
    Semicolon,
    Slash,
    Underline,
    // single-character fragments
    Letter,
    Digit,
    Whitespace,
    Newline,
    /// End of input. Appended by the lexer, never produced by a rule.
    Eof,
}

/// Lexer groups used when the automaton is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenCategory {
    Keyword,
    Method,
    TypeName,
    Punctuation,
    Fragment,
    End,
}

impl TokenKind {
    pub fn category(self) -> TokenCategory {
        use TokenKind::*;
        match self {
            Message | Struct | Request | Response => TokenCategory::Keyword,
            Get | Post | Put | Delete | Patch => TokenCategory::Method,
            Int32 | Int64 | Bool | Double | String | File | Blob | Array | Dict => {
                TokenCategory::TypeName
            }
            LBrace | RBrace | LAngle | RAngle | Assign | Dollar | Comma | Semicolon | Slash
            | Underline => TokenCategory::Punctuation,
            Letter | Digit | Whitespace | Newline => TokenCategory::Fragment,
            Eof => TokenCategory::End,
        }
    }

    /// Insignificant layout skipped at the start of every grammar rule.
    pub fn is_layout(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    pub fn http_method(self) -> Option<HttpMethod> {
        match self {
            TokenKind::Get => Some(HttpMethod::Get),
            TokenKind::Post => Some(HttpMethod::Post),
            TokenKind::Put => Some(HttpMethod::Put),
            TokenKind::Delete => Some(HttpMethod::Delete),
            TokenKind::Patch => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn scalar_type(self) -> Option<ScalarType> {
        match self {
            TokenKind::Int32 => Some(ScalarType::Int32),
            TokenKind::Int64 => Some(ScalarType::Int64),
            TokenKind::Bool => Some(ScalarType::Bool),
            TokenKind::Double => Some(ScalarType::Double),
            TokenKind::String => Some(ScalarType::String),
            TokenKind::File => Some(ScalarType::File),
            TokenKind::Blob => Some(ScalarType::Blob),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Message => "MESSAGE",
            TokenKind::Struct => "STRUCT",
            TokenKind::Request => "REQUEST",
            TokenKind::Response => "RESPONSE",
            TokenKind::Get => "GET",
            TokenKind::Post => "POST",
            TokenKind::Put => "PUT",
            TokenKind::Delete => "DELETE",
            TokenKind::Patch => "PATCH",
            TokenKind::Int32 => "INT32",
            TokenKind::Int64 => "INT64",
            TokenKind::Bool => "BOOL",
            TokenKind::Double => "DOUBLE",
            TokenKind::String => "STRING",
            TokenKind::File => "FILE",
            TokenKind::Blob => "BLOB",
            TokenKind::Array => "ARRAY",
            TokenKind::Dict => "DICT",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::Dollar => "'$'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Slash => "'/'",
            TokenKind::Underline => "'_'",
            TokenKind::Letter => "letter",
            TokenKind::Digit => "digit",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// HTTP verb bound to a request or response block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in scalar parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int32,
    Int64,
    Bool,
    Double,
    String,
    File,
    Blob,
}

impl ScalarType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Int32 => "INT32",
            ScalarType::Int64 => "INT64",
            ScalarType::Bool => "BOOL",
            ScalarType::Double => "DOUBLE",
            ScalarType::String => "STRING",
            ScalarType::File => "FILE",
            ScalarType::Blob => "BLOB",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognized lexeme. `span` is a byte range into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'s> {
    pub text: &'s str,
    pub span: Range<usize>,
    pub kind: TokenKind,
}

impl<'s> Token<'s> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Concatenate the lexemes of `tokens`.
pub fn concat_text(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect()
}

/// A lexeme bound to the kind it is classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRule {
    pub lexeme: String,
    pub kind: TokenKind,
}

impl LexicalRule {
    pub fn new(lexeme: impl Into<String>, kind: TokenKind) -> Self {
        LexicalRule {
            lexeme: lexeme.into(),
            kind,
        }
    }
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("MESSAGE", TokenKind::Message),
    ("STRUCT", TokenKind::Struct),
    ("REQUEST", TokenKind::Request),
    ("RESPONSE", TokenKind::Response),
    ("GET", TokenKind::Get),
    ("POST", TokenKind::Post),
    ("PUT", TokenKind::Put),
    ("DELETE", TokenKind::Delete),
    ("PATCH", TokenKind::Patch),
    ("INT32", TokenKind::Int32),
    ("INT64", TokenKind::Int64),
    ("BOOL", TokenKind::Bool),
    ("DOUBLE", TokenKind::Double),
    ("STRING", TokenKind::String),
    ("FILE", TokenKind::File),
    ("BLOB", TokenKind::Blob),
    ("ARRAY", TokenKind::Array),
    ("DICT", TokenKind::Dict),
];

const PUNCTUATION: &[(char, TokenKind)] = &[
    ('{', TokenKind::LBrace),
    ('}', TokenKind::RBrace),
    ('<', TokenKind::LAngle),
    ('>', TokenKind::RAngle),
    ('=', TokenKind::Assign),
    ('$', TokenKind::Dollar),
    (',', TokenKind::Comma),
    (';', TokenKind::Semicolon),
    ('/', TokenKind::Slash),
    ('_', TokenKind::Underline),
];

/// Validated lexical rule table: every lexeme is non-empty and registered once.
#[derive(Debug, Clone)]
pub struct LexicalRules {
    rules: Vec<LexicalRule>,
    by_lexeme: HashMap<String, TokenKind>,
}

impl LexicalRules {
    /// Validate a custom table. Duplicate or empty lexemes, and lexemes bound to
    /// [`TokenKind::Eof`], are configuration errors.
    pub fn new<I>(rules: I) -> Result<Self, LexerBuildError>
    where
        I: IntoIterator<Item = LexicalRule>,
    {
        let mut table = LexicalRules {
            rules: Vec::new(),
            by_lexeme: HashMap::new(),
        };
        for rule in rules {
            if rule.lexeme.is_empty() {
                return Err(LexerBuildError::EmptyLexeme { kind: rule.kind });
            }
            if rule.kind == TokenKind::Eof {
                return Err(LexerBuildError::ReservedKind { lexeme: rule.lexeme });
            }
            if let Some(&first) = table.by_lexeme.get(&rule.lexeme) {
                return Err(LexerBuildError::DuplicateLexeme {
                    lexeme: rule.lexeme,
                    first,
                    second: rule.kind,
                });
            }
            table.by_lexeme.insert(rule.lexeme.clone(), rule.kind);
            table.rules.push(rule);
        }
        Ok(table)
    }

    /// The IDL's built-in table: keywords, methods, type names, punctuation, the 52
    /// ASCII letters, the 10 digits, and the layout characters.
    pub fn standard() -> Self {
        let keywords = KEYWORDS
            .iter()
            .map(|&(lexeme, kind)| LexicalRule::new(lexeme, kind));
        let punctuation = PUNCTUATION
            .iter()
            .map(|&(c, kind)| LexicalRule::new(c, kind));
        let letters = ('a'..='z')
            .chain('A'..='Z')
            .map(|c| LexicalRule::new(c, TokenKind::Letter));
        let digits = ('0'..='9').map(|c| LexicalRule::new(c, TokenKind::Digit));
        let layout = [' ', '\t', '\r']
            .into_iter()
            .map(|c| LexicalRule::new(c, TokenKind::Whitespace))
            .chain(std::iter::once(LexicalRule::new('\n', TokenKind::Newline)));
        let rules: Vec<LexicalRule> = keywords
            .chain(punctuation)
            .chain(letters)
            .chain(digits)
            .chain(layout)
            .collect();
        let by_lexeme = rules
            .iter()
            .map(|rule| (rule.lexeme.clone(), rule.kind))
            .collect();
        LexicalRules { rules, by_lexeme }
    }

    pub fn rules(&self) -> &[LexicalRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Kind a recognized lexeme is bound to.
    pub fn classify(&self, lexeme: &str) -> Option<TokenKind> {
        self.by_lexeme.get(lexeme).copied()
    }
}

impl Default for LexicalRules {
    fn default() -> Self {
        LexicalRules::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_size() {
        // 4 keywords + 5 methods + 9 type names + 10 punctuation + 52 letters + 10 digits + 4 layout
        let rules = LexicalRules::standard();
        assert_eq!(rules.len(), 94);
        assert!(LexicalRules::new(rules.rules().iter().cloned()).is_ok());
    }

    #[test]
    fn classify_lexemes() {
        let rules = LexicalRules::standard();
        assert_eq!(rules.classify("MESSAGE"), Some(TokenKind::Message));
        assert_eq!(rules.classify("M"), Some(TokenKind::Letter));
        assert_eq!(rules.classify("7"), Some(TokenKind::Digit));
        assert_eq!(rules.classify("\t"), Some(TokenKind::Whitespace));
        assert_eq!(rules.classify("\n"), Some(TokenKind::Newline));
        assert_eq!(rules.classify("_"), Some(TokenKind::Underline));
        assert_eq!(rules.classify("MESSAG"), None);
    }

    #[test]
    fn duplicate_lexeme_rejected() {
        let err = LexicalRules::new([
            LexicalRule::new("=", TokenKind::Assign),
            LexicalRule::new("=", TokenKind::Assign),
        ])
        .unwrap_err();
        assert!(matches!(err, LexerBuildError::DuplicateLexeme { ref lexeme, .. } if lexeme == "="));
    }

    #[test]
    fn empty_lexeme_rejected() {
        let err = LexicalRules::new([LexicalRule::new("", TokenKind::Letter)]).unwrap_err();
        assert!(matches!(err, LexerBuildError::EmptyLexeme { .. }));
    }

    #[test]
    fn eof_kind_rejected() {
        let standard = LexicalRules::standard();
        let rules = standard
            .rules()
            .iter()
            .cloned()
            .chain(std::iter::once(LexicalRule::new("!", TokenKind::Eof)));
        let err = LexicalRules::new(rules).unwrap_err();
        assert_eq!(err, LexerBuildError::ReservedKind { lexeme: "!".into() });
    }

    #[test]
    fn kind_projections() {
        assert_eq!(TokenKind::Patch.http_method(), Some(HttpMethod::Patch));
        assert_eq!(TokenKind::Array.scalar_type(), None);
        assert_eq!(TokenKind::Blob.scalar_type(), Some(ScalarType::Blob));
        assert_eq!(TokenKind::Dict.category(), TokenCategory::TypeName);
        assert!(TokenKind::Newline.is_layout());
        assert!(!TokenKind::Underline.is_layout());
    }
}
