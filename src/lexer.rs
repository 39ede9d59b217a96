//! Maximal-munch lexer over a merged trie automaton.
//!
//! The automaton is assembled from one trie per token category, merged into a single
//! root. Scanning walks it one character at a time and remembers the last position
//! at which a complete lexeme ended; when the walk cannot continue, the longest
//! complete lexeme is emitted and scanning restarts right after it.

use crate::token::{LexicalRules, Token, TokenCategory, TokenKind};
use crate::trie::{NodeId, Trie};
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

/// Scanning failure. Scanning stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unrecognized input at offset {offset}")]
    UnrecognizedInput { offset: usize },
}

impl LexError {
    /// Byte offset into the source.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnrecognizedInput { offset } => *offset,
        }
    }
}

/// Rejected lexical rule table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerBuildError {
    #[error("lexeme {lexeme:?} registered twice (as {first} and as {second})")]
    DuplicateLexeme {
        lexeme: String,
        first: TokenKind,
        second: TokenKind,
    },
    #[error("empty lexeme registered for {kind}")]
    EmptyLexeme { kind: TokenKind },
    #[error("lexeme {lexeme:?} bound to end of input, which only the lexer emits")]
    ReservedKind { lexeme: String },
    #[error("rule tries for {category:?} do not share the automaton root")]
    Merge { category: TokenCategory },
}

/// Outcome of [`Lexer::recognize`]: the tokens matched so far and, if scanning
/// stopped early, why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition<'s> {
    pub tokens: Vec<Token<'s>>,
    pub error: Option<LexError>,
}

impl<'s> Recognition<'s> {
    /// Whether the whole input was consumed.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Vec<Token<'s>>, LexError> {
        match self.error {
            None => Ok(self.tokens),
            Some(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    trie: Trie,
    rules: LexicalRules,
}

impl Default for Lexer {
    /// Lexer over [`LexicalRules::standard`]. Building it cannot fail: every
    /// category trie starts from a fresh root, and merge only rejects differing roots.
    fn default() -> Self {
        Lexer::new(LexicalRules::standard()).expect("built-in lexical rules share one root")
    }
}

impl Lexer {
    /// Build the automaton for a validated rule table.
    pub fn new(rules: LexicalRules) -> Result<Self, LexerBuildError> {
        let mut groups: BTreeMap<TokenCategory, Trie> = BTreeMap::new();
        for rule in rules.rules() {
            groups
                .entry(rule.kind.category())
                .or_default()
                .insert(&rule.lexeme);
        }
        let mut trie = Trie::new();
        for (category, group) in &groups {
            trie = Trie::merge(&trie, group).ok_or(LexerBuildError::Merge {
                category: *category,
            })?;
        }
        debug!(
            rules = rules.len(),
            categories = groups.len(),
            nodes = trie.len(),
            "lexer automaton built"
        );
        Ok(Lexer { trie, rules })
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn rules(&self) -> &LexicalRules {
        &self.rules
    }

    /// Scan `source` left to right with longest-match semantics.
    ///
    /// On success the token list ends with an [`TokenKind::Eof`] token. On failure
    /// it holds every token recognized before the offending offset and no `Eof`.
    pub fn recognize<'s>(&self, source: &'s str) -> Recognition<'s> {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        let offset_of = |i: usize| chars.get(i).map_or(source.len(), |&(offset, _)| offset);
        let mut tokens = Vec::new();

        let mut cursor = 0;
        let mut working: NodeId = Trie::ROOT;
        let mut match_start: Option<usize> = None;
        let mut last_accept: Option<usize> = None;

        while cursor < chars.len() {
            let (offset, c) = chars[cursor];
            if self.trie.has_terminal_child(working) {
                last_accept = Some(cursor);
            }
            if let Some(next) = self.trie.child(working, c) {
                let start = *match_start.get_or_insert(cursor);
                cursor += 1;
                working = next;
                if cursor == chars.len() {
                    // a trailing partial lexeme is not backtracked
                    if !self.trie.has_terminal_child(working) {
                        return self.stop(tokens, offset_of(start));
                    }
                    match self.token(source, offset_of(start)..source.len()) {
                        Some(token) => tokens.push(token),
                        None => return self.stop(tokens, offset_of(start)),
                    }
                }
            } else if let (Some(end), Some(start)) = (last_accept, match_start) {
                match self.token(source, offset_of(start)..offset_of(end)) {
                    Some(token) => tokens.push(token),
                    None => return self.stop(tokens, offset_of(start)),
                }
                cursor = end;
                working = Trie::ROOT;
                match_start = None;
                last_accept = None;
            } else {
                return self.stop(tokens, offset);
            }
        }

        tokens.push(Token {
            text: "",
            span: source.len()..source.len(),
            kind: TokenKind::Eof,
        });
        debug!(tokens = tokens.len(), bytes = source.len(), "recognition complete");
        Recognition {
            tokens,
            error: None,
        }
    }

    /// Like [`Lexer::recognize`] but discards the partial token list on failure.
    pub fn tokenize<'s>(&self, source: &'s str) -> Result<Vec<Token<'s>>, LexError> {
        self.recognize(source).into_result()
    }

    fn token<'s>(&self, source: &'s str, span: Range<usize>) -> Option<Token<'s>> {
        let text = &source[span.clone()];
        let kind = self.rules.classify(text)?;
        Some(Token { text, span, kind })
    }

    fn stop<'s>(&self, tokens: Vec<Token<'s>>, offset: usize) -> Recognition<'s> {
        debug!(offset, recognized = tokens.len(), "recognition stopped");
        Recognition {
            tokens,
            error: Some(LexError::UnrecognizedInput { offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LexicalRule;

    fn texts<'s>(tokens: &[Token<'s>]) -> Vec<&'s str> {
        tokens.iter().map(|t| t.text).collect()
    }

    fn custom(lexemes: &[&str]) -> Lexer {
        let rules = LexicalRules::new(
            lexemes
                .iter()
                .map(|&lexeme| LexicalRule::new(lexeme, TokenKind::Letter)),
        )
        .expect("rules");
        Lexer::new(rules).expect("lexer")
    }

    #[test]
    fn default_lexer_covers_standard_table() {
        let built = Lexer::new(LexicalRules::standard()).expect("standard table builds");
        let lexer = Lexer::default();
        assert_eq!(lexer.trie().len(), built.trie().len());
        for rule in lexer.rules().rules() {
            assert!(lexer.trie().contains(&rule.lexeme), "missing {:?}", rule.lexeme);
        }
    }

    #[test]
    fn keyword_wins_over_letters() {
        let tokens = Lexer::default().tokenize("MESSAGE").expect("lex");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Message);
        assert_eq!(tokens[0].span, 0..7);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
        assert_eq!(tokens[1].span, 7..7);
    }

    #[test]
    fn longest_match_backtracks_then_fails() {
        let recognition = custom(&["m", "me"]).recognize("med");
        assert!(!recognition.is_complete());
        assert_eq!(texts(&recognition.tokens), vec!["me"]);
        assert_eq!(recognition.error, Some(LexError::UnrecognizedInput { offset: 2 }));
    }

    #[test]
    fn longest_match_backtracks_then_continues() {
        let tokens = custom(&["m", "me", "d"]).tokenize("med").expect("lex");
        assert_eq!(texts(&tokens), vec!["me", "d", ""]);
    }

    #[test]
    fn abandoned_longer_path_rewinds() {
        // "abc" is started but never finished; "a" is emitted and "b" rescanned
        let tokens = custom(&["a", "abc", "b", "d"]).tokenize("abd").expect("lex");
        assert_eq!(texts(&tokens), vec!["a", "b", "d", ""]);
    }

    #[test]
    fn keyword_prefix_inside_identifier() {
        let tokens = Lexer::default().tokenize("GETTER").expect("lex");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Get,
                TokenKind::Letter,
                TokenKind::Letter,
                TokenKind::Letter,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn generic_type_tokens() {
        let tokens = Lexer::default().tokenize("DICT<INT64,_a1>").expect("lex");
        assert_eq!(
            texts(&tokens),
            vec!["DICT", "<", "INT64", ",", "_", "a", "1", ">", ""]
        );
    }

    #[test]
    fn trailing_partial_keyword_fails() {
        let recognition = Lexer::default().recognize("x INT3");
        assert_eq!(texts(&recognition.tokens), vec!["x", " "]);
        assert_eq!(recognition.error, Some(LexError::UnrecognizedInput { offset: 2 }));
    }

    #[test]
    fn unknown_character_fails_at_its_offset() {
        let recognition = Lexer::default().recognize("ab#c");
        assert_eq!(texts(&recognition.tokens), vec!["a", "b"]);
        assert_eq!(recognition.error.map(|e| e.offset()), Some(2));
    }

    #[test]
    fn empty_source_is_only_eof() {
        let tokens = Lexer::default().tokenize("").expect("lex");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn spans_cover_source_exactly() {
        let source = "STRUCT Foo {\n\tINT32 a = b;\n}\n";
        let tokens = Lexer::default().tokenize(source).expect("lex");
        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(token.span.start, expected_start);
            assert_eq!(&source[token.span.clone()], token.text);
            expected_start = token.span.end;
        }
        assert_eq!(expected_start, source.len());
        assert_eq!(crate::token::concat_text(&tokens), source);
    }

    #[test]
    fn standard_automaton_accepts_every_rule() {
        let lexer = Lexer::default();
        for rule in lexer.rules().rules() {
            assert!(lexer.trie().contains(&rule.lexeme), "{:?}", rule.lexeme);
        }
        assert_eq!(lexer.trie().lexemes().len(), lexer.rules().len());
    }
}
