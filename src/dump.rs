//! Plain-text renderings of token streams and syntax trees, used by `parse_idl`
//! and by tests that compare trees structurally.

use crate::cst::*;
use crate::token::Token;
use std::fmt::Write;

/// One token per line: kind, byte span and the escaped lexeme.
pub fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for t in tokens {
        let _ = writeln!(
            out,
            "{:<12} {:>5}..{:<5} {:?}",
            format!("{:?}", t.kind),
            t.span.start,
            t.span.end,
            t.text
        );
    }
    out
}

/// Indented rule outline. Leaves show their text; offsets and layout are omitted,
/// so two trees parsed from differently formatted sources render the same.
pub fn render_tree(entry: &Entry<'_>) -> String {
    let mut w = TreeWriter::default();
    w.open(RuleKind::Entry);
    for decl in &entry.declarations {
        match decl {
            Declaration::Message(m) => w.message(m),
            Declaration::Struct(s) => w.structure(s),
        }
    }
    w.close();
    w.out
}

#[derive(Default)]
struct TreeWriter {
    out: String,
    depth: usize,
}

impl TreeWriter {
    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        let _ = self.out.write_fmt(text);
        self.out.push('\n');
    }

    fn open(&mut self, rule: RuleKind) {
        self.line(format_args!("{}", rule));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
    }

    fn leaf(&mut self, rule: RuleKind, text: &str) {
        self.line(format_args!("{} {:?}", rule, text));
    }

    fn message(&mut self, m: &Message<'_>) {
        self.open(RuleKind::Message);
        self.open(RuleKind::Uri);
        for c in &m.uri.components {
            self.open(RuleKind::UriPathComponent);
            match &c.segment {
                UriSegment::Literal(ident) => self.leaf(RuleKind::Identifier, &ident.name()),
                UriSegment::Param(p) => {
                    self.open(RuleKind::ParamInUri);
                    self.leaf(RuleKind::Identifier, &p.name.name());
                    self.close();
                }
            }
            self.close();
        }
        self.close();
        for exchange in &m.exchanges {
            match exchange {
                Exchange::Request(r) => self.exchange(RuleKind::Request, &r.method, &r.params),
                Exchange::Response(r) => self.exchange(RuleKind::Response, &r.method, &r.params),
            }
        }
        self.close();
    }

    fn exchange(&mut self, rule: RuleKind, method: &Method<'_>, params: &[Param<'_>]) {
        self.open(rule);
        self.leaf(RuleKind::Method, method.method.as_str());
        self.params(params);
        self.close();
    }

    fn structure(&mut self, s: &Struct<'_>) {
        self.open(RuleKind::Struct);
        self.leaf(RuleKind::Identifier, &s.name.name());
        self.params(&s.params);
        self.close();
    }

    fn params(&mut self, params: &[Param<'_>]) {
        for p in params {
            self.open(RuleKind::Param);
            self.ty(&p.ty);
            self.leaf(RuleKind::Identifier, &p.name.name());
            self.leaf(RuleKind::Identifier, &p.key.name());
            self.close();
        }
    }

    fn ty(&mut self, t: &Type<'_>) {
        self.open(RuleKind::Type);
        match &t.body {
            TypeBody::NonGeneric(n) => self.non_generic(n),
            TypeBody::Generic(g) => {
                self.open(RuleKind::GenericType);
                match &g.body {
                    GenericBody::Array(a) => {
                        self.open(RuleKind::ArrayType);
                        self.non_generic(&a.element);
                        self.close();
                    }
                    GenericBody::Dict(d) => {
                        self.open(RuleKind::DictType);
                        self.non_generic(&d.key);
                        self.non_generic(&d.value);
                        self.close();
                    }
                }
                self.close();
            }
        }
        self.close();
    }

    fn non_generic(&mut self, n: &NonGenericType<'_>) {
        self.open(RuleKind::NonGenericType);
        match &n.body {
            NonGenericBody::Base(b) => self.leaf(RuleKind::BaseType, b.scalar.as_str()),
            NonGenericBody::Custom(ident) => self.leaf(RuleKind::Identifier, &ident.name()),
        }
        self.close();
    }
}
