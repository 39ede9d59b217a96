//! Owned, span-free view of a parsed document.
//!
//! Lowering keeps declaration order and performs no semantic checks: duplicate
//! names, unknown custom types and conflicting keys are left to later phases.

use crate::cst::{self, Exchange as CstExchange, GenericBody, NonGenericBody, TypeBody, UriSegment};
use crate::token::{HttpMethod, ScalarType};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub messages: Vec<Message>,
    pub structs: Vec<Struct>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub path: Vec<PathSegment>,
    pub requests: Vec<Exchange>,
    pub responses: Vec<Exchange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    Param(String),
}

/// One request or response block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub method: HttpMethod,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: String,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(ScalarType),
    /// Reference to a struct by name (not resolved).
    Custom(String),
    Array(Box<TypeRef>),
    Dict(Box<TypeRef>, Box<TypeRef>),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(s) => write!(f, "{}", s),
            TypeRef::Custom(name) => f.write_str(name),
            TypeRef::Array(elem) => write!(f, "ARRAY<{}>", elem),
            TypeRef::Dict(k, v) => write!(f, "DICT<{}, {}>", k, v),
        }
    }
}

impl Document {
    pub fn from_entry(entry: &cst::Entry<'_>) -> Self {
        let mut doc = Document::default();
        for decl in &entry.declarations {
            match decl {
                cst::Declaration::Message(m) => doc.messages.push(Message::from_cst(m)),
                cst::Declaration::Struct(s) => doc.structs.push(Struct::from_cst(s)),
            }
        }
        doc
    }

    pub fn get_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }
}

impl Message {
    fn from_cst(m: &cst::Message<'_>) -> Self {
        let path = m
            .uri
            .components
            .iter()
            .map(|c| match &c.segment {
                UriSegment::Literal(ident) => PathSegment::Literal(ident.name()),
                UriSegment::Param(p) => PathSegment::Param(p.name.name()),
            })
            .collect();
        let mut requests = Vec::new();
        let mut responses = Vec::new();
        for exchange in &m.exchanges {
            match exchange {
                CstExchange::Request(r) => requests.push(Exchange {
                    method: r.method.method,
                    params: lower_params(&r.params),
                }),
                CstExchange::Response(r) => responses.push(Exchange {
                    method: r.method.method,
                    params: lower_params(&r.params),
                }),
            }
        }
        Message {
            path,
            requests,
            responses,
        }
    }

    /// Path with parameters in braces, e.g. `/users/{id}`. An empty URI renders as `/`.
    pub fn uri_template(&self) -> String {
        if self.path.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.path {
            out.push('/');
            match segment {
                PathSegment::Literal(s) => out.push_str(s),
                PathSegment::Param(s) => {
                    out.push('{');
                    out.push_str(s);
                    out.push('}');
                }
            }
        }
        out
    }

    /// Names of the `$` parameters, in path order.
    pub fn path_params(&self) -> impl Iterator<Item = &str> {
        self.path.iter().filter_map(|s| match s {
            PathSegment::Param(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

impl Struct {
    fn from_cst(s: &cst::Struct<'_>) -> Self {
        Struct {
            name: s.name.name(),
            params: lower_params(&s.params),
        }
    }
}

fn lower_params(params: &[cst::Param<'_>]) -> Vec<Param> {
    params
        .iter()
        .map(|p| Param {
            ty: lower_type(&p.ty),
            name: p.name.name(),
            key: p.key.name(),
        })
        .collect()
}

fn lower_type(ty: &cst::Type<'_>) -> TypeRef {
    match &ty.body {
        TypeBody::NonGeneric(t) => lower_non_generic(t),
        TypeBody::Generic(g) => match &g.body {
            GenericBody::Array(a) => TypeRef::Array(Box::new(lower_non_generic(&a.element))),
            GenericBody::Dict(d) => TypeRef::Dict(
                Box::new(lower_non_generic(&d.key)),
                Box::new(lower_non_generic(&d.value)),
            ),
        },
    }
}

fn lower_non_generic(t: &cst::NonGenericType<'_>) -> TypeRef {
    match &t.body {
        NonGenericBody::Base(b) => TypeRef::Scalar(b.scalar),
        NonGenericBody::Custom(ident) => TypeRef::Custom(ident.name()),
    }
}
