//! Document types and name resolution.
//!
//! A docset buckets its entries by a closed set of types (the Dash entry-type
//! list). Directory names under the documentation root pick the type of the
//! pages inside them; files directly in the root get the configured default.
//!
//! Resolution is ASCII case-insensitive and always yields the canonical
//! spelling, so `docs/guide/` and `docs/Guide/` both land in the `Guide`
//! bucket and the `Guide/` output directory.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! document_types {
    ($($variant:ident),+ $(,)?) => {
        /// One of the recognized docset entry types.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum DocumentType {
            $($variant),+
        }

        impl DocumentType {
            /// Every type, in declaration order.
            pub const ALL: &'static [DocumentType] = &[$(DocumentType::$variant),+];

            /// Canonical name, used for output directories and index keys.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(DocumentType::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

document_types![
    Annotation, Attribute, Binding, Builtin, Callback, Category, Class, Command,
    Component, Constant, Constructor, Define, Delegate, Diagram, Directive, Element,
    Entry, Enum, Environment, Error, Event, Exception, Extension, Field, File, Filter,
    Framework, Function, Global, Guide, Hook, Instance, Instruction, Interface, Keyword,
    Library, Literal, Macro, Method, Mixin, Modifier, Module, Namespace, Notation,
    Object, Operator, Option, Package, Parameter, Plugin, Procedure, Property,
    Protocol, Provider, Provisioner, Query, Record, Resource, Sample, Section, Service,
    Setting, Shortcut, Statement, Struct, Style, Subroutine, Tag, Test, Trait, Type,
    Union, Value, Variable, Word,
];

impl DocumentType {
    /// Look a name up in the closed set.
    pub fn from_name(name: &str) -> Option<DocumentType> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a directory name (or the default) to a type.
///
/// `Unresolved` keeps the name that failed so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Known(DocumentType),
    Unresolved(String),
}

impl ResolvedType {
    pub fn known(&self) -> Option<DocumentType> {
        match self {
            ResolvedType::Known(t) => Some(*t),
            ResolvedType::Unresolved(_) => None,
        }
    }
}

/// Resolve `candidate`, or `default` when no candidate is given.
///
/// An empty candidate counts as absent.
pub fn resolve(candidate: Option<&str>, default: &str) -> ResolvedType {
    let name = candidate.filter(|c| !c.trim().is_empty()).unwrap_or(default);
    match DocumentType::from_name(name) {
        Some(t) => ResolvedType::Known(t),
        None => ResolvedType::Unresolved(name.to_string()),
    }
}
