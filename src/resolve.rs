//! Relationship resolver: direct classification first, shortest path second.

use serde::Serialize;
use thiserror::Error;

use crate::graph::{classify_with_rule, label_path, shortest_path, EdgeKind, EdgeLabel, FamilyGraph, RelationKind};
use crate::i18n::{Locale, Message};
use crate::person::Person;

/// Failure category of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputError,
    LookupError,
    NoRelationFound,
}

/// Expected, recoverable resolution failures. Never a fault of the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Missing names or self-comparison
    #[error("{message}")]
    Input { message: String },

    /// A name or id that matches nobody
    #[error("{message}: {query}")]
    Lookup { query: String, message: String },

    /// Both persons exist but no path connects them
    #[error("{message}")]
    NoRelationFound {
        person1: String,
        person2: String,
        message: String,
    },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::Input { .. } => ErrorKind::InputError,
            ResolveError::Lookup { .. } => ErrorKind::LookupError,
            ResolveError::NoRelationFound { .. } => ErrorKind::NoRelationFound,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ResolveError::Input { message }
            | ResolveError::Lookup { message, .. }
            | ResolveError::NoRelationFound { message, .. } => message,
        }
    }
}

/// A named direct relation: `person1` is `relation` of `person2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleRelation {
    pub kind: RelationKind,
    pub relation: String,
    pub person1: String,
    pub person2: String,
}

/// One person along a connecting path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNode {
    pub id: String,
    pub name: String,
}

/// A connecting path with one label per hop.
///
/// `edge_kinds` carries the coarse token of each hop (`parent`, `child`, `spouse`,
/// `sibling`, `kin`); `edges` keeps the gendered label it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexRelation {
    pub path: Vec<PathNode>,
    pub edges: Vec<EdgeLabel>,
    pub edge_kinds: Vec<EdgeKind>,
    pub relationships: Vec<String>,
    pub person1: String,
    pub person2: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Simple(SimpleRelation),
    Complex(ComplexRelation),
}

/// Error shape of a [`ResolutionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person2: Option<String>,
}

/// Tagged result handed to presentation layers (`type`: simple / complex / error).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionReport {
    Simple(SimpleRelation),
    Complex(ComplexRelation),
    Error(ErrorReport),
}

impl From<Result<Resolution, ResolveError>> for ResolutionReport {
    fn from(result: Result<Resolution, ResolveError>) -> Self {
        match result {
            Ok(Resolution::Simple(simple)) => ResolutionReport::Simple(simple),
            Ok(Resolution::Complex(complex)) => ResolutionReport::Complex(complex),
            Err(err) => {
                let (person1, person2) = match &err {
                    ResolveError::NoRelationFound { person1, person2, .. } => {
                        (Some(person1.clone()), Some(person2.clone()))
                    }
                    _ => (None, None),
                };
                ResolutionReport::Error(ErrorReport {
                    kind: err.kind(),
                    message: err.message().to_string(),
                    person1,
                    person2,
                })
            }
        }
    }
}

/// Resolves relationships against one graph snapshot.
pub struct Resolver<'g> {
    graph: &'g FamilyGraph,
    locale: Locale,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g FamilyGraph) -> Self {
        Self {
            graph,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Resolve by exact full name. Ambiguous names resolve to the first match.
    pub fn resolve(&self, name1: &str, name2: &str) -> Result<Resolution, ResolveError> {
        self.ensure_both(name1, name2)?;
        let p1 = self.lookup(name1, self.graph.find_by_name(name1))?;
        let p2 = self.lookup(name2, self.graph.find_by_name(name2))?;
        self.resolve_persons(p1, p2)
    }

    /// Resolve by person id.
    pub fn resolve_ids(&self, id1: &str, id2: &str) -> Result<Resolution, ResolveError> {
        self.ensure_both(id1, id2)?;
        let p1 = self.lookup(id1, self.graph.person(id1))?;
        let p2 = self.lookup(id2, self.graph.person(id2))?;
        self.resolve_persons(p1, p2)
    }

    /// Resolve two already-looked-up records.
    pub fn resolve_persons(&self, p1: &Person, p2: &Person) -> Result<Resolution, ResolveError> {
        if p1.id == p2.id {
            return Err(ResolveError::Input {
                message: self.locale.message(Message::SelfComparison).to_string(),
            });
        }

        if let Some((rule, kind)) = classify_with_rule(p1, p2, self.graph) {
            log::debug!("Rule '{}' matched {} -> {}: {}", rule, p1.id, p2.id, kind);
            return Ok(Resolution::Simple(SimpleRelation {
                kind,
                relation: self.locale.relation(kind).to_string(),
                person1: p1.full_name.clone(),
                person2: p2.full_name.clone(),
            }));
        }

        let Some(ids) = shortest_path(self.graph, &p1.id, &p2.id) else {
            log::debug!("No connecting path between {} and {}", p1.id, p2.id);
            return Err(ResolveError::NoRelationFound {
                person1: p1.full_name.clone(),
                person2: p2.full_name.clone(),
                message: self.locale.message(Message::NoRelation).to_string(),
            });
        };

        let edges = label_path(self.graph, &ids);
        let edge_kinds = edges.iter().map(EdgeLabel::kind).collect();
        let relationships = edges.iter().map(|e| self.locale.edge(*e).to_string()).collect();
        let path = ids
            .into_iter()
            .map(|id| {
                let name = self
                    .graph
                    .person(&id)
                    .map(|p| p.full_name.clone())
                    .unwrap_or_else(|| self.locale.unknown_name().to_string());
                PathNode { id, name }
            })
            .collect::<Vec<_>>();

        log::debug!("Connecting path of {} hops between {} and {}", edges.len(), p1.id, p2.id);
        Ok(Resolution::Complex(ComplexRelation {
            path,
            edges,
            edge_kinds,
            relationships,
            person1: p1.full_name.clone(),
            person2: p2.full_name.clone(),
        }))
    }

    fn ensure_both(&self, first: &str, second: &str) -> Result<(), ResolveError> {
        if first.trim().is_empty() || second.trim().is_empty() {
            return Err(ResolveError::Input {
                message: self.locale.message(Message::MissingNames).to_string(),
            });
        }
        Ok(())
    }

    fn lookup<'p>(&self, query: &str, found: Option<&'p Person>) -> Result<&'p Person, ResolveError> {
        found.ok_or_else(|| ResolveError::Lookup {
            query: query.to_string(),
            message: self.locale.message(Message::PersonNotFound).to_string(),
        })
    }
}

/// Convenience entry point: resolve two names against `graph` in `locale`.
pub fn resolve(
    graph: &FamilyGraph,
    name1: &str,
    name2: &str,
    locale: Locale,
) -> Result<Resolution, ResolveError> {
    Resolver::new(graph).with_locale(locale).resolve(name1, name2)
}
