//! Member listing helpers: name search and family statistics.

use serde::Serialize;

use crate::graph::FamilyGraph;
use crate::person::{Gender, Person};

/// Find members by name or id.
///
/// A blank query lists everyone. Otherwise a person matches when the query is a
/// case-insensitive substring of the full name or a substring of the id.
pub fn search_people<'g>(graph: &'g FamilyGraph, query: &str, limit: usize) -> Vec<&'g Person> {
    let query = query.trim();
    let needle = query.to_lowercase();
    graph
        .persons()
        .iter()
        .filter(|p| {
            query.is_empty() || p.full_name.to_lowercase().contains(&needle) || p.id.contains(query)
        })
        .take(limit)
        .collect()
}

/// Head counts over a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FamilyStats {
    pub total: usize,
    pub men: usize,
    pub women: usize,
    pub married: usize,
}

impl FamilyStats {
    pub fn from_graph(graph: &FamilyGraph) -> Self {
        graph.persons().iter().fold(Self::default(), |mut stats, person| {
            stats.total += 1;
            match person.gender {
                Gender::Male => stats.men += 1,
                Gender::Female => stats.women += 1,
            }
            if person.is_married() {
                stats.married += 1;
            }
            stats
        })
    }
}
