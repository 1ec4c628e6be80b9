//! Per-hop labels along a connecting path.
//!
//! Only the atomic tests apply here (child, parent, spouse, sibling); a
//! grandparent or in-law chain stays as several labelled hops.

use crate::graph::{EdgeLabel, FamilyGraph};

/// Label what `from_id` is to `to_id`. Unknown ids and unmatched pairs are `Kin`.
pub fn label_edge(graph: &FamilyGraph, from_id: &str, to_id: &str) -> EdgeLabel {
    let (Some(from), Some(to)) = (graph.person(from_id), graph.person(to_id)) else {
        return EdgeLabel::Kin;
    };

    if from.father_id.as_deref() == Some(to_id) || from.mother_id.as_deref() == Some(to_id) {
        return EdgeLabel::Child;
    }
    if to.father_id.as_deref() == Some(from_id) {
        return EdgeLabel::Father;
    }
    if to.mother_id.as_deref() == Some(from_id) {
        return EdgeLabel::Mother;
    }
    if graph.are_spouses(from, to) {
        return EdgeLabel::Spouse;
    }

    let shared_father = from.father_id.is_some() && from.father_id == to.father_id;
    let shared_mother = from.mother_id.is_some() && from.mother_id == to.mother_id;
    if from.id != to.id && (shared_father || shared_mother) {
        return if from.gender.is_male() {
            EdgeLabel::Brother
        } else {
            EdgeLabel::Sister
        };
    }

    EdgeLabel::Kin
}

/// Label every consecutive pair of `path`. A path of n ids yields n - 1 labels.
pub fn label_path(graph: &FamilyGraph, path: &[String]) -> Vec<EdgeLabel> {
    path.windows(2)
        .map(|pair| label_edge(graph, &pair[0], &pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::{Gender, Person};

    fn graph() -> FamilyGraph {
        FamilyGraph::new(vec![
            Person::new("f", "Father", Gender::Male).with_spouse("m"),
            Person::new("m", "Mother", Gender::Female),
            Person::new("s", "Son", Gender::Male).with_father("f").with_mother("m"),
            Person::new("d", "Daughter", Gender::Female).with_father("f").with_mother("m"),
            Person::new("x", "Other", Gender::Male),
        ])
    }

    #[test]
    fn test_atomic_labels() {
        let g = graph();
        assert_eq!(label_edge(&g, "s", "f"), EdgeLabel::Child);
        assert_eq!(label_edge(&g, "f", "s"), EdgeLabel::Father);
        assert_eq!(label_edge(&g, "m", "d"), EdgeLabel::Mother);
        assert_eq!(label_edge(&g, "m", "f"), EdgeLabel::Spouse);
        assert_eq!(label_edge(&g, "s", "d"), EdgeLabel::Brother);
        assert_eq!(label_edge(&g, "d", "s"), EdgeLabel::Sister);
    }

    #[test]
    fn test_fallback_to_kin() {
        let g = graph();
        assert_eq!(label_edge(&g, "x", "s"), EdgeLabel::Kin);
        assert_eq!(label_edge(&g, "x", "ghost"), EdgeLabel::Kin);
    }

    #[test]
    fn test_label_path() {
        let g = graph();
        let path: Vec<String> = ["s", "f", "m"].iter().map(|s| s.to_string()).collect();
        assert_eq!(label_path(&g, &path), vec![EdgeLabel::Child, EdgeLabel::Spouse]);
        assert!(label_path(&g, &path[..1]).is_empty());
    }
}
