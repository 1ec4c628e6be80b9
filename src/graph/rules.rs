//! Direct-relation classifier.
//!
//! An ordered list of named rules; each is a pure function of the two records and
//! the snapshot. The first rule that answers wins. Every rule looks at most two
//! parent hops away, so classification terminates on cyclic or dangling data.

use crate::graph::{FamilyGraph, RelationKind};
use crate::person::Person;

/// Rule signature: what `a` is to `b`, if this rule can tell.
pub type RuleFn = fn(&Person, &Person, &FamilyGraph) -> Option<RelationKind>;

/// A named classification rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

/// Rules in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "parent_child",
        apply: parent_child,
    },
    Rule {
        name: "spouse",
        apply: spouse,
    },
    Rule {
        name: "sibling",
        apply: sibling,
    },
    Rule {
        name: "grandparent",
        apply: grandparent,
    },
    Rule {
        name: "in_law",
        apply: in_law,
    },
];

/// Classify what `a` is to `b`. `None` means no direct relation applies.
pub fn classify(a: &Person, b: &Person, graph: &FamilyGraph) -> Option<RelationKind> {
    classify_with_rule(a, b, graph).map(|(_, kind)| kind)
}

/// Like [`classify`], also reporting which rule matched.
pub fn classify_with_rule(
    a: &Person,
    b: &Person,
    graph: &FamilyGraph,
) -> Option<(&'static str, RelationKind)> {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(a, b, graph).map(|kind| (rule.name, kind)))
}

fn is(id: Option<&str>, target: &Person) -> bool {
    id == Some(target.id.as_str())
}

pub fn parent_child(a: &Person, b: &Person, _graph: &FamilyGraph) -> Option<RelationKind> {
    if is(a.father_id.as_deref(), b) || is(a.mother_id.as_deref(), b) {
        return Some(RelationKind::Child);
    }
    if is(b.father_id.as_deref(), a) {
        return Some(RelationKind::Father);
    }
    if is(b.mother_id.as_deref(), a) {
        return Some(RelationKind::Mother);
    }
    None
}

pub fn spouse(a: &Person, b: &Person, graph: &FamilyGraph) -> Option<RelationKind> {
    graph.are_spouses(a, b).then_some(RelationKind::Spouse)
}

pub fn sibling(a: &Person, b: &Person, _graph: &FamilyGraph) -> Option<RelationKind> {
    if a.id == b.id {
        return None;
    }
    let shared_father = a.father_id.is_some() && a.father_id == b.father_id;
    let shared_mother = a.mother_id.is_some() && a.mother_id == b.mother_id;
    if !(shared_father || shared_mother) {
        return None;
    }
    Some(if a.gender.is_male() {
        RelationKind::Brother
    } else {
        RelationKind::Sister
    })
}

pub fn grandparent(a: &Person, b: &Person, graph: &FamilyGraph) -> Option<RelationKind> {
    // b two hops above a
    for parent in graph.parents(a).iter() {
        if graph.parents(parent).contains(&b.id) {
            return Some(RelationKind::Grandchild);
        }
    }

    // a two hops above b; the side is the b-parent the walk went through
    let of_b = graph.parents(b);
    if let Some(father) = of_b.father {
        let up = graph.parents(father);
        if up.father.is_some_and(|p| p.id == a.id) {
            return Some(RelationKind::PaternalGrandfather);
        }
        if up.mother.is_some_and(|p| p.id == a.id) {
            return Some(RelationKind::PaternalGrandmother);
        }
    }
    if let Some(mother) = of_b.mother {
        let up = graph.parents(mother);
        if up.father.is_some_and(|p| p.id == a.id) {
            return Some(RelationKind::MaternalGrandfather);
        }
        if up.mother.is_some_and(|p| p.id == a.id) {
            return Some(RelationKind::MaternalGrandmother);
        }
    }
    None
}

pub fn in_law(a: &Person, b: &Person, graph: &FamilyGraph) -> Option<RelationKind> {
    for spouse in graph.spouses_of(&a.id) {
        if is(spouse.father_id.as_deref(), b) {
            return Some(RelationKind::FatherInLaw);
        }
        if is(spouse.mother_id.as_deref(), b) {
            return Some(RelationKind::MotherInLaw);
        }
    }

    for spouse in graph.spouses_of(&b.id) {
        if is(spouse.father_id.as_deref(), a) || is(spouse.mother_id.as_deref(), a) {
            return Some(if a.gender.is_male() {
                RelationKind::SonInLaw
            } else {
                RelationKind::DaughterInLaw
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Gender;

    /// Three generations on both sides plus in-laws:
    ///
    /// ```text
    /// pgf(1) + pgm(2)      mgf(3) + mgm(4)
    ///        |                    |
    ///     dad(5)   +   mom(6)  ---+
    ///         |
    ///   son(7), daughter(8)
    /// son(7) + wife(9), wife's parents: wf(10) + wm(11)
    /// ```
    fn family() -> FamilyGraph {
        FamilyGraph::new(vec![
            Person::new("1", "PGF", Gender::Male).with_spouse("2"),
            Person::new("2", "PGM", Gender::Female),
            Person::new("3", "MGF", Gender::Male).with_spouse("4"),
            Person::new("4", "MGM", Gender::Female),
            Person::new("5", "Dad", Gender::Male)
                .with_father("1")
                .with_mother("2")
                .with_spouse("6"),
            Person::new("6", "Mom", Gender::Female)
                .with_father("3")
                .with_mother("4"),
            Person::new("7", "Son", Gender::Male)
                .with_father("5")
                .with_mother("6")
                .with_spouse("9"),
            Person::new("8", "Daughter", Gender::Female)
                .with_father("5")
                .with_mother("6"),
            Person::new("9", "Wife", Gender::Female)
                .with_father("10")
                .with_mother("11"),
            Person::new("10", "WF", Gender::Male),
            Person::new("11", "WM", Gender::Female),
        ])
    }

    fn kind(graph: &FamilyGraph, a: &str, b: &str) -> Option<RelationKind> {
        let a = graph.person(a).unwrap();
        let b = graph.person(b).unwrap();
        classify(a, b, graph)
    }

    #[test]
    fn test_parent_and_child() {
        let g = family();
        assert_eq!(kind(&g, "7", "5"), Some(RelationKind::Child));
        assert_eq!(kind(&g, "5", "7"), Some(RelationKind::Father));
        assert_eq!(kind(&g, "6", "8"), Some(RelationKind::Mother));
        assert_eq!(kind(&g, "8", "6"), Some(RelationKind::Child));
    }

    #[test]
    fn test_spouse_is_symmetric() {
        let g = family();
        assert_eq!(kind(&g, "5", "6"), Some(RelationKind::Spouse));
        assert_eq!(kind(&g, "6", "5"), Some(RelationKind::Spouse));
    }

    #[test]
    fn test_sibling_label_follows_subject_gender() {
        let g = FamilyGraph::new(vec![
            Person::new("5", "Father", Gender::Male),
            Person::new("a", "Brother", Gender::Male).with_father("5"),
            Person::new("b", "Sister", Gender::Female).with_father("5"),
        ]);
        assert_eq!(kind(&g, "a", "b"), Some(RelationKind::Brother));
        assert_eq!(kind(&g, "b", "a"), Some(RelationKind::Sister));
    }

    #[test]
    fn test_half_siblings_via_mother_only() {
        let g = FamilyGraph::new(vec![
            Person::new("a", "A", Gender::Female).with_mother("m").with_father("f1"),
            Person::new("b", "B", Gender::Male).with_mother("m").with_father("f2"),
        ]);
        assert_eq!(kind(&g, "a", "b"), Some(RelationKind::Sister));
    }

    #[test]
    fn test_unset_parents_do_not_make_siblings() {
        let g = FamilyGraph::new(vec![
            Person::new("a", "A", Gender::Male),
            Person::new("b", "B", Gender::Male),
        ]);
        assert_eq!(kind(&g, "a", "b"), None);
    }

    #[test]
    fn test_grandchild() {
        let g = family();
        assert_eq!(kind(&g, "7", "1"), Some(RelationKind::Grandchild));
        assert_eq!(kind(&g, "8", "4"), Some(RelationKind::Grandchild));
    }

    #[test]
    fn test_grandparents_by_side() {
        let g = family();
        assert_eq!(kind(&g, "1", "7"), Some(RelationKind::PaternalGrandfather));
        assert_eq!(kind(&g, "2", "7"), Some(RelationKind::PaternalGrandmother));
        assert_eq!(kind(&g, "3", "8"), Some(RelationKind::MaternalGrandfather));
        assert_eq!(kind(&g, "4", "8"), Some(RelationKind::MaternalGrandmother));
    }

    #[test]
    fn test_in_laws() {
        let g = family();
        assert_eq!(kind(&g, "7", "10"), Some(RelationKind::FatherInLaw));
        assert_eq!(kind(&g, "7", "11"), Some(RelationKind::MotherInLaw));
        assert_eq!(kind(&g, "7", "5"), Some(RelationKind::Child));
        // wife to husband's parents: her spouse's father is 5
        assert_eq!(kind(&g, "9", "5"), Some(RelationKind::FatherInLaw));
        // b's spouse has a as parent: labelled by a's gender
        assert_eq!(kind(&g, "10", "7"), Some(RelationKind::SonInLaw));
        assert_eq!(kind(&g, "5", "9"), Some(RelationKind::SonInLaw));
        assert_eq!(kind(&g, "6", "9"), Some(RelationKind::DaughterInLaw));
    }

    #[test]
    fn test_unrelated_returns_none() {
        let g = family();
        assert_eq!(kind(&g, "1", "10"), None);
        assert_eq!(kind(&g, "8", "9"), None);
    }

    #[test]
    fn test_priority_parent_before_spouse() {
        let g = FamilyGraph::new(vec![
            Person::new("a", "A", Gender::Male).with_spouse("b"),
            Person::new("b", "B", Gender::Female).with_father("a"),
        ]);
        let a = g.person("a").unwrap();
        let b = g.person("b").unwrap();
        assert_eq!(classify_with_rule(a, b, &g), Some(("parent_child", RelationKind::Father)));
    }

    #[test]
    fn test_cycles_and_dangling_refs_terminate() {
        let g = FamilyGraph::new(vec![
            Person::new("a", "A", Gender::Male).with_father("b").with_mother("zz"),
            Person::new("b", "B", Gender::Male).with_father("a").with_spouse("nope"),
            Person::new("c", "C", Gender::Female).with_father("c"),
        ]);
        let a = g.person("a").unwrap();
        let c = g.person("c").unwrap();
        assert_eq!(classify(a, c, &g), None);
        assert_eq!(classify(c, c, &g), Some(RelationKind::Child));
    }

    #[test]
    fn test_rules_are_ordered() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["parent_child", "spouse", "sibling", "grandparent", "in_law"]);
    }
}
