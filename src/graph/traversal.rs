//! BFS shortest-path search over the kinship graph.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::FamilyGraph;

/// Find the shortest connecting path between two persons.
///
/// Edges are the undirected union of parent, spouse and child links, expanded in
/// the order father, mother, spouses, children. Returns the ids from `start_id` to
/// `end_id` inclusive, or `None` when the two are not connected. A start equal to
/// the end yields the single-node path.
pub fn shortest_path(graph: &FamilyGraph, start_id: &str, end_id: &str) -> Option<Vec<String>> {
    if start_id == end_id {
        return Some(vec![start_id.to_string()]);
    }

    let start = graph.person(start_id)?;
    graph.person(end_id)?;

    let mut visited: HashSet<&str> = HashSet::new();
    let mut came_from: HashMap<&str, &str> = HashMap::new();
    let mut queue = VecDeque::new();

    visited.insert(start.id.as_str());
    queue.push_back(start.id.as_str());

    while let Some(current) = queue.pop_front() {
        if current == end_id {
            return Some(rebuild_path(&came_from, current));
        }

        for next in graph.neighbors(current) {
            let next_id = next.id.as_str();
            if visited.insert(next_id) {
                came_from.insert(next_id, current);
                queue.push_back(next_id);
            }
        }
    }

    log::debug!("No path between {} and {} ({} visited)", start_id, end_id, visited.len());
    None
}

fn rebuild_path(came_from: &HashMap<&str, &str>, end: &str) -> Vec<String> {
    let mut path = vec![end.to_string()];
    let mut current = end;
    while let Some(&prev) = came_from.get(current) {
        path.push(prev.to_string());
        current = prev;
    }
    path.reverse();
    path
}

/// All persons reachable from `start_id` within `max_depth` hops, with their distance.
///
/// Breadth-first, so each person appears once at its minimal distance. The start
/// itself is not included.
pub fn relatives_within(graph: &FamilyGraph, start_id: &str, max_depth: usize) -> Vec<(String, usize)> {
    let Some(start) = graph.person(start_id) else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start.id.as_str());
    queue.push_back((start.id.as_str(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for next in graph.neighbors(current) {
            let next_id = next.id.as_str();
            if visited.insert(next_id) {
                result.push((next_id.to_string(), depth + 1));
                queue.push_back((next_id, depth + 1));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::{Gender, Person};

    fn chain() -> FamilyGraph {
        // a's father b is married to c (not a's mother)
        FamilyGraph::new(vec![
            Person::new("a", "A", Gender::Male).with_father("b"),
            Person::new("b", "B", Gender::Male).with_spouse("c"),
            Person::new("c", "C", Gender::Female),
            Person::new("x", "Stranger", Gender::Female),
        ])
    }

    #[test]
    fn test_same_start_and_end() {
        let graph = chain();
        assert_eq!(shortest_path(&graph, "a", "a"), Some(vec!["a".to_string()]));
        assert_eq!(
            shortest_path(&graph, "ghost", "ghost"),
            Some(vec!["ghost".to_string()])
        );
    }

    #[test]
    fn test_parent_then_spouse() {
        let graph = chain();
        assert_eq!(
            shortest_path(&graph, "a", "c"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        // reverse direction walks the reverse spouse link and the child link
        assert_eq!(
            shortest_path(&graph, "c", "a"),
            Some(vec!["c".to_string(), "b".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn test_disconnected() {
        let graph = chain();
        assert_eq!(shortest_path(&graph, "a", "x"), None);
        assert_eq!(shortest_path(&graph, "a", "missing"), None);
        assert_eq!(shortest_path(&graph, "missing", "a"), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = FamilyGraph::new(vec![
            Person::new("1", "One", Gender::Male).with_father("2"),
            Person::new("2", "Two", Gender::Male).with_father("3"),
            Person::new("3", "Three", Gender::Male).with_father("1"),
            Person::new("4", "Four", Gender::Male),
        ]);
        assert_eq!(shortest_path(&graph, "1", "4"), None);
        assert_eq!(shortest_path(&graph, "1", "3").map(|p| p.len()), Some(2));
    }

    #[test]
    fn test_dangling_parent_is_not_a_bridge() {
        let graph = FamilyGraph::new(vec![
            Person::new("1", "One", Gender::Male).with_father("99"),
            Person::new("2", "Two", Gender::Male).with_father("99"),
        ]);
        assert_eq!(shortest_path(&graph, "1", "2"), None);
    }

    #[test]
    fn test_tie_break_prefers_father_side() {
        // child reaches cousin through either parent; father is expanded first
        let graph = FamilyGraph::new(vec![
            Person::new("kid", "Kid", Gender::Male)
                .with_father("f")
                .with_mother("m"),
            Person::new("f", "F", Gender::Male).with_spouse("m"),
            Person::new("m", "M", Gender::Female),
            Person::new("t", "Target", Gender::Female).with_father("f").with_mother("m"),
        ]);
        assert_eq!(
            shortest_path(&graph, "kid", "t"),
            Some(vec!["kid".to_string(), "f".to_string(), "t".to_string()])
        );
    }

    /// Length of the shortest simple path by exhaustive DFS.
    fn brute_force_len(graph: &FamilyGraph, start: &str, end: &str) -> Option<usize> {
        fn walk(
            graph: &FamilyGraph,
            current: &str,
            end: &str,
            seen: &mut Vec<String>,
            best: &mut Option<usize>,
        ) {
            if current == end {
                let len = seen.len();
                if best.map_or(true, |b| len < b) {
                    *best = Some(len);
                }
                return;
            }
            for next in graph.neighbors(current) {
                if seen.iter().any(|s| s == &next.id) {
                    continue;
                }
                seen.push(next.id.clone());
                walk(graph, &next.id, end, seen, best);
                seen.pop();
            }
        }
        let mut best = None;
        let mut seen = vec![start.to_string()];
        walk(graph, start, end, &mut seen, &mut best);
        best
    }

    #[test]
    fn test_bfs_matches_exhaustive_search() {
        let graph = FamilyGraph::new(vec![
            Person::new("1", "G1", Gender::Male).with_spouse("2"),
            Person::new("2", "G2", Gender::Female),
            Person::new("3", "P1", Gender::Male).with_father("1").with_mother("2").with_spouse("4"),
            Person::new("4", "P2", Gender::Female).with_father("7"),
            Person::new("5", "C1", Gender::Female).with_father("3").with_mother("4"),
            Person::new("6", "C2", Gender::Male).with_mother("4").with_spouse("8"),
            Person::new("7", "IL", Gender::Male),
            Person::new("8", "S", Gender::Female).with_father("9"),
            Person::new("9", "SF", Gender::Male).with_spouse("2"),
        ]);
        let ids: Vec<String> = graph.persons().iter().map(|p| p.id.clone()).collect();
        for from in &ids {
            for to in &ids {
                let bfs = shortest_path(&graph, from, to).map(|p| p.len());
                assert_eq!(bfs, brute_force_len(&graph, from, to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_relatives_within_depth() {
        let graph = chain();
        let one_hop = relatives_within(&graph, "a", 1);
        assert_eq!(one_hop, vec![("b".to_string(), 1)]);

        let two_hops = relatives_within(&graph, "a", 2);
        assert_eq!(two_hops, vec![("b".to_string(), 1), ("c".to_string(), 2)]);

        assert!(relatives_within(&graph, "a", 0).is_empty());
        assert!(relatives_within(&graph, "missing", 3).is_empty());
    }
}
