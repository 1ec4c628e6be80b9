//! Read-only adjacency queries over one snapshot of the person collection.

use std::collections::HashMap;

use crate::error::Result;
use crate::person::{assign_missing_ids, next_numeric_id, Person, PersonRecord};

/// Resolved parents of a person. Unset or dangling references are `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parents<'a> {
    pub father: Option<&'a Person>,
    pub mother: Option<&'a Person>,
}

impl<'a> Parents<'a> {
    /// Father then mother, skipping absent ones.
    pub fn iter(&self) -> impl Iterator<Item = &'a Person> {
        self.father.into_iter().chain(self.mother)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.iter().any(|p| p.id == id)
    }
}

/// Immutable snapshot of the kinship graph.
///
/// Persons are stored in collection order; lookups go through id indexes built once
/// at construction. Children and reverse spouse links are precomputed so every
/// adjacency query is a map lookup.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    persons: Vec<Person>,
    by_id: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
    spouse_of: HashMap<String, Vec<usize>>,
}

impl FamilyGraph {
    pub fn new(persons: Vec<Person>) -> Self {
        let mut by_id = HashMap::with_capacity(persons.len());
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        let mut spouse_of: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, person) in persons.iter().enumerate() {
            // duplicate ids: first record wins
            by_id.entry(person.id.clone()).or_insert(idx);

            if let Some(father) = &person.father_id {
                children.entry(father.clone()).or_default().push(idx);
            }
            if let Some(mother) = &person.mother_id {
                if person.father_id.as_deref() != Some(mother.as_str()) {
                    children.entry(mother.clone()).or_default().push(idx);
                }
            }
            for spouse in person.spouses.iter() {
                spouse_of.entry(spouse.to_string()).or_default().push(idx);
            }
        }

        log::debug!(
            "Built family graph: {} persons, {} parents with children",
            persons.len(),
            children.len()
        );

        Self {
            persons,
            by_id,
            children,
            spouse_of,
        }
    }

    /// Build from boundary records, numbering id-less records the way an import would.
    pub fn from_records(mut records: Vec<PersonRecord>) -> Result<Self> {
        if records.iter().any(|r| r.id.trim().is_empty()) {
            let start = next_numeric_id(records.iter().map(|r| r.id.as_str()))?;
            let assigned = assign_missing_ids(&mut records, start)?;
            log::debug!("Assigned {} ids to records without one", assigned);
        }
        Ok(Self::new(records.into_iter().map(Person::from).collect()))
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// All persons in collection order.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.by_id.get(id).map(|&idx| &self.persons[idx])
    }

    /// Exact full-name match; the first person in collection order wins.
    pub fn find_by_name(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.full_name == name)
    }

    /// Parents of the given record.
    pub fn parents(&self, person: &Person) -> Parents<'_> {
        Parents {
            father: person.father_id.as_deref().and_then(|id| self.person(id)),
            mother: person.mother_id.as_deref().and_then(|id| self.person(id)),
        }
    }

    /// Parents of the person with `id`; an unknown id has no parents.
    pub fn parents_of(&self, id: &str) -> Parents<'_> {
        match self.person(id) {
            Some(person) => self.parents(person),
            None => Parents::default(),
        }
    }

    /// Persons naming `id` as father or mother, in collection order.
    pub fn children_of(&self, id: &str) -> Vec<&Person> {
        self.children
            .get(id)
            .map(|idxs| idxs.iter().map(|&idx| &self.persons[idx]).collect())
            .unwrap_or_default()
    }

    /// Spouses of `id`, read symmetrically.
    ///
    /// Own slots come first in slot order, then persons that list `id` in their
    /// slots (collection order). Dangling ids are skipped, duplicates removed.
    pub fn spouses_of(&self, id: &str) -> Vec<&Person> {
        let own = self
            .person(id)
            .into_iter()
            .flat_map(|person| person.spouses.iter())
            .filter_map(|spouse_id| self.person(spouse_id));
        let listed = self
            .spouse_of
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.persons[idx]);

        let mut spouses: Vec<&Person> = Vec::new();
        for candidate in own.chain(listed) {
            if candidate.id != id && !spouses.iter().any(|s| s.id == candidate.id) {
                spouses.push(candidate);
            }
        }
        spouses
    }

    /// True when either record lists the other as a spouse.
    pub fn are_spouses(&self, a: &Person, b: &Person) -> bool {
        a.spouses.contains(&b.id) || b.spouses.contains(&a.id)
    }

    /// Graph neighbours in search order: father, mother, spouses, children.
    pub fn neighbors(&self, id: &str) -> Vec<&Person> {
        let Some(person) = self.person(id) else {
            return Vec::new();
        };
        let parents = self.parents(person);
        parents
            .iter()
            .chain(self.spouses_of(id))
            .chain(self.children_of(id))
            .collect()
    }
}
