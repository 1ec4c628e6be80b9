//! Person records: the only entity in the family graph.
//!
//! Internally spouses are an ordered, deduplicated id set ([`SpouseSet`]).
//! The four-slot layout (`spouse1Id..spouse4Id`) only exists at the storage and
//! import boundary, represented by [`PersonRecord`].

use serde::{Deserialize, Serialize};

use crate::error::{KinmcpError, Result};

/// Maximum number of spouse slots carried by a stored record.
pub const MAX_SPOUSES: usize = 4;

/// Gender as stored in the family data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "مرد", alias = "male", alias = "Male")]
    Male,
    #[serde(rename = "زن", alias = "female", alias = "Female")]
    Female,
}

impl Gender {
    /// Parse a raw gender cell. Accepts the stored Persian values and English names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "مرد" => Some(Gender::Male),
            "زن" => Some(Gender::Female),
            other if other.eq_ignore_ascii_case("male") => Some(Gender::Male),
            other if other.eq_ignore_ascii_case("female") => Some(Gender::Female),
            _ => None,
        }
    }

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "مرد",
            Gender::Female => "زن",
        }
    }

    pub fn is_male(&self) -> bool {
        matches!(self, Gender::Male)
    }
}

/// Ordered, deduplicated set of spouse ids, capped at [`MAX_SPOUSES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpouseSet {
    ids: Vec<String>,
}

impl SpouseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the four boundary slots, skipping unset slots and duplicates.
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut set = Self::new();
        for id in slots.into_iter().flatten() {
            set.insert(id);
        }
        set
    }

    /// Insert an id. Returns false when already present, blank, or the set is full.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.trim().is_empty() || self.ids.len() >= MAX_SPOUSES || self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_SPOUSES
    }

    /// Spread back into the four boundary slots.
    pub fn to_slots(&self) -> [Option<String>; MAX_SPOUSES] {
        let mut slots: [Option<String>; MAX_SPOUSES] = Default::default();
        for (slot, id) in slots.iter_mut().zip(self.ids.iter()) {
            *slot = Some(id.clone());
        }
        slots
    }
}

/// A member of the family graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersonRecord", into = "PersonRecord")]
pub struct Person {
    pub id: String,
    pub full_name: String,
    pub gender: Gender,
    pub father_id: Option<String>,
    pub mother_id: Option<String>,
    pub spouses: SpouseSet,
    /// Presentation only; never consulted by the resolver.
    pub birth_year: Option<i32>,
}

impl Person {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            gender,
            father_id: None,
            mother_id: None,
            spouses: SpouseSet::new(),
            birth_year: None,
        }
    }

    pub fn with_father(mut self, id: impl Into<String>) -> Self {
        self.father_id = Some(id.into());
        self
    }

    pub fn with_mother(mut self, id: impl Into<String>) -> Self {
        self.mother_id = Some(id.into());
        self
    }

    pub fn with_spouse(mut self, id: impl Into<String>) -> Self {
        self.spouses.insert(id);
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn is_married(&self) -> bool {
        !self.spouses.is_empty()
    }
}

/// Four-slot boundary shape used by storage, CSV/JSON import and MCP output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(default)]
    pub id: String,
    pub full_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub father_id: Option<String>,
    #[serde(default)]
    pub mother_id: Option<String>,
    #[serde(default)]
    pub spouse1_id: Option<String>,
    #[serde(default)]
    pub spouse2_id: Option<String>,
    #[serde(default)]
    pub spouse3_id: Option<String>,
    #[serde(default)]
    pub spouse4_id: Option<String>,
    #[serde(default)]
    pub birth_year: Option<i32>,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

/// Empty strings and the "none" placeholder used by edit forms mean "unset".
pub(crate) fn normalize_ref(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "none")
}

/// One past the largest numeric id in `ids` (1 when none is numeric).
pub fn next_numeric_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<u64> {
    let max = ids
        .into_iter()
        .filter_map(|id| id.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| KinmcpError::Import(format!("No numeric id left after {}", max)))
}

/// Give each record without an id the next number counting up from `start`.
/// Returns how many ids were assigned.
pub fn assign_missing_ids(records: &mut [PersonRecord], start: u64) -> Result<usize> {
    let mut next = Some(start);
    let mut assigned = 0;
    for record in records.iter_mut().filter(|r| r.id.trim().is_empty()) {
        let id = next.ok_or_else(|| KinmcpError::Import(format!("No numeric id left after {}", u64::MAX)))?;
        record.id = id.to_string();
        next = id.checked_add(1);
        assigned += 1;
    }
    Ok(assigned)
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Person {
            id: record.id.trim().to_string(),
            full_name: record.full_name,
            gender: record.gender,
            father_id: normalize_ref(record.father_id),
            mother_id: normalize_ref(record.mother_id),
            spouses: SpouseSet::from_slots([
                normalize_ref(record.spouse1_id),
                normalize_ref(record.spouse2_id),
                normalize_ref(record.spouse3_id),
                normalize_ref(record.spouse4_id),
            ]),
            birth_year: record.birth_year,
        }
    }
}

impl From<Person> for PersonRecord {
    fn from(person: Person) -> Self {
        let [spouse1_id, spouse2_id, spouse3_id, spouse4_id] = person.spouses.to_slots();
        PersonRecord {
            id: person.id,
            full_name: person.full_name,
            gender: person.gender,
            father_id: person.father_id,
            mother_id: person.mother_id,
            spouse1_id,
            spouse2_id,
            spouse3_id,
            spouse4_id,
            birth_year: person.birth_year,
        }
    }
}
