use rusqlite::{params, OptionalExtension, Transaction};
use std::collections::HashMap;
use crate::error::{Result, KinmcpError};
use crate::db::Db;
use crate::person::{assign_missing_ids, next_numeric_id, Gender, Person, PersonRecord, SpouseSet, MAX_SPOUSES};

/// Outcome of an import batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    /// Spouse links added to counterparts that did not list the imported person
    pub reciprocal_links: usize,
    /// Records that arrived without an id and got the next sequential one
    pub assigned_ids: usize,
}

struct PersonRow {
    id: String,
    full_name: String,
    gender: String,
    father_id: Option<String>,
    mother_id: Option<String>,
    birth_year: Option<i32>,
}

/// Load every person in insertion order.
///
/// The returned order is the collection order used by name lookup and the
/// child index, so it must stay stable between calls.
pub async fn load_persons(db: &Db) -> Result<Vec<Person>> {
    db.with_connection(|conn| {
        let rows: Vec<PersonRow> = conn
            .prepare(
                "SELECT id, full_name, gender, father_id, mother_id, birth_year \
                 FROM persons ORDER BY position",
            )?
            .query_map([], |row| {
                Ok(PersonRow {
                    id: row.get(0)?,
                    full_name: row.get(1)?,
                    gender: row.get(2)?,
                    father_id: row.get(3)?,
                    mother_id: row.get(4)?,
                    birth_year: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let mut spouses: HashMap<String, Vec<String>> = HashMap::new();
        let mut stmt = conn.prepare(
            "SELECT person_id, spouse_id FROM person_spouses ORDER BY person_id, slot",
        )?;
        let links = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for link in links {
            let (person_id, spouse_id) = link?;
            spouses.entry(person_id).or_default().push(spouse_id);
        }

        rows.into_iter()
            .map(|row| -> Result<Person> {
                let gender = Gender::parse(&row.gender).ok_or_else(|| {
                    KinmcpError::Parse(format!(
                        "Invalid gender '{}' stored for person {}",
                        row.gender, row.id
                    ))
                })?;
                let spouse_ids = spouses.remove(&row.id).unwrap_or_default();
                Ok(Person {
                    spouses: SpouseSet::from_slots(spouse_ids.into_iter().map(Some)),
                    id: row.id,
                    full_name: row.full_name,
                    gender,
                    father_id: row.father_id,
                    mother_id: row.mother_id,
                    birth_year: row.birth_year,
                })
            })
            .collect()
    })
    .await
}

/// Insert or update a batch of records in one transaction.
///
/// Records without an id get the next numeric id after the largest numeric id
/// already stored or present in the batch. Each imported spouse that exists and
/// has a free slot gets the reverse link.
pub async fn import_persons(db: &Db, records: Vec<PersonRecord>) -> Result<ImportSummary> {
    if records.is_empty() {
        return Ok(ImportSummary::default());
    }

    db.with_connection(move |conn| {
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();

        if let Some(blank) = records.iter().find(|r| r.full_name.trim().is_empty()) {
            return Err(KinmcpError::Import(format!(
                "Person {} has no full name",
                if blank.id.trim().is_empty() { "<new>" } else { blank.id.trim() }
            )));
        }

        let mut records = records;
        if records.iter().any(|r| r.id.trim().is_empty()) {
            let start = first_free_id(&tx, &records)?;
            summary.assigned_ids = assign_missing_ids(&mut records, start)?;
        }
        let persons: Vec<Person> = records.into_iter().map(Person::from).collect();

        for person in &persons {
            if upsert_person(&tx, person)? {
                summary.updated += 1;
            } else {
                summary.inserted += 1;
            }
        }

        for person in &persons {
            for spouse_id in person.spouses.iter() {
                if add_reciprocal_link(&tx, spouse_id, &person.id)? {
                    summary.reciprocal_links += 1;
                }
            }
        }

        tx.commit()?;
        log::info!(
            "Imported {} persons ({} new, {} updated, {} reciprocal spouse links)",
            persons.len(),
            summary.inserted,
            summary.updated,
            summary.reciprocal_links
        );
        Ok(summary)
    })
    .await
}

fn first_free_id(tx: &Transaction<'_>, records: &[PersonRecord]) -> Result<u64> {
    let stored: Vec<String> = tx
        .prepare("SELECT id FROM persons")?
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    next_numeric_id(
        stored
            .iter()
            .map(String::as_str)
            .chain(records.iter().map(|r| r.id.as_str())),
    )
}

/// Returns true when the person already existed.
fn upsert_person(tx: &Transaction<'_>, person: &Person) -> Result<bool> {
    let existed = tx
        .query_row(
            "SELECT 1 FROM persons WHERE id = ?1",
            params![person.id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    tx.execute(
        r#"
        INSERT INTO persons (id, full_name, gender, father_id, mother_id, birth_year)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(id) DO UPDATE SET
            full_name = excluded.full_name,
            gender = excluded.gender,
            father_id = excluded.father_id,
            mother_id = excluded.mother_id,
            birth_year = excluded.birth_year
        "#,
        params![
            person.id,
            person.full_name,
            person.gender.as_str(),
            person.father_id,
            person.mother_id,
            person.birth_year,
        ],
    )?;

    tx.execute(
        "DELETE FROM person_spouses WHERE person_id = ?1",
        params![person.id],
    )?;
    for (slot, spouse_id) in person.spouses.iter().enumerate() {
        tx.execute(
            "INSERT INTO person_spouses (person_id, slot, spouse_id) VALUES (?1, ?2, ?3)",
            params![person.id, (slot + 1) as i64, spouse_id],
        )?;
    }

    Ok(existed)
}

/// Link `spouse_id` back to `person_id` in its first free slot.
fn add_reciprocal_link(tx: &Transaction<'_>, spouse_id: &str, person_id: &str) -> Result<bool> {
    if spouse_id == person_id {
        return Ok(false);
    }

    let exists = tx
        .query_row(
            "SELECT 1 FROM persons WHERE id = ?1",
            params![spouse_id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !exists {
        log::debug!("Spouse {} of {} not stored, no reverse link", spouse_id, person_id);
        return Ok(false);
    }

    let mut stmt = tx.prepare("SELECT slot, spouse_id FROM person_spouses WHERE person_id = ?1")?;
    let taken: Vec<(i64, String)> = stmt
        .query_map(params![spouse_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    if taken.iter().any(|(_, id)| id == person_id) {
        return Ok(false);
    }

    let free_slot = (1..=MAX_SPOUSES as i64).find(|slot| taken.iter().all(|(s, _)| s != slot));
    match free_slot {
        Some(slot) => {
            tx.execute(
                "INSERT INTO person_spouses (person_id, slot, spouse_id) VALUES (?1, ?2, ?3)",
                params![spouse_id, slot, person_id],
            )?;
            Ok(true)
        }
        None => {
            log::warn!(
                "Person {} already has {} spouses, not linking back to {}",
                spouse_id,
                MAX_SPOUSES,
                person_id
            );
            Ok(false)
        }
    }
}

/// Delete every person. Returns the number of removed rows.
pub async fn clear_persons(db: &Db) -> Result<usize> {
    db.with_connection(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM person_spouses", [])?;
        let removed = tx.execute("DELETE FROM persons", [])?;
        tx.commit()?;
        Ok(removed)
    })
    .await
}

pub async fn count_persons(db: &Db) -> Result<usize> {
    db.with_connection(|conn| {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
        Ok(count as usize)
    })
    .await
}
