use chrono::Utc;
use ponto_core::{Descriptor, Identity, Person};
use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::codec::{decode_descriptor_blob, encode_descriptor_blob};
use crate::Result;

/// Durable mapping from a person's name to their enrolled descriptor and
/// metadata. Insert-or-update is keyed by `full_name` and happens in one
/// SQLite statement, so concurrent enrollments of the same name race only
/// on that statement.
#[derive(Clone)]
pub struct IdentityStore {
    conn: Connection,
}

impl IdentityStore {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Insert a new identity or overwrite the existing row with the same
    /// name. Returns the persisted identity summary.
    pub async fn upsert(&self, full_name: &str, age: i64, descriptor: &Descriptor) -> Result<Person> {
        let full_name = full_name.to_string();
        let blob = encode_descriptor_blob(&descriptor.values);
        let updated_at = Utc::now().to_rfc3339();

        let person = self
            .conn
            .call(move |conn| {
                let person = conn.query_row(
                    "INSERT INTO identities (full_name, age, descriptor, updated_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(full_name) DO UPDATE SET
                        age = excluded.age,
                        descriptor = excluded.descriptor,
                        updated_at = excluded.updated_at
                     RETURNING id, full_name, age",
                    params![full_name, age, blob, updated_at],
                    |row| {
                        Ok(Person {
                            id: row.get(0)?,
                            full_name: row.get(1)?,
                            age: row.get(2)?,
                        })
                    },
                )?;
                Ok(person)
            })
            .await?;

        Ok(person)
    }

    /// All enrolled identities in id order. The matcher's scan relies on
    /// this order being stable so distance ties break deterministically.
    pub async fn list(&self) -> Result<Vec<Identity>> {
        let identities = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, full_name, age, descriptor, updated_at
                     FROM identities
                     ORDER BY id ASC",
                )?;
                let rows = stmt.query_map([], |row| {
                    let blob: Vec<u8> = row.get(3)?;
                    Ok(Identity {
                        id: row.get(0)?,
                        full_name: row.get(1)?,
                        age: row.get(2)?,
                        descriptor: Descriptor::new(decode_descriptor_blob(&blob)),
                        updated_at: row.get(4)?,
                    })
                })?;

                let mut identities = Vec::new();
                for row in rows {
                    identities.push(row?);
                }
                Ok(identities)
            })
            .await?;

        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;
    use ponto_core::DESCRIPTOR_DIM;

    fn descriptor_of(value: f32) -> Descriptor {
        Descriptor::new(vec![value; DESCRIPTOR_DIM])
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_lists() {
        let store = Store::open_in_memory().await.unwrap();
        let identities = store.identities();

        let person = identities
            .upsert("Ana Silva", 30, &descriptor_of(0.5))
            .await
            .unwrap();
        assert_eq!(person.full_name, "Ana Silva");
        assert_eq!(person.age, 30);

        let listed = identities.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, person.id);
        assert_eq!(listed[0].descriptor, descriptor_of(0.5));
        assert!(!listed[0].updated_at.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_same_name_overwrites_in_place() {
        let store = Store::open_in_memory().await.unwrap();
        let identities = store.identities();

        let first = identities
            .upsert("Ana Silva", 30, &descriptor_of(0.5))
            .await
            .unwrap();
        let second = identities
            .upsert("Ana Silva", 31, &descriptor_of(0.9))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.age, 31);

        let listed = identities.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].age, 31);
        assert_eq!(listed[0].descriptor, descriptor_of(0.9));
    }

    #[tokio::test]
    async fn test_list_is_id_ordered() {
        let store = Store::open_in_memory().await.unwrap();
        let identities = store.identities();

        identities.upsert("First", 20, &descriptor_of(0.1)).await.unwrap();
        identities.upsert("Second", 21, &descriptor_of(0.2)).await.unwrap();
        identities.upsert("Third", 22, &descriptor_of(0.3)).await.unwrap();

        let names: Vec<String> = identities
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.full_name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_corrupted_blob_surfaces_as_wrong_length() {
        let store = Store::open_in_memory().await.unwrap();
        let identities = store.identities();

        identities
            .conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO identities (full_name, age, descriptor, updated_at)
                     VALUES ('Broken', 40, ?1, '')",
                    params![vec![0u8; 13]],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let listed = identities.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        // 13 bytes decode to 3 whole f32s — not a valid 128-d descriptor
        assert_eq!(listed[0].descriptor.values.len(), 3);
    }
}
