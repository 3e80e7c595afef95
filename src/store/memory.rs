use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::CustomerStore;
use crate::customer::{Customer, CustomerId, Fields};
use crate::error::Error;

/// In-process customer store.
///
/// Documents are kept in insertion order; `list` sorts a snapshot so ties on
/// `name` come back in the order they were written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Customer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Customer>, Error> {
        let mut customers = self.documents.read().await.clone();
        // Missing or non-string names sort first, like nulls in MongoDB.
        customers.sort_by(|a, b| a.name().cmp(&b.name()));
        Ok(customers)
    }

    async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, Error> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|c| c.id == *id).cloned())
    }

    async fn insert(&self, fields: Fields) -> Result<CustomerId, Error> {
        let id = CustomerId::generate();
        self.documents.write().await.push(Customer { id, fields });
        debug!(%id, "inserted customer");
        Ok(id)
    }

    async fn update(&self, id: &CustomerId, fields: Fields) -> Result<bool, Error> {
        let mut documents = self.documents.write().await;
        let Some(customer) = documents.iter_mut().find(|c| c.id == *id) else {
            return Ok(false);
        };
        let mut modified = false;
        for (key, value) in fields {
            if customer.fields.get(&key) != Some(&value) {
                customer.fields.insert(key, value);
                modified = true;
            }
        }
        Ok(modified)
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, Error> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|c| c.id != *id);
        Ok(documents.len() != before)
    }

    async fn reset(&self, fixtures: Vec<Fields>) -> Result<(), Error> {
        let mut documents = self.documents.write().await;
        documents.clear();
        documents.extend(fixtures.into_iter().map(|fields| Customer {
            id: CustomerId::generate(),
            fields,
        }));
        Ok(())
    }

    async fn ping(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn list_is_sorted_case_sensitively() {
        let store = MemoryStore::new();
        for name in ["bruno", "Carla", "Ana", "ana"] {
            store.insert(fields(json!({ "name": name, "phone": "1" }))).await.unwrap();
        }
        let names: Vec<_> = store.list().await.unwrap()
            .iter()
            .map(|c| c.name().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["Ana", "Carla", "ana", "bruno"]);
    }

    #[tokio::test]
    async fn update_reports_only_real_changes() {
        let store = MemoryStore::new();
        let id = store.insert(fields(json!({ "name": "Ana", "phone": "1" }))).await.unwrap();

        let same = fields(json!({ "name": "Ana", "phone": "1" }));
        assert!(!store.update(&id, same).await.unwrap());

        let changed = fields(json!({ "name": "Ana", "phone": "2", "city": "Recife" }));
        assert!(store.update(&id, changed).await.unwrap());

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.phone(), Some("2"));
        assert_eq!(stored.fields.get("city"), Some(&json!("Recife")));
    }

    #[tokio::test]
    async fn update_and_delete_miss_unknown_ids() {
        let store = MemoryStore::new();
        let unknown = CustomerId::generate();
        assert!(!store.update(&unknown, fields(json!({ "name": "x" }))).await.unwrap());
        assert!(!store.delete(&unknown).await.unwrap());
        assert!(store.get(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = MemoryStore::new();
        let id = store.insert(fields(json!({ "name": "Ana", "phone": "1" }))).await.unwrap();
        assert!(store.delete(&id).await.unwrap());
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn reset_replaces_everything() {
        let store = MemoryStore::new();
        store.insert(fields(json!({ "name": "Old", "phone": "1" }))).await.unwrap();
        store.reset(vec![fields(json!({ "name": "New", "phone": "2" }))]).await.unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), Some("New"));
    }
}
