use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::{debug, info};

use super::{COLLECTION, CustomerStore};
use crate::customer::{Customer, CustomerId, Fields};
use crate::error::Error;

/// MongoDB-backed customer store.
///
/// One client per process. The driver pools connections internally, so the
/// store is shared across requests without any locking of its own.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
    customers: Collection<Document>,
}

impl MongoStore {
    /// Connects to `url`, selects `database` and verifies the server answers
    /// a `ping` before returning.
    pub async fn connect(url: &str, database: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(url).await?;
        let database = client.database(database);
        let customers = database.collection::<Document>(COLLECTION);
        let store = Self { client, database, customers };
        store.ping().await?;
        info!(db = store.database.name(), "connected to database");
        Ok(store)
    }
}

fn by_id(id: &CustomerId) -> Document {
    doc! { "_id": id.object_id() }
}

fn to_customer(mut document: Document) -> Result<Customer, Error> {
    let id = CustomerId::from(document.get_object_id("_id")?);
    document.remove("_id");
    let fields = match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => fields,
        _ => Fields::new(),
    };
    Ok(Customer { id, fields })
}

#[async_trait]
impl CustomerStore for MongoStore {
    async fn list(&self) -> Result<Vec<Customer>, Error> {
        let documents: Vec<Document> = self.customers
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(to_customer).collect()
    }

    async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, Error> {
        self.customers
            .find_one(by_id(id))
            .await?
            .map(to_customer)
            .transpose()
    }

    async fn insert(&self, fields: Fields) -> Result<CustomerId, Error> {
        let id = CustomerId::generate();
        let mut document = bson::to_document(&fields)?;
        document.insert("_id", id.object_id());
        self.customers.insert_one(document).await?;
        debug!(%id, "inserted customer");
        Ok(id)
    }

    async fn update(&self, id: &CustomerId, fields: Fields) -> Result<bool, Error> {
        let changes = bson::to_document(&fields)?;
        let result = self.customers
            .update_one(by_id(id), doc! { "$set": changes })
            .await?;
        debug!(%id, matched = result.matched_count, modified = result.modified_count, "updated customer");
        Ok(result.modified_count > 0)
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, Error> {
        let result = self.customers.delete_one(by_id(id)).await?;
        debug!(%id, deleted = result.deleted_count, "deleted customer");
        Ok(result.deleted_count > 0)
    }

    async fn reset(&self, fixtures: Vec<Fields>) -> Result<(), Error> {
        self.customers.delete_many(doc! {}).await?;
        if fixtures.is_empty() {
            return Ok(());
        }
        let documents = fixtures.iter()
            .map(bson::to_document)
            .collect::<Result<Vec<_>, _>>()?;
        self.customers.insert_many(documents).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), Error> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        self.client.clone().shutdown().await;
        info!("database connection closed");
        Ok(())
    }
}
