// Collection CRUD endpoints
//
// Every entity collection follows the same REST shape:
// GET /{c}, GET /{c}/{id}, POST /{c}, PUT /{c}/{id}, DELETE /{c}/{id}.

use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// List every record in a collection.
    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, Error> {
        self.get::<Vec<T>>(collection).await?.into_data()
    }

    /// Fetch a single record by id.
    pub async fn fetch<T: DeserializeOwned>(&self, collection: &str, id: i64) -> Result<T, Error> {
        self.get::<T>(&format!("{collection}/{id}"))
            .await?
            .into_data()
    }

    /// Create a record from a draft body; returns the committed record.
    pub async fn create<T: DeserializeOwned>(
        &self,
        collection: &str,
        draft: &impl Serialize,
    ) -> Result<T, Error> {
        self.post::<T>(collection, draft).await?.into_data()
    }

    /// Replace a record's fields from a draft body; returns the updated record.
    pub async fn update<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: i64,
        draft: &impl Serialize,
    ) -> Result<T, Error> {
        self.put::<T>(&format!("{collection}/{id}"), draft)
            .await?
            .into_data()
    }

    /// Delete a record. A `success: true` envelope is the acknowledgement;
    /// `data` may be absent.
    pub async fn remove(&self, collection: &str, id: i64) -> Result<(), Error> {
        self.delete::<IgnoredAny>(&format!("{collection}/{id}"))
            .await?;
        Ok(())
    }
}
