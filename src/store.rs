//! Record store on top of an embedded fjall database
//!
//! Saved snapshots and lookup history live in separate keyspaces, keyed by
//! record id with JSON-encoded values. All fjall calls are blocking and run on
//! the blocking thread pool.

use std::path::Path;
use std::sync::Arc;

use fjall::{Database, Guard as _, Keyspace, KeyspaceCreateOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, instrument};

use crate::models::{SavedWeather, WeatherRequest};
use crate::{Result, WeatherDeskError};

/// Maximum number of history entries returned by a listing
pub const HISTORY_LIST_LIMIT: usize = 100;

const SAVED_KEYSPACE: &str = "saved_weather";
const HISTORY_KEYSPACE: &str = "weather_requests";

/// Records that carry their own id and creation time
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    fn id(&self) -> &str;
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;
}

impl Record for SavedWeather {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

impl Record for WeatherRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

/// One keyspace of records of type `T`
///
/// Mutations (`put`, `update`, `remove`) are serialised per collection so a
/// read-modify-write never resurrects a record removed in between.
#[derive(Clone)]
pub struct Collection<T> {
    keyspace: Keyspace,
    name: &'static str,
    writes: Arc<Mutex<()>>,
    _record: std::marker::PhantomData<fn() -> T>,
}

fn get_from_keyspace(keyspace: &Keyspace, key: &str) -> Result<Option<Vec<u8>>> {
    Ok(keyspace.get(key)?.map(|v| v.to_vec()))
}

fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record)
        .map_err(|e| WeatherDeskError::storage(format!("record encoding: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| WeatherDeskError::storage(format!("record decoding: {e}")))
}

fn join_failed(e: task::JoinError) -> WeatherDeskError {
    WeatherDeskError::storage(format!("store task failed: {e}"))
}

impl<T: Record> Collection<T> {
    fn new(keyspace: Keyspace, name: &'static str) -> Self {
        Self {
            keyspace,
            name,
            writes: Arc::new(Mutex::new(())),
            _record: std::marker::PhantomData,
        }
    }

    /// Insert or replace a record under its id
    #[instrument(name = "store_put", level = "debug", skip(self, record), fields(keyspace = self.name, id = record.id()))]
    pub async fn put(&self, record: &T) -> Result<()> {
        let _writes = self.writes.lock().await;
        self.write(record).await
    }

    async fn write(&self, record: &T) -> Result<()> {
        let keyspace = self.keyspace.clone();
        let key = record.id().to_string();
        let bytes = encode(record)?;

        task::spawn_blocking(move || keyspace.insert(key.into_bytes(), bytes))
            .await
            .map_err(join_failed)??;
        Ok(())
    }

    /// Fetch a record by id
    #[instrument(name = "store_get", level = "debug", skip(self), fields(keyspace = self.name))]
    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        let keyspace = self.keyspace.clone();
        let key = id.to_string();

        let maybe_bytes = task::spawn_blocking(move || get_from_keyspace(&keyspace, &key))
            .await
            .map_err(join_failed)??;

        match maybe_bytes {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => {
                debug!("Key not found");
                Ok(None)
            }
        }
    }

    /// Apply `change` to an existing record and store it.
    ///
    /// Fails with `RecordNotFound` when the id is absent; never inserts.
    #[instrument(name = "store_update", level = "debug", skip(self, change), fields(keyspace = self.name))]
    pub async fn update<F>(&self, id: &str, change: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _writes = self.writes.lock().await;
        let mut record = self
            .get(id)
            .await?
            .ok_or_else(|| WeatherDeskError::record_not_found(id))?;
        change(&mut record)?;
        self.write(&record).await?;
        Ok(record)
    }

    /// All records, newest first
    pub async fn list(&self) -> Result<Vec<T>> {
        let keyspace = self.keyspace.clone();

        let values = task::spawn_blocking(move || -> Result<Vec<Vec<u8>>> {
            keyspace
                .iter()
                .map(|guard| -> Result<Vec<u8>> {
                    let (_, value) = guard.into_inner()?;
                    Ok(value.to_vec())
                })
                .collect()
        })
        .await
        .map_err(join_failed)??;

        let mut records = values
            .iter()
            .map(|bytes| decode::<T>(bytes))
            .collect::<Result<Vec<_>>>()?;
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    /// Remove a record; returns the removed record, `None` if it did not exist
    pub async fn remove(&self, id: &str) -> Result<Option<T>> {
        let _writes = self.writes.lock().await;
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let keyspace = self.keyspace.clone();
        let key = id.to_string();
        task::spawn_blocking(move || keyspace.remove(key.into_bytes()))
            .await
            .map_err(join_failed)??;
        Ok(Some(existing))
    }
}

/// Handle to both record collections
#[derive(Clone)]
pub struct RecordStore {
    pub saved: Collection<SavedWeather>,
    pub history: Collection<WeatherRequest>,
}

impl RecordStore {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::builder(path).open()?;
        let saved = db.keyspace(SAVED_KEYSPACE, KeyspaceCreateOptions::default)?;
        let history = db.keyspace(HISTORY_KEYSPACE, KeyspaceCreateOptions::default)?;
        info!("Opened record store at {}", path.display());

        Ok(Self {
            saved: Collection::new(saved, SAVED_KEYSPACE),
            history: Collection::new(history, HISTORY_KEYSPACE),
        })
    }

    /// Saved snapshots, newest first
    pub async fn list_saved(&self) -> Result<Vec<SavedWeather>> {
        self.saved.list().await
    }

    /// Change the temperature of a saved snapshot
    pub async fn update_saved_temperature(
        &self,
        id: &str,
        temperature: f64,
    ) -> Result<SavedWeather> {
        self.saved
            .update(id, |record| {
                record.set_temperature(temperature);
                Ok(())
            })
            .await
    }

    /// Most recent history entries, capped at [`HISTORY_LIST_LIMIT`]
    pub async fn list_history(&self) -> Result<Vec<WeatherRequest>> {
        let mut entries = self.history.list().await?;
        entries.truncate(HISTORY_LIST_LIMIT);
        Ok(entries)
    }
}
