use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{config, error::Result};

/// String key-value storage where every key may carry its own expiry.
///
/// An expired key reads as absent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

fn live_value(entries: &HashMap<String, Entry>, key: &str) -> Option<String> {
    entries
        .get(key)
        .filter(|entry| entry.is_live(Utc::now()))
        .map(|entry| entry.value.clone())
}

/// Store kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(live_value(&*self.entries.lock().await, key))
    }

    async fn set(&self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store persisted as one JSON object on disk.
///
/// Every operation reads the file, and mutations write it back. Expired
/// entries are pruned on write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// `<data_local_dir>/wayfinder/cache/session.json`
    pub fn default_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        path
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read(&self) -> Result<HashMap<String, Entry>> {
        match async_fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, mut entries: HashMap<String, Entry>) -> Result<()> {
        let now = Utc::now();
        entries.retain(|_, entry| entry.is_live(now));

        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let entries = self.read().await?;
        Ok(live_value(&entries, key))
    }

    async fn set(&self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        self.write(entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        if entries.remove(key).is_some() {
            self.write(entries).await?;
        }
        Ok(())
    }
}
