//! Settings Storage using a JSON file

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{SettingsStore, SettingsTransaction},
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

const APP_DIR: &str = "cas-openmpt";
const FILE_NAME: &str = "settings.json";

/// JSON-file settings store implementation
///
/// Keeps all values in one flat JSON object. Every write rewrites the file,
/// which is fine for the handful of keys a decoder plugin owns. The cached
/// values only change once the file has been written, so a failed write
/// leaves the store as it was. A store created with
/// [`JsonSettingsStore::in_memory`] never touches the disk.
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: Arc<Mutex<Map<String, Value>>>,
}

impl JsonSettingsStore {
    /// Location used when the host does not provide one:
    /// `<config dir>/cas-openmpt/settings.json`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
            .ok_or_else(|| {
                BridgeError::NotAvailable("No user configuration directory".to_string())
            })
    }

    /// Open the store backed by `path`, loading existing values.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = match tokio::fs::read(&path).await {
            Ok(contents) => Self::parse(&path, &contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        debug!(path = ?path, keys = values.len(), "Opened settings store");

        Ok(Self {
            path: Some(path),
            values: Arc::new(Mutex::new(values)),
        })
    }

    /// Create an in-memory settings store (for testing)
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Arc::new(Mutex::new(Map::new())),
        }
    }

    fn parse(path: &Path, contents: &[u8]) -> Result<Map<String, Value>> {
        match serde_json::from_slice::<Value>(contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(BridgeError::OperationFailed(format!(
                "Settings file {} is not a JSON object",
                path.display()
            ))),
            Err(e) => {
                error!(path = ?path, error = %e, "Corrupt settings file");
                Err(BridgeError::OperationFailed(format!(
                    "Failed to parse settings: {}",
                    e
                )))
            }
        }
    }

    async fn set_value(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.lock().await;
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        persist(self.path.as_deref(), &updated).await?;
        *values = updated;

        debug!(key = key, "Stored setting");
        Ok(())
    }

    async fn get_value(&self, key: &str) -> Option<Value> {
        self.values.lock().await.get(key).cloned()
    }

    fn type_mismatch(key: &str, expected: &str, actual: &Value) -> BridgeError {
        error!(key = key, expected = expected, actual = %actual, "Type mismatch");
        BridgeError::OperationFailed(format!(
            "Type mismatch for {}: expected {}, got {}",
            key, expected, actual
        ))
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, Value::String(value.to_string())).await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_value(key).await {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(Self::type_mismatch(key, "string", &other)),
            None => Ok(None),
        }
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set_value(key, Value::Bool(value)).await
    }

    async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get_value(key).await {
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(Self::type_mismatch(key, "bool", &other)),
            None => Ok(None),
        }
    }

    async fn set_i64(&self, key: &str, value: i64) -> Result<()> {
        self.set_value(key, Value::from(value)).await
    }

    async fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.get_value(key).await {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| Self::type_mismatch(key, "i64", &Value::Number(n))),
            Some(other) => Err(Self::type_mismatch(key, "i64", &other)),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().await;
        if !values.contains_key(key) {
            return Ok(());
        }

        let mut updated = values.clone();
        updated.remove(key);
        persist(self.path.as_deref(), &updated).await?;
        *values = updated;

        debug!(key = key, "Deleted setting");
        Ok(())
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.values.lock().await.contains_key(key))
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.values.lock().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn begin_transaction(&self) -> Result<Box<dyn SettingsTransaction + Send>> {
        Ok(Box::new(JsonSettingsTransaction {
            path: self.path.clone(),
            values: Arc::clone(&self.values),
            pending: Map::new(),
        }))
    }
}

/// Writes collected by a transaction, applied in one file write on commit.
struct JsonSettingsTransaction {
    path: Option<PathBuf>,
    values: Arc<Mutex<Map<String, Value>>>,
    pending: Map<String, Value>,
}

#[async_trait]
impl SettingsTransaction for JsonSettingsTransaction {
    async fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.pending
            .insert(key.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    async fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.pending.insert(key.to_string(), Value::Bool(value));
        Ok(())
    }

    async fn set_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.pending.insert(key.to_string(), Value::from(value));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let JsonSettingsTransaction {
            path,
            values,
            pending,
        } = *self;
        if pending.is_empty() {
            return Ok(());
        }

        let mut values = values.lock().await;
        let mut updated = values.clone();
        let count = pending.len();
        updated.extend(pending);
        persist(path.as_deref(), &updated).await?;
        *values = updated;

        debug!(keys = count, "Committed transaction");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        debug!(keys = self.pending.len(), "Rolled back transaction");
        Ok(())
    }
}

/// Write `values` to `path`. In-memory stores have no path and skip this.
async fn persist(path: Option<&Path>, values: &Map<String, Value>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(BridgeError::Io)?;
    }

    let data = serde_json::to_vec_pretty(values).map_err(|e| {
        BridgeError::OperationFailed(format!("Failed to serialize settings: {}", e))
    })?;
    tokio::fs::write(path, data).await.map_err(BridgeError::Io)?;

    Ok(())
}
