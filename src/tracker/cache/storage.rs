extern crate serde_yaml;

use crate::error::{storage_error, Result};
use serde_yaml::{from_reader, to_writer};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, ErrorKind},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Key-value persistence the cache is layered on.
pub trait Store: Send + Sync {
    fn put(&self, key: &str, value: String) -> Result<()>;
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn put(&self, key: &str, value: String) -> Result<()> {
        (**self).put(key, value)
    }
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    content: Mutex<BTreeMap<String, String>>,
}
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
impl Store for MemoryStore {
    fn put(&self, key: &str, value: String) -> Result<()> {
        lock(&self.content)?.insert(key.to_string(), value);
        Ok(())
    }
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.content)?.get(key).cloned())
    }
    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.content)?.remove(key);
        Ok(())
    }
}

/// Store backed by a yaml file, rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    content: Mutex<BTreeMap<String, String>>,
}
impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = match File::open(&path) {
            Ok(f) => from_reader(BufReader::new(f)).map_err(|e| {
                storage_error(format!("Error reading {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(storage_error(format!("Error open {}: {}", path.display(), e))),
        };
        Ok(Self {
            path,
            content: Mutex::new(content),
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn save(&self, content: &BTreeMap<String, String>) -> Result<()> {
        let file = File::create(&self.path)
            .map_err(|e| storage_error(format!("Error create {}: {}", self.path.display(), e)))?;
        to_writer(BufWriter::new(file), content)
            .map_err(|e| storage_error(format!("Error writing {}: {}", self.path.display(), e)))
    }
}
impl Store for FileStore {
    fn put(&self, key: &str, value: String) -> Result<()> {
        let mut content = lock(&self.content)?;
        content.insert(key.to_string(), value);
        self.save(&content)
    }
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.content)?.get(key).cloned())
    }
    fn remove(&self, key: &str) -> Result<()> {
        let mut content = lock(&self.content)?;
        if content.remove(key).is_some() {
            self.save(&content)?;
        }
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>> {
    m.lock().map_err(|_| storage_error("store lock poisoned"))
}
