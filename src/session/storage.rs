use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// String key → JSON value store backed by a single file
///
/// Every mutation rewrites the whole file atomically (write `.tmp`, fsync,
/// rename). A missing file is an empty store.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    items: Map<String, Value>,
}

impl LocalStorage {
    /// Open the store at `path`, reading existing items once
    ///
    /// A file that cannot be parsed is treated as empty and overwritten on the
    /// next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let items = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file {}", path.display()))?;
            match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Storage file unreadable, starting empty");
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    pub fn set_item(&mut self, key: &str, value: Value) -> Result<()> {
        self.items.insert(key.to_string(), value);
        self.persist()
    }

    /// Remove `key`; removing an absent key does not touch the file
    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.items)
            .context("Failed to serialize storage items")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file =
                File::create(&tmp_path).context("Failed to create temporary storage file")?;
            file.write_all(json.as_bytes())
                .context("Failed to write storage data")?;
            file.sync_all()
                .context("Failed to sync storage file to disk")?;
        }

        fs::rename(&tmp_path, &self.path).context("Failed to rename temporary storage file")?;

        Ok(())
    }
}
