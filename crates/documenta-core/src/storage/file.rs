//! Project files on disk.

use super::{BoxFuture, Storage, StorageError, StorageResult, check_id};
use crate::store::ContentStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of saved project files.
pub const PROJECT_EXTENSION: &str = "docproj";

/// One pretty-printed JSON file per project in a directory.
///
/// The file stem is the project id with every byte outside `[A-Za-z0-9_-]`
/// written as `%XX`, so any id maps to exactly one file and [`list`] gives
/// back the ids that were saved.
///
/// [`list`]: Storage::list
pub struct FileStorage {
    base_path: PathBuf,
}

fn encode_id(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

fn decode_stem(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
}

impl FileStorage {
    /// Storage rooted at `base_path`, created if missing.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| io_error("create", &base_path, e))?;
        Ok(Self { base_path })
    }

    /// `<data_local_dir>/documenta/projects`, or under the home directory
    /// when the platform has no data directory.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("documenta").join("projects"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn project_path(&self, id: &str) -> StorageResult<PathBuf> {
        check_id(id)?;
        Ok(self.base_path.join(format!("{}.{}", encode_id(id), PROJECT_EXTENSION)))
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, project: &ContentStore) -> BoxFuture<'_, StorageResult<()>> {
        let prepared = self.project_path(id).and_then(|path| {
            let json = project
                .to_json()
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok((path, json))
        });

        Box::pin(async move {
            let (path, json) = prepared?;
            // The previous file stays intact until the rename.
            let partial = path.with_extension(format!("{}.partial", PROJECT_EXTENSION));
            fs::write(&partial, json).map_err(|e| io_error("write", &partial, e))?;
            fs::rename(&partial, &path).map_err(|e| io_error("replace", &path, e))?;
            log::info!("Saved project to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ContentStore>> {
        let path = self.project_path(id);
        let id = id.to_string();

        Box::pin(async move {
            let path = path?;
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => return Err(io_error("read", &path, e)),
            };
            ContentStore::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        let id = id.to_string();

        Box::pin(async move {
            let path = path?;
            match fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Deleted project {}", id);
                    Ok(())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StorageError::NotFound(id))
                }
                Err(e) => Err(io_error("delete", &path, e)),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries =
                fs::read_dir(&self.base_path).map_err(|e| io_error("read", &self.base_path, e))?;

            let mut ids = Vec::new();
            for path in entries.flatten().map(|entry| entry.path()) {
                if path.extension().is_none_or(|ext| ext != PROJECT_EXTENSION) {
                    continue;
                }
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                match decode_stem(stem) {
                    Some(id) if !id.is_empty() => ids.push(id),
                    _ => log::warn!("Skipping unrecognised project file {}", path.display()),
                }
            }
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(id);
        Box::pin(async move { Ok(path?.is_file()) })
    }
}
