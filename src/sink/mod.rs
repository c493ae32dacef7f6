//! Output destinations.
//!
//! An [`OutputSink`] writes a rendered artifact to the console, a local file
//! or an object store. Local overwrites go through a temporary file in the
//! same directory and are renamed into place, so a failed render never leaves
//! a half-written file behind.

use crate::error::{RenderError, Result};
use crate::settings::{Destination, ObjectLocation};
use ahash::AHashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// How bytes land at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace whatever is there
    Overwrite,
    /// Add after the existing content
    Append,
}

/// Minimal get/put object storage
pub trait ObjectStore {
    /// Fetch an object, `None` if it does not exist
    fn get(&self, location: &ObjectLocation) -> io::Result<Option<Vec<u8>>>;

    /// Store an object, replacing any previous version
    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> io::Result<()>;
}

/// Object store backed by a local directory: `s3://bucket/key` maps to
/// `<root>/bucket/key`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, location: &ObjectLocation) -> PathBuf {
        self.root.join(&location.bucket).join(&location.key)
    }
}

impl ObjectStore for DirectoryStore {
    fn get(&self, location: &ObjectLocation) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(location)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> io::Result<()> {
        atomic_write(&self.path_for(location), bytes)
    }
}

/// In-memory object store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<AHashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, AHashMap<String, Vec<u8>>>> {
        self.objects
            .lock()
            .map_err(|_| io::Error::other("object store lock poisoned"))
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, location: &ObjectLocation) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(&location.to_string()).cloned())
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> io::Result<()> {
        self.lock()?.insert(location.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Write target for one render
pub struct OutputSink<'a> {
    destination: Destination,
    store: Option<&'a dyn ObjectStore>,
    console: Box<dyn Write + 'a>,
}

impl<'a> OutputSink<'a> {
    /// Console output goes to stdout unless replaced with [`Self::with_console`]
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            store: None,
            console: Box::new(io::stdout()),
        }
    }

    /// Store used for `s3://` destinations
    #[must_use]
    pub fn with_store(mut self, store: &'a dyn ObjectStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_console(mut self, console: impl Write + 'a) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Reject destinations this sink cannot reach, before anything is written
    pub fn check(&self) -> Result<()> {
        if let Destination::Object(location) = &self.destination {
            if self.store.is_none() {
                return Err(RenderError::config(format!(
                    "no object store configured for {}",
                    location
                )));
            }
        }
        Ok(())
    }

    fn store(&self, location: &ObjectLocation) -> Result<&'a dyn ObjectStore> {
        self.store.ok_or_else(|| {
            RenderError::config(format!("no object store configured for {}", location))
        })
    }

    /// Current content at the destination; `None` for the console or a
    /// destination that does not exist yet
    pub fn read_existing(&self) -> Result<Option<String>> {
        match &self.destination {
            Destination::Stdout => Ok(None),
            Destination::File(path) => match fs::read_to_string(path) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(RenderError::io("read", path.display().to_string(), e)),
            },
            Destination::Object(location) => {
                let bytes = self
                    .store(location)?
                    .get(location)
                    .map_err(|e| RenderError::io("read", location.to_string(), e))?;
                bytes
                    .map(|b| {
                        String::from_utf8(b).map_err(|e| {
                            RenderError::io(
                                "read",
                                location.to_string(),
                                io::Error::new(io::ErrorKind::InvalidData, e),
                            )
                        })
                    })
                    .transpose()
            }
        }
    }

    /// Write `bytes` to the destination
    pub fn write(&mut self, bytes: &[u8], mode: WriteMode) -> Result<()> {
        let target = self.destination.to_string();
        match &self.destination {
            Destination::Stdout => {
                self.console
                    .write_all(bytes)
                    .and_then(|()| self.console.flush())
                    .map_err(|e| RenderError::io("write", target, e))?;
            }
            Destination::File(path) => {
                let result = match mode {
                    WriteMode::Overwrite => atomic_write(path, bytes),
                    WriteMode::Append => append_file(path, bytes),
                };
                result.map_err(|e| RenderError::io("write", target, e))?;
                tracing::info!(path = %path.display(), bytes = bytes.len(), mode = ?mode, "wrote output file");
            }
            Destination::Object(location) => {
                let store = self.store(location)?;
                let body = match mode {
                    WriteMode::Overwrite => bytes.to_vec(),
                    WriteMode::Append => {
                        let mut existing = store
                            .get(location)
                            .map_err(|e| RenderError::io("read", target.clone(), e))?
                            .unwrap_or_default();
                        existing.extend_from_slice(bytes);
                        existing
                    }
                };
                store
                    .put(location, &body)
                    .map_err(|e| RenderError::io("upload", target, e))?;
                tracing::info!(object = %location, bytes = body.len(), mode = ?mode, "uploaded output object");
            }
        }
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Replace `path` with `bytes` via a sibling temporary file
fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn append_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::create_dir_all(parent_dir(path))?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(bytes)?;
    file.flush()
}
