//! Raw resource access
//!
//! The decoder never opens files itself. It is handed a [`RawResourceAccessor`]
//! that reports resource lengths and copies resource bytes by opaque id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::glob;
use thiserror::Error;

/// Opaque identifier of a raw resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A source of raw resource bytes.
///
/// Unknown ids report a size of zero and copy nothing.
pub trait RawResourceAccessor {
    /// Length in bytes of the resource.
    fn resource_size(&self, id: ResourceId) -> usize;

    /// Copy up to `dest.len()` bytes of the resource into `dest`, returning
    /// the number of bytes copied.
    fn load_resource(&self, id: ResourceId, dest: &mut [u8]) -> usize;
}

/// Name-based lookup of resource ids.
pub trait ResourceLookup {
    fn find(&self, name: &str) -> Option<ResourceId>;
}

/// Fetch a whole resource into a fresh buffer.
///
/// The buffer is sized by `resource_size`; if the accessor copies fewer
/// bytes the buffer is shortened to match.
pub fn fetch<A: RawResourceAccessor + ?Sized>(accessor: &A, id: ResourceId) -> Vec<u8> {
    let size = accessor.resource_size(id);
    let mut data = vec![0u8; size];
    if size > 0 {
        let copied = accessor.load_resource(id, &mut data);
        data.truncate(copied);
    }
    data
}

/// Error opening a resource directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResourceError {
    #[error("resource directory '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),
    #[error("invalid resource pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
    #[error("failed to read resource: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalize a resource name for case-insensitive lookup.
fn lookup_key(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Named in-memory byte blobs.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessor {
    resources: Vec<(String, Vec<u8>)>,
    names: HashMap<String, ResourceId>,
}

impl MemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource and return its id. Re-inserting a name replaces its
    /// bytes and keeps the original id.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) -> ResourceId {
        let name = name.into();
        let key = lookup_key(&name);
        if let Some(&id) = self.names.get(&key) {
            self.resources[id.0 as usize].1 = data;
            return id;
        }
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push((name, data));
        self.names.insert(key, id);
        id
    }

    pub fn name(&self, id: ResourceId) -> Option<&str> {
        self.resources.get(id.0 as usize).map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    fn bytes(&self, id: ResourceId) -> &[u8] {
        self.resources
            .get(id.0 as usize)
            .map(|(_, data)| data.as_slice())
            .unwrap_or(&[])
    }
}

impl RawResourceAccessor for MemoryAccessor {
    fn resource_size(&self, id: ResourceId) -> usize {
        self.bytes(id).len()
    }

    fn load_resource(&self, id: ResourceId, dest: &mut [u8]) -> usize {
        let data = self.bytes(id);
        let n = data.len().min(dest.len());
        dest[..n].copy_from_slice(&data[..n]);
        n
    }
}

impl ResourceLookup for MemoryAccessor {
    fn find(&self, name: &str) -> Option<ResourceId> {
        self.names.get(&lookup_key(name)).copied()
    }
}

/// Resources backed by the files of one directory.
///
/// Every regular file directly inside the directory is a resource named by
/// its file stem, so `STARTAN3.lmp` is found as `startan3` or `STARTAN3`.
/// Files are read on demand and no handles are kept open.
#[derive(Debug, Clone)]
pub struct DirectoryAccessor {
    root: PathBuf,
    paths: Vec<PathBuf>,
    names: HashMap<String, ResourceId>,
}

impl DirectoryAccessor {
    /// Scan `dir` and assign ids in sorted path order.
    pub fn open(dir: &Path) -> Result<Self, ResourceError> {
        if !dir.is_dir() {
            return Err(ResourceError::MissingDirectory(dir.to_path_buf()));
        }

        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        let pattern_str = Path::new(&escaped).join("*").to_string_lossy().into_owned();
        let entries =
            glob(&pattern_str).map_err(|e| ResourceError::InvalidPattern(pattern_str.clone(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => return Err(ResourceError::Io(e.into())),
            }
        }
        paths.sort();

        let mut names = HashMap::new();
        for (i, path) in paths.iter().enumerate() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                // First file wins when two share a stem
                names.entry(lookup_key(stem)).or_insert(ResourceId(i as u32));
            }
        }

        Ok(Self {
            root: dir.to_path_buf(),
            paths,
            names,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, id: ResourceId) -> Option<&Path> {
        self.paths.get(id.0 as usize).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resource names in id order.
    pub fn names(&self) -> impl Iterator<Item = (ResourceId, String)> + '_ {
        self.paths.iter().enumerate().filter_map(|(i, p)| {
            let stem = p.file_stem()?.to_str()?;
            Some((ResourceId(i as u32), stem.to_string()))
        })
    }
}

impl RawResourceAccessor for DirectoryAccessor {
    fn resource_size(&self, id: ResourceId) -> usize {
        self.path(id)
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len() as usize)
            .unwrap_or(0)
    }

    fn load_resource(&self, id: ResourceId, dest: &mut [u8]) -> usize {
        let Some(data) = self.path(id).and_then(|p| std::fs::read(p).ok()) else {
            return 0;
        };
        let n = data.len().min(dest.len());
        dest[..n].copy_from_slice(&data[..n]);
        n
    }
}

impl ResourceLookup for DirectoryAccessor {
    fn find(&self, name: &str) -> Option<ResourceId> {
        self.names.get(&lookup_key(name)).copied()
    }
}
