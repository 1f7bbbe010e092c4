use std::path::PathBuf;
use std::sync::Mutex;

/// Registry associating item ids with file paths.
///
/// Ids are dense, 1-indexed, and handed out in registration order, so zero is
/// never a valid id and `id - 1` indexes the backing vector. Registration is
/// safe to call from many worker threads at once; once an id has been
/// returned its mapping never changes.
#[derive(Debug, Default)]
pub struct FileMapper {
    paths: Mutex<Vec<PathBuf>>,
}

impl FileMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path and return its id.
    pub fn register(&self, path: PathBuf) -> u32 {
        let mut paths = self.paths.lock().expect("file mapper poisoned");
        paths.push(path);
        paths.len() as u32
    }

    /// Path registered under `id`.
    ///
    /// Panics on an id this mapper never issued.
    pub fn path(&self, id: u32) -> PathBuf {
        let paths = self.paths.lock().expect("file mapper poisoned");
        paths[(id - 1) as usize].clone()
    }

    pub fn get(&self, id: u32) -> Option<PathBuf> {
        let paths = self.paths.lock().expect("file mapper poisoned");
        paths.get(id.checked_sub(1)? as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.paths.lock().expect("file mapper poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
