use super::{percent_encode, ObjectStorage, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// A bucket kept as a directory tree on local disk.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only relative paths made of plain components may reach the disk.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, bytes)?;
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(path)?;
        fs::read(target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::Io(e),
        })
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        fs::remove_file(target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::Io(e),
        })
    }

    /// Managed-bucket URL shape under `ALANT_STORAGE_PUBLIC_URL`. The bucket
    /// directory is never mounted as a static route.
    fn download_url(&self, path: &str) -> String {
        format!("{}/o/{}?alt=media", self.public_base_url, percent_encode(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::storage_path_from_ref;
    use tempfile::tempdir;

    #[test]
    fn put_get_delete() {
        let dir = tempdir().expect("tempdir");
        let bucket = LocalObjectStorage::new(dir.path(), "http://localhost:8080/storage")
            .expect("bucket");
        let path = "courses/c1/files/1_notes.txt";

        bucket.put(path, b"hello").expect("put");
        assert!(bucket.root().join(path).exists());
        assert_eq!(bucket.get(path).expect("get"), b"hello");

        bucket.delete(path).expect("delete");
        assert!(matches!(bucket.get(path), Err(StorageError::NotFound(_))));
        assert!(matches!(bucket.delete(path), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn rejects_paths_escaping_the_bucket() {
        let dir = tempdir().expect("tempdir");
        let bucket = LocalObjectStorage::new(dir.path(), "http://localhost").expect("bucket");
        for path in ["", "../x", "/etc/passwd", "courses/../../x"] {
            assert!(
                matches!(bucket.put(path, b"x"), Err(StorageError::InvalidPath(_))),
                "{} was accepted",
                path
            );
        }
    }

    #[test]
    fn download_urls_resolve_back_to_paths() {
        let dir = tempdir().expect("tempdir");
        let bucket = LocalObjectStorage::new(dir.path(), "http://localhost:8080/storage/")
            .expect("bucket");
        let path = "courses/c1/files/2_a b.pdf";
        let url = bucket.download_url(path);
        assert_eq!(
            url,
            "http://localhost:8080/storage/o/courses%2Fc1%2Ffiles%2F2_a%20b.pdf?alt=media"
        );
        assert_eq!(storage_path_from_ref(&url), path);
    }
}
