//! I/O boundary traits for testability
//!
//! These traits abstract where member records come from, allowing services
//! to be tested with in-memory implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::MemberRecord;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Supplier of member records, ordered by name ascending.
pub trait MemberSource: Send + Sync {
    fn fetch_members(&self) -> io::Result<Vec<MemberRecord>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Members stored as a JSON array of camelCase records.
pub struct JsonFileMemberSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileMemberSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(Arc::new(RealFileSystem), path)
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MemberSource for JsonFileMemberSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn fetch_members(&self) -> io::Result<Vec<MemberRecord>> {
        if !self.fs.exists(&self.path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("members file not found: {}", self.path.display()),
            ));
        }

        let content = self.fs.read_to_string(&self.path)?;
        let mut members: Vec<MemberRecord> = serde_json::from_str(&content)?;
        // Stable: equal names keep file order
        members.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("loaded {} members", members.len());

        Ok(members)
    }
}

/// Fixed member list, returned as given.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberSource {
    members: Vec<MemberRecord>,
}

impl InMemoryMemberSource {
    pub fn new(members: Vec<MemberRecord>) -> Self {
        Self { members }
    }
}

impl MemberSource for InMemoryMemberSource {
    fn fetch_members(&self) -> io::Result<Vec<MemberRecord>> {
        Ok(self.members.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockFileSystem {
        files: HashMap<PathBuf, String>,
    }

    impl FileSystem for MockFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }
    }

    fn source_with(content: &str) -> JsonFileMemberSource {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("/data/members.json"), content.to_string());
        JsonFileMemberSource::with_fs(Arc::new(MockFileSystem { files }), "/data/members.json")
    }

    #[test]
    fn given_json_members_when_fetching_then_sorted_by_name() {
        let source = source_with(
            r#"[
                {"id": "2", "name": "Zed"},
                {"id": "1", "name": "Amy", "treeName": "Lambda"}
            ]"#,
        );

        let members = source.fetch_members().unwrap();

        assert_eq!(members[0].name, "Amy");
        assert_eq!(members[1].name, "Zed");
    }

    #[test]
    fn given_malformed_json_when_fetching_then_invalid_data() {
        let source = source_with("{ not json");

        let err = source.fetch_members().unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn given_missing_file_when_fetching_then_not_found() {
        let source = JsonFileMemberSource::with_fs(
            Arc::new(MockFileSystem {
                files: HashMap::new(),
            }),
            "/nope.json",
        );

        let err = source.fetch_members().unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
