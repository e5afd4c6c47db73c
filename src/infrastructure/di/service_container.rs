//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::LineageService;
use crate::config::Settings;
use crate::infrastructure::traits::{
    FileSystem, JsonFileMemberSource, MemberSource, RealFileSystem,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Member source for a JSON file, `path` overriding the configured one.
    pub fn member_source(&self, path: Option<PathBuf>) -> Option<Arc<dyn MemberSource>> {
        let path = path.or_else(|| self.settings.members_file.clone())?;
        Some(Arc::new(JsonFileMemberSource::with_fs(self.fs.clone(), path)))
    }

    /// Lineage service over the given source, built with configured options.
    pub fn lineage_service(&self, source: Arc<dyn MemberSource>) -> LineageService {
        LineageService::new(source, self.settings.build_options())
    }
}
