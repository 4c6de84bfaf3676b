//! Filesystem-based template loader.
//!
//! Resolves logical template paths against a root directory:
//!
//! ```text
//! views/                      DirectoryLoader::new("views").with_extension("tpl")
//! ├── layout.tpl      ←  "layout", "layout.tpl", "./layout"
//! └── partials/
//!     └── nav.tpl     ←  "partials/nav", "partials/./nav.tpl"
//! ```
//!
//! The canonical filename is the absolute root joined with the normalized
//! relative path, so every spelling of the same template yields the same
//! filename and it stays valid from any working directory.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use tracing::{debug, instrument};

use tplmap_core::{
    application::{ApplicationError, ports::Loader},
    domain::Source,
    error::TplmapResult,
};

/// Loads templates from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    extension: Option<String>,
}

impl DirectoryLoader {
    /// Create a loader pointed at `root`.
    ///
    /// A relative root is made absolute against the current directory
    /// without touching the filesystem. The directory does not need to
    /// exist yet; loads fail with a `TemplateLoad` error until it does.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            root: std::path::absolute(&root).unwrap_or(root),
            extension: None,
        }
    }

    /// Default extension appended to logical paths that have none.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let trimmed = extension.trim_start_matches('.');
        self.extension = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical path to the file it names.
    ///
    /// # Errors
    ///
    /// Rejects empty paths, absolute paths and any `..` component.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ApplicationError> {
        let invalid = |reason: &str| ApplicationError::TemplateLoad {
            path: path.to_owned(),
            reason: reason.to_owned(),
        };

        let mut relative = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid("parent directory references are not allowed"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("absolute template paths are not allowed"));
                }
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(invalid("empty template path"));
        }

        if let Some(extension) = &self.extension {
            if relative.extension().is_none() {
                relative.set_extension(extension);
            }
        }

        Ok(self.root.join(relative))
    }
}

impl Loader for DirectoryLoader {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, path: &str) -> TplmapResult<Source> {
        let file = self.resolve(path)?;

        let content = fs::read_to_string(&file).map_err(|e| ApplicationError::TemplateLoad {
            path: path.to_owned(),
            reason: match e.kind() {
                io::ErrorKind::NotFound => format!("no file at {}", file.display()),
                _ => format!("failed to read {}: {e}", file.display()),
            },
        })?;

        debug!(file = %file.display(), bytes = content.len(), "template loaded");
        Ok(Source::new(file.to_string_lossy(), content))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|file| file.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tplmap_core::error::TplmapError;

    fn views() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("layout.tpl"), "<html>\n<body>\n").unwrap();
        fs::create_dir(dir.path().join("partials")).unwrap();
        fs::write(dir.path().join("partials").join("nav.tpl"), "<nav/>\n").unwrap();
        dir
    }

    fn reason_of(err: TplmapError) -> String {
        match err {
            TplmapError::Application(ApplicationError::TemplateLoad { reason, .. }) => reason,
            other => panic!("expected TemplateLoad, got {other:?}"),
        }
    }

    #[test]
    fn loads_with_default_extension() {
        let dir = views();
        let loader = DirectoryLoader::new(dir.path()).with_extension("tpl");

        let source = loader.load("layout").unwrap();
        assert_eq!(source.content(), "<html>\n<body>\n");
        assert_eq!(
            source.filename(),
            dir.path().join("layout.tpl").to_string_lossy()
        );
    }

    #[test]
    fn relative_root_yields_absolute_filenames() {
        let cwd = std::env::current_dir().unwrap();
        let loader = DirectoryLoader::new("views").with_extension("tpl");

        assert!(loader.root().is_absolute());
        assert_eq!(loader.root(), cwd.join("views"));

        let file = loader.resolve("partials/nav").unwrap();
        assert!(file.is_absolute());
        assert_eq!(file, cwd.join("views").join("partials").join("nav.tpl"));
    }

    #[test]
    fn explicit_extension_is_kept() {
        let dir = views();
        let loader = DirectoryLoader::new(dir.path()).with_extension(".php");
        assert!(loader.load("layout.tpl").is_ok());
    }

    #[test]
    fn spellings_share_a_filename() {
        let dir = views();
        let loader = DirectoryLoader::new(dir.path()).with_extension("tpl");

        let a = loader.load("partials/nav").unwrap();
        let b = loader.load("./partials/./nav.tpl").unwrap();
        assert_eq!(a.filename(), b.filename());
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = views();
        let loader = DirectoryLoader::new(dir.path()).with_extension("tpl");
        let reason = reason_of(loader.load("ghost").unwrap_err());
        assert!(reason.contains("no file at"), "reason = {reason}");
        assert!(!loader.exists("ghost"));
    }

    #[test]
    fn parent_components_are_rejected() {
        let loader = DirectoryLoader::new("/srv/views");
        let reason = reason_of(loader.load("../secrets").unwrap_err());
        assert!(reason.contains("parent"));
    }

    #[test]
    fn absolute_paths_are_rejected() {
        let loader = DirectoryLoader::new("/srv/views");
        assert!(loader.resolve("/etc/passwd").is_err());
    }

    #[test]
    fn empty_path_is_rejected() {
        let loader = DirectoryLoader::new("/srv/views");
        assert!(loader.resolve("").is_err());
        assert!(loader.resolve("./").is_err());
    }

    #[test]
    fn exists_checks_for_a_file() {
        let dir = views();
        let loader = DirectoryLoader::new(dir.path()).with_extension("tpl");
        assert!(loader.exists("partials/nav"));
        assert!(!loader.exists("partials"));
    }
}
