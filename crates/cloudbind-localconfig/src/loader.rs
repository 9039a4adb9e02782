//! Named-resource loading for the configuration file locator.

use std::path::PathBuf;

/// Read access to named configuration resources.
///
/// The lookup is synchronous, bounded, and side-effect-free; a resource
/// that cannot be read is simply absent.
pub trait ResourceLoader: Send + Sync {
    /// Returns the textual content of the named resource, if present.
    fn load(&self, name: &str) -> Option<String>;
}

/// Loader probing an ordered list of directories for the named file.
#[derive(Debug, Clone)]
pub struct DirResourceLoader {
    roots: Vec<PathBuf>,
}

impl DirResourceLoader {
    /// Creates a loader over the given directory roots, probed in order.
    #[must_use]
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

impl ResourceLoader for DirResourceLoader {
    fn load(&self, name: &str) -> Option<String> {
        for root in &self.roots {
            let path = root.join(name);
            if let Ok(content) = std::fs::read_to_string(&path) {
                tracing::debug!(path = %path.display(), "loaded configuration resource");
                return Some(content);
            }
        }
        None
    }
}
