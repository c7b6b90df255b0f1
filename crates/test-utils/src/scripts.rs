//! Script fixtures for tests that run real processes.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary scripts directory.
///
/// Scripts are run through `/bin/sh` by default, so they do not need the
/// executable bit.
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `body` to `name` inside the directory, returning its path.
    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, body).expect("writing script");
        path
    }

    /// Write the three default scripts.
    pub fn with_defaults(self, create: &str, read: &str, delete: &str) -> Self {
        self.write("create_tfstack.sh", create);
        self.write("read_tfstack.sh", read);
        self.write("delete_tfstack.sh", delete);
        self
    }
}

impl Default for ScriptDir {
    fn default() -> Self {
        Self::new()
    }
}
