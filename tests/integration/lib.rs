//! Shared fixtures for the sigvault integration tests.

use std::path::PathBuf;
use std::process::Command;

use sigvault_core::config::{Config, StorageBackend};
use tempfile::TempDir;

/// Signature of `foobar` scoped to 20150831 / us-east-1 / ec2.
pub const KNOWN_SIGNATURE: &str = "Gh6tU3ZoSzIhP6s6jAAL55L8PgB6VVt8pK+W8WYFGl0=";

/// Locate the compiled `sigvault` binary in the workspace target directory.
pub fn sigvault_bin() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir
        .parent()
        .expect("tests/ parent")
        .parent()
        .expect("workspace root");
    let bin = workspace_root.join("target").join("debug").join("sigvault");
    assert!(
        bin.exists(),
        "sigvault binary not found at {}; run `cargo build -p sigvault-cli` first",
        bin.display()
    );
    bin
}

/// A temporary directory holding a config file with file storage inside it.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");

        let mut config = Config::default();
        config.storage.backend = StorageBackend::File;
        config.storage.path = Some(dir.path().join("storage"));
        config
            .save(&dir.path().join("sigvault.json5"))
            .expect("save config");

        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("sigvault.json5")
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.dir.path().join("storage")
    }

    /// A `sigvault` command pointed at this sandbox's config.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(sigvault_bin());
        cmd.env("SIGVAULT_CONFIG", self.config_path())
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}
