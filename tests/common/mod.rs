use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OVERRIDES: [&str; 4] = [
    "VALTSTORAGE_ENV",
    "VALTSTORAGE_API_URL",
    "VALTSTORAGE_WINDOW_TITLE",
    "VALTSTORAGE_INTERACTIVE",
];

/// Isolated HOME and working directory for one test.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    /// Binary with a clean environment, running in `work`.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("valtstorage").expect("binary built");
        for key in OVERRIDES {
            cmd.env_remove(key);
        }
        cmd.env("HOME", &self.home)
            .env_remove("RUST_LOG")
            .current_dir(&self.work);
        cmd
    }

    /// Binary forced into demo mode.
    pub fn demo(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("VALTSTORAGE_ENV", "demo");
        cmd
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join(".valtstorage").join("config.json")
    }

    pub fn write_config(&self, json: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("config dir")).expect("create config dir");
        fs::write(path, json).expect("write config");
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.work.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn exists(&self, rel: &str) -> bool {
        Path::new(&self.work).join(rel).exists()
    }
}
