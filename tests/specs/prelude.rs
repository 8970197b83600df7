//! Shared fixture for CLI specs.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// An isolated rig environment: its own RIG_DIR, HOME, and a PATH with a
/// scripted fake package manager called `pkgx`.
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let env = Self { root };
        std::fs::create_dir_all(env.rig_dir()).unwrap();
        std::fs::create_dir_all(env.home()).unwrap();
        std::fs::create_dir_all(env.bin_dir()).unwrap();
        std::fs::create_dir_all(env.dotfiles_dir()).unwrap();
        env.link_system_tools();
        env.write_config(DEFAULT_CONFIG);
        env
    }

    /// PATH is restricted to the fixture bin dir so no real package
    /// manager can leak into a spec; the handful of tools the pkgx script
    /// needs are symlinked in.
    #[cfg(unix)]
    fn link_system_tools(&self) {
        for tool in ["sh", "cat", "grep", "mv", "true"] {
            for dir in ["/bin", "/usr/bin"] {
                let src = std::path::Path::new(dir).join(tool);
                if src.exists() {
                    let _ = std::os::unix::fs::symlink(&src, self.bin_dir().join(tool));
                    break;
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn link_system_tools(&self) {}

    pub fn rig_dir(&self) -> PathBuf {
        self.root.path().join("rig")
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn dotfiles_dir(&self) -> PathBuf {
        self.rig_dir().join("dotfiles")
    }

    fn state_file(&self) -> PathBuf {
        self.root.path().join("pkgx-state")
    }

    pub fn write_config(&self, text: &str) {
        std::fs::write(self.rig_dir().join("rig.yaml"), text).unwrap();
    }

    pub fn write_lock(&self, text: &str) {
        std::fs::write(self.rig_dir().join("rig.lock"), text).unwrap();
    }

    pub fn read_lock(&self) -> String {
        std::fs::read_to_string(self.rig_dir().join("rig.lock")).unwrap_or_default()
    }

    pub fn write_dotfile(&self, rel: &str, contents: &str) {
        let path = self.dotfiles_dir().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub fn write_home_file(&self, rel: &str, contents: &str) {
        let path = self.home().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub fn read_home_file(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home().join(rel)).unwrap_or_default()
    }

    /// Install the scripted `pkgx` manager binary onto the fixture PATH.
    pub fn with_pkgx(self) -> Self {
        self.install_script("pkgx", PKGX_SCRIPT);
        self
    }

    fn install_script(&self, name: &str, body: &str) {
        let path = self.bin_dir().join(name);
        std::fs::write(&path, body).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Mark a package as installed without going through the CLI.
    pub fn seed_installed(&self, name: &str) {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.state_file())
            .unwrap();
        writeln!(file, "{name}").unwrap();
    }

    /// Names the fake manager currently reports as installed.
    pub fn installed(&self) -> Vec<String> {
        std::fs::read_to_string(self.state_file())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("rig").unwrap();
        let path = self.bin_dir().display().to_string();
        cmd.env("RIG_DIR", self.rig_dir())
            .env("HOME", self.home())
            .env("PATH", path)
            .env("PKGX_STATE", self.state_file())
            .env("NO_COLOR", "1")
            .env_remove("RIG_LOG");
        cmd
    }
}

const DEFAULT_CONFIG: &str = r#"
default_manager: pkgx
managers:
  pkgx:
    list:
      command: ["list"]
      parse: lines
    install:
      command: ["install", "{package}"]
      idempotent_errors: ["already installed"]
    uninstall:
      command: ["uninstall", "{package}"]
      idempotent_errors: ["is not installed"]
    install_hint: "install pkgx first"
"#;

const PKGX_SCRIPT: &str = r#"#!/bin/sh
state="${PKGX_STATE:?}"
case "$1" in
  list)
    cat "$state" 2>/dev/null || true
    ;;
  install)
    if grep -qx "$2" "$state" 2>/dev/null; then
      echo "$2 is already installed" >&2
      exit 1
    fi
    if [ "$2" = "broken-package" ]; then
      echo "package $2 not found" >&2
      exit 1
    fi
    echo "$2" >> "$state"
    ;;
  uninstall)
    if ! grep -qx "$2" "$state" 2>/dev/null; then
      echo "$2 is not installed" >&2
      exit 1
    fi
    grep -vx "$2" "$state" > "$state.next" || true
    mv "$state.next" "$state"
    ;;
  *)
    echo "unknown subcommand $1" >&2
    exit 2
    ;;
esac
"#;
