//! Config discovery through the XDG directory
//!
//! These tests change process-wide environment variables, so they run
//! serially.

use pixelscale::config::{find_xdg_config, load_config, CONFIG_FILE};
use pixelscale::{Algorithm, Backend};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

/// Restores an environment variable on drop
struct EnvGuard {
    key: &'static str,
    old: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &std::path::Path) -> Self {
        let old = env::var(key).ok();
        env::set_var(key, value);
        EnvGuard { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old {
            Some(v) => env::set_var(self.key, v),
            None => env::remove_var(self.key),
        }
    }
}

#[test]
#[serial]
fn test_xdg_config_is_found() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("pxscale");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CONFIG_FILE), "[defaults]\nalgorithm = \"xbr\"\nfactor = 3.0\n").unwrap();

    let _guard = EnvGuard::set("XDG_CONFIG_HOME", temp.path());
    assert_eq!(find_xdg_config(), Some(dir.join(CONFIG_FILE)));
}

#[test]
#[serial]
fn test_home_config_fallback() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".config").join("pxscale");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CONFIG_FILE), "[defaults]\nbackend = \"raster\"\nalgorithm = \"scale\"\n").unwrap();

    let old_xdg = env::var("XDG_CONFIG_HOME").ok();
    env::remove_var("XDG_CONFIG_HOME");
    let _home = EnvGuard::set("HOME", temp.path());

    let found = find_xdg_config();
    if let Some(v) = old_xdg {
        env::set_var("XDG_CONFIG_HOME", v);
    }

    let path = found.expect("config under HOME should be found");
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.defaults.backend, Backend::Raster);
    assert_eq!(config.defaults.algorithm, Algorithm::Scale);
}

#[test]
#[serial]
fn test_missing_xdg_config() {
    let temp = TempDir::new().unwrap();
    let _guard = EnvGuard::set("XDG_CONFIG_HOME", temp.path());
    assert_eq!(find_xdg_config(), None);
}
