//! Environment override of settings.
//!
//! Kept in its own test binary: setting process env vars would leak into
//! the other config tests running in parallel.

use std::env;
use std::fs;

use tempfile::TempDir;

use lineage::config::Settings;

#[test]
fn given_env_vars_when_load_then_override_local_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lineage.toml");
    fs::write(&path, "max_depth = 16\ndefault_tree_name = \"Orphans\"\n").unwrap();

    env::set_var("LINEAGE_MAX_DEPTH", "8");
    env::set_var("LINEAGE_DEFAULT_TREE_NAME", "Strays");
    let settings = Settings::load(Some(&path));
    env::remove_var("LINEAGE_MAX_DEPTH");
    env::remove_var("LINEAGE_DEFAULT_TREE_NAME");

    let settings = settings.expect("load settings");
    assert_eq!(settings.max_depth, 8);
    assert_eq!(settings.default_tree_name, "Strays");
}
