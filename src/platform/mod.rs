// Cassandra Leaves platform paths
// Resolves where settings and snapshots live on the current OS.
//
// `CASSANDRA_LEAVES_CONFIG_DIR` overrides the config directory everywhere.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CASSANDRA_LEAVES_CONFIG_DIR";

const APP_DIR: &str = "cassandra-leaves";

/// Returns the configuration directory for Cassandra Leaves.
///
/// - **Linux**: `$XDG_CONFIG_HOME/cassandra-leaves` (or `~/.config/cassandra-leaves`)
/// - **macOS**: `~/Library/Application Support/cassandra-leaves`
/// - **Windows**: `%APPDATA%/cassandra-leaves`
///
/// Falls back to the system temp directory when no home is known.
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
}

/// Returns the data directory, where exported snapshots go by default.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(env::temp_dir).join(APP_DIR)
}

/// Default location of the collection snapshot file.
pub fn default_snapshot_path() -> PathBuf {
    get_data_dir().join("snapshot.json")
}
