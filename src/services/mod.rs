// Cassandra Leaves services
// Services talk to the backend or the filesystem: remote client, bulk fetch, detail fetch, settings, snapshots, sanitizing.

pub mod bulk_fetch;
pub mod detail_fetch;
pub mod remote_client;
pub mod sanitizer;
pub mod settings_engine;
pub mod snapshot;
