// Cassandra Leaves shared type definitions
// Each submodule defines types used across the application.

pub mod errors;
pub mod leaf;
pub mod query;
pub mod settings;
pub mod view;
