// Cassandra Leaves state managers
// Managers own or derive in-memory state: the collection, queries over it, mutations, and view state.

pub mod leaf_store;
pub mod mutation_manager;
pub mod query_engine;
pub mod view_manager;
