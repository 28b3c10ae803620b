//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the AccountRepository port
//! - In-memory repository and recording notifier for tests and embedding

pub mod duckdb;
pub mod memory;
