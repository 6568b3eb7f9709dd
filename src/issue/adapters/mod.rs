//! Storage adapters for the issue workflow ports.
//!
//! - [`memory`]: thread-safe in-memory stores for tests and embedders that
//!   run without a database
//! - [`postgres`]: `PostgreSQL` persistence using Diesel, committing status
//!   changes and their log entries in one transaction

pub mod memory;
pub mod postgres;
