//! Storage adapters for tenant-scoped entities.

pub mod memory;
