//! Unit tests for the issue workflow module.
//!
//! Domain tests cover the transition table and the aggregate; service tests
//! run against the in-memory adapters.
