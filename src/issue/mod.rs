//! Issue status workflow.
//!
//! Issues move through a fixed table of statuses from `open` to `closed`,
//! every accepted move is recorded in an append-only status log, and users
//! are attached to issues through role-tagged assignments. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
