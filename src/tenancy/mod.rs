//! Tenant-scoped entities behind the issue workflow.
//!
//! Customers own projects, projects own registered chat channels, and users
//! report, act on, and are assigned to issues.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
