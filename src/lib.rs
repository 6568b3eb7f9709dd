//! Fixtrack: issue status workflow for chat-based customer support.
//!
//! Support teams receive bug reports from customers over registered chat
//! channels or the web, then drive each issue from `open` to `closed`
//! through developer and QA hand-offs. Every status change is checked
//! against a fixed transition table and recorded in an append-only log.
//!
//! # Architecture
//!
//! Fixtrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over the ports
//!
//! # Modules
//!
//! - [`issue`]: Issue workflow, status log, and role-tagged assignments
//! - [`tenancy`]: Customers, projects, registered channels, and users

pub mod issue;
pub mod tenancy;
