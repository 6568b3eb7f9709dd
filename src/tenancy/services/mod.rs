//! Application services for tenant-scoped entities.

mod registration;

pub use registration::{RegisterChannelRequest, TenancyError, TenancyResult, TenancyService};
