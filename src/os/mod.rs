//! OS-level helpers: environment snapshots and the current user's identity.

pub mod env;
pub mod user;
