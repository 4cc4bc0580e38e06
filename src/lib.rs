//! boardsync keeps project and task collections synchronized with a remote
//! board backend. Mutations are applied locally before the remote call
//! resolves; success reconciles local state with the canonical response,
//! failure rolls back by a full resync, and a durable cache mirrors every
//! settled state for warm starts.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod store;
